//! Message dispatch between registered surface endpoints.
//!
//! # Responsibility
//! - Deliver typed messages to the endpoint registered for a surface.
//! - Model the transport's one-shot reply channel.
//!
//! # Invariants
//! - A reply is only visible to the sender when the handler keeps the
//!   channel open; a closed channel drops any written reply.
//! - Dispatch is synchronous in the sender's call; endpoints may re-enter
//!   the router to forward messages.

use crate::message::{Message, SaveAck, SurfaceId};
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

pub type RouterResult<T> = Result<T, RouterError>;

/// Routing error for registration and dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// No endpoint is registered for the destination surface.
    SurfaceUnavailable(SurfaceId),
    /// The surface already has a registered endpoint.
    DuplicateSurface(SurfaceId),
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SurfaceUnavailable(surface) => {
                write!(f, "no endpoint registered for surface `{surface}`")
            }
            Self::DuplicateSurface(surface) => {
                write!(f, "surface `{surface}` already registered")
            }
        }
    }
}

impl Error for RouterError {}

/// What a handler decides about the reply channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDirective {
    /// The handler will not respond; the channel closes immediately.
    Close,
    /// The handler responds (possibly after further routed work); the
    /// channel stays open until the handler returns.
    KeepOpen,
}

/// One-shot reply handle passed to every endpoint.
pub struct Responder {
    slot: Arc<Mutex<Option<SaveAck>>>,
}

impl Responder {
    /// Sends the reply, consuming the handle.
    pub fn send(self, ack: SaveAck) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(ack);
    }
}

/// Endpoint contract implemented by each surface.
///
/// Handlers receive the router so they can forward messages; they must
/// match the message set exhaustively and treat messages that are
/// meaningless for their surface as logged no-ops.
pub trait MessageEndpoint: Send + Sync {
    fn on_message(
        &self,
        router: &MessageRouter,
        message: &Message,
        responder: Responder,
    ) -> ChannelDirective;
}

/// Dispatches typed messages between registered surfaces.
#[derive(Default)]
pub struct MessageRouter {
    endpoints: Mutex<BTreeMap<SurfaceId, Arc<dyn MessageEndpoint>>>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the endpoint for one surface.
    pub fn register(
        &self,
        surface: SurfaceId,
        endpoint: Arc<dyn MessageEndpoint>,
    ) -> RouterResult<()> {
        let mut endpoints = self.endpoints.lock().unwrap_or_else(PoisonError::into_inner);
        if endpoints.contains_key(&surface) {
            return Err(RouterError::DuplicateSurface(surface));
        }
        endpoints.insert(surface, endpoint);
        Ok(())
    }

    /// Delivers one message and returns the reply, if the handler kept the
    /// channel open and sent one.
    pub fn send(&self, to: SurfaceId, message: Message) -> RouterResult<Option<SaveAck>> {
        let endpoint = {
            let endpoints = self.endpoints.lock().unwrap_or_else(PoisonError::into_inner);
            endpoints
                .get(&to)
                .cloned()
                .ok_or(RouterError::SurfaceUnavailable(to))?
        };

        debug!(
            "event=message_dispatch module=router status=start to={to} kind={}",
            message.kind()
        );

        let slot = Arc::new(Mutex::new(None));
        let responder = Responder {
            slot: Arc::clone(&slot),
        };

        match endpoint.on_message(self, &message, responder) {
            ChannelDirective::Close => Ok(None),
            ChannelDirective::KeepOpen => {
                Ok(slot.lock().unwrap_or_else(PoisonError::into_inner).take())
            }
        }
    }
}
