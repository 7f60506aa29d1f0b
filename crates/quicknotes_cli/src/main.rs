//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quicknotes_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("quicknotes_core ping={}", quicknotes_core::ping());
    println!("quicknotes_core version={}", quicknotes_core::core_version());
}
