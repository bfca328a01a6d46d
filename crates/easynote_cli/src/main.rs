//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `easynote_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // embedding UI shell.
    println!("easynote_core ping={}", easynote_core::ping());
    println!("easynote_core version={}", easynote_core::core_version());
}
