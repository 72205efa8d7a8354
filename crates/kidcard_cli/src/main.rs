//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `kidcard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Validates core crate wiring independently from the Flutter/FFI
    // runtime setup.
    println!("kidcard_core ping={}", kidcard_core::ping());
    println!("kidcard_core version={}", kidcard_core::core_version());
}
