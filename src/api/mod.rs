//! Host-facing boundary.
//!
//! Native hosts link the rlib and use [`crate::EngineCore`] directly; wasm
//! hosts go through the flat `#[wasm_bindgen]` facade in [`wasm`].

#[cfg(target_arch = "wasm32")]
pub mod wasm;
