#![no_std] // Shared with the wasm build, keep it allocation-only

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod category;
pub mod span;

// Re-export core types for convenience
pub use category::Category;
pub use span::Span;

pub mod model;
pub use model::*;
