//! # slash_core - Slash Core Primitives
//!
//! Zero-dependency building blocks shared by the simulation crates.
//! The simulation never holds references into its own body storage while
//! mutating it; it works through generational handles instead:
//! - **Handle**: a typed index + generation pair, cheap to copy and compare
//! - **HandleAllocator**: hands out handles and detects stale ones
//! - **HandleMap**: an arena of values addressed by handle

pub mod handle;

pub use handle::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::handle::{Handle, HandleAllocator, HandleMap};
}
