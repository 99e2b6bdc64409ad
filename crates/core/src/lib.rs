//! Shared domain types for the GENUI generation backend.
//!
//! Zero internal dependencies -- every other crate in the workspace may
//! depend on `genui-core`, never the other way around.

pub mod device;
pub mod document;
pub mod types;
