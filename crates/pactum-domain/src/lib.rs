//! Pactum Domain Layer
//!
//! Core types shared by every Pactum crate: the versioned field schema a
//! prompt asks the model to fill, the flattened extraction result that comes
//! back, and the provider boundary.
//!
//! ## Key Concepts
//!
//! - **Schema**: ordered field descriptors (description, type label,
//!   accepted values, value placeholder) plus an editing [`FieldKind`]
//! - **Extraction Result**: field name -> [`Scalar`], in response order
//! - **LlmOutcome**: text, safety block, or malformed reply
//!
//! ## Architecture
//!
//! - No I/O, no async
//! - Trait definitions for the model boundary
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builtin;
pub mod outcome;
pub mod scalar;
pub mod schema;
pub mod traits;
pub mod version;

// Re-exports for convenience
pub use outcome::LlmOutcome;
pub use scalar::{ExtractionResult, Scalar};
pub use schema::{EntryValue, FieldKind, Schema, SchemaEntry, SchemaError};
pub use version::SchemaVersion;
