//! # Domain Layer
//!
//! Pure indexing logic: the path codec, the per-directory graph engine,
//! key metadata, configuration values and the error taxonomy. No I/O.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod graph;
pub mod value_objects;
