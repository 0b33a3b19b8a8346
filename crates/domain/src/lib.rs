//! offerbase domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `dedupe`: Title normalization and dedupe key derivation
//! - `slug`: URL slug generation
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Application use cases / business logic

pub mod dedupe;
pub mod model;
pub mod ports;
pub mod slug;
pub mod usecases;

pub use dedupe::{dedupe_key, normalize_title};
pub use model::*;
pub use ports::*;
pub use slug::{slug_for, slugify};
