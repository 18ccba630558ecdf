//! # rail-core
//!
//! Core types shared by every railshift crate:
//! - [`EntityKind`] and the [`EntitySelection`] that gates each step
//! - Schemaless [`Record`] helpers (field stripping, id extraction)
//! - Per-entity [`Transform`] rules applied before re-creation
//! - [`MigrationSummary`] outcome counts

pub mod entity;
pub mod errors;
pub mod record;
pub mod summary;
pub mod transform;

pub use entity::{AttachmentParent, EntityKind, EntitySelection};
pub use errors::CoreError;
pub use record::Record;
pub use summary::{Direction, EntityOutcome, MigrationSummary};
pub use transform::{Prepared, SkipReason, Transform};
