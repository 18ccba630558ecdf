//! # rail-migrate
//!
//! Export and import pipelines for moving TestRail data between instances.
//!
//! - [`Exporter`] GETs every enabled kind from the source project and saves
//!   the raw payloads into a [`DataDir`].
//! - [`Importer`] reads those files back, strips server-assigned fields,
//!   remaps the project id, and POSTs each record to the destination.
//!
//! Both are driven by the per-kind tables in [`table`] and return a
//! [`rail_core::MigrationSummary`] instead of failing on the first bad
//! record.

pub mod export;
pub mod import;
pub mod store;
pub mod table;

mod error;

#[cfg(test)]
mod testing;

pub use error::StoreError;
pub use export::{
    ExportOptions, Exporter, TESTS_PAGE_SIZE, fetch_test_runs_from_plans,
    fetch_tests_with_pagination, flatten_plan_runs,
};
pub use import::{ImportOptions, Importer};
pub use store::DataDir;
