//! SQL generation module.
//!
//! Statement builders for the two statements Siphon issues:
//!
//! - [`ddl`] - CREATE TABLE bootstrap statements built from a catalog
//!   [`crate::schema::TableDef`]
//! - [`copy`] - COPY bulk-ingest statements targeting a single object or a
//!   whole prefix
//!
//! Builders are pure: they render deterministic strings and never touch the
//! warehouse. Identifiers are not quoted or escaped; the schema catalog is
//! a trusted source.

pub mod copy;
pub mod ddl;

pub use copy::{CopyFrom, Credentials, LoadOptions};
pub use ddl::CreateTable;
