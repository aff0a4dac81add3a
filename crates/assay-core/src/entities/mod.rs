//! Persisted entity structs.
//!
//! Each entity maps to a table in the libSQL database (see
//! `assay-db/migrations/001_initial.sql`). Sections reference assignments by id:
//! an assignment row is shared by every section that lists it and is never
//! copied.

mod assessment;
mod assignment;

pub use assessment::{Assessment, Section};
pub use assignment::{Assignment, NewAssignment};
