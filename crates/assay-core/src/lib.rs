//! # assay-core
//!
//! Core types shared across all assay crates:
//! - Persisted entities (assignments, sections, assessments)
//! - The assignment type enum with its wire representation
//! - Pending aggregates built during a reconciliation run and the drafts
//!   handed to storage on commit
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod pending;
