//! Shared test utilities for assay-reconcile.
