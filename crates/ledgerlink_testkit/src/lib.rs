//! # LedgerLink Testkit
//!
//! Test utilities for LedgerLink.
//!
//! This crate provides:
//! - Registry fixtures built from compact layouts
//! - Structural invariant checks for chains and registries
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use ledgerlink_testkit::prelude::*;
//!
//! let registry = registry_from(&[(1, &[10, 20]), (2, &[10])]);
//! assert_registry_well_formed(&registry);
//! assert_eq!(layout_of(&registry), vec![(1, vec![10, 20]), (2, vec![10])]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod invariants;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::invariants::*;
}

pub use fixtures::*;
pub use generators::*;
pub use invariants::*;
