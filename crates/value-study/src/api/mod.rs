//! Public API for the value-study crate.
//!
//! This module provides the high-level API: [`ValueStudy`] builder and
//! [`StudyError`] unified error type.

mod builder;
mod error;

pub use builder::ValueStudy;
pub use error::StudyError;
