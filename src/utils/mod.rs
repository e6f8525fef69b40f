//! Common utilities and helper functions

pub mod dates;
pub mod error;
