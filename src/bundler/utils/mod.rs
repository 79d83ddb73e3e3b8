//! Shared utilities for staging operations.

pub mod checksum;
pub mod fs;
