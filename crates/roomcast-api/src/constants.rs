//! API-wide constants.

/// Route prefix for all authenticated endpoints.
pub const API_PREFIX: &str = "/api";
