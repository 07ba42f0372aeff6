//! Shared primitive types used across the insight engine.

/// Opaque customer identifier (the `uid` column of the source data).
pub type CustomerId = String;

/// Dashboard user that owns a targeting preference.
pub type UserId = String;

/// Identifier of a stored marketing note.
pub type NoteId = String;

/// Monetary amount in won.
pub type Won = f64;

/// Sentinel used by the dashboard for "no restriction" on a targeting field.
pub const ALL_TARGETS: &str = "전체";

/// User that owns the shared targeting preference.
pub const DEFAULT_USER: &str = "admin";
