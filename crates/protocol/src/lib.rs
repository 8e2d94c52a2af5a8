//! Canonical types for session bundle import.
//!
//! This crate contains the serde-serializable shapes shared by the import
//! engine and its callers:
//!
//! - [`CookieRecord`] - one captured cookie, lossless over unknown attributes
//! - [`SessionBundle`] - cookies plus a localStorage map, the normalized form
//! - [`ReplayReport`] - per-key outcome of writing storage into a store
//!
//! Types here are pure data. Normalization and replay live in `sb-core`.

pub mod bundle;
pub mod cookie;
pub mod report;

pub use bundle::*;
pub use cookie::*;
pub use report::*;
