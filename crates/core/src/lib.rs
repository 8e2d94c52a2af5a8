//! sb: session bundle import.
//!
//! Takes captured browser session data (cookies plus localStorage) in any of
//! the layouts capture tools produce, normalizes it into a
//! [`SessionBundle`], and replays the storage portion into a key/value store.
//!
//! ```ignore
//! use sb::{MemoryStore, import};
//!
//! let raw = serde_json::json!({
//!     "cookies": [{ "name": "sid", "value": "abc" }],
//!     "localStorage": "{\"token\":\"t\"}"
//! });
//! let store = MemoryStore::new();
//! let outcome = import(&raw, &store)?;
//! assert!(outcome.report.is_complete());
//! ```
//!
//! Cookies are normalized but never written anywhere: there is no cookie
//! store to replay them into from this side.

pub mod codec;
pub mod error;
pub mod import;
pub mod normalize;
pub mod replay;
pub mod store;

pub use codec::{decode_value, encode_value};
pub use error::{Error, Result, StoreError};
pub use import::{ImportOutcome, import, import_async};
pub use normalize::{BundleShape, Normalized, coerce_local_storage, normalize, normalize_detailed, normalize_shaped, normalize_str, parse_payload};
pub use replay::{apply, apply_async, read_value};
pub use sb_protocol::{CookieRecord, CookieRejection, ReplayReport, SameSite, SessionBundle};
pub use store::{AsyncKeyValueStore, FileStore, KeyValueStore, MemoryStore};
