//! Session authentication lifecycle.
//!
//! Two layers:
//! - [`CredentialStore`] persists the `{token, user, expiry}` tuple in
//!   durable storage and enforces expiry-based invalidation on read.
//! - [`Session`] is the in-memory view over it: login/register/logout
//!   and profile operations that call the backend and keep storage in
//!   sync, plus the derived `is_logged_in` / `is_admin` / `is_verified`
//!   predicates.
//!
//! ## Design Decisions
//! - No process-global session singleton — a `Session` is an explicit
//!   context object built from an `ApiClient` and a `CredentialStore`,
//!   and is what route guards consult.
//! - Malformed persisted data never errors; it degrades to the
//!   logged-out state.
//! - Cross-tab writes to shared storage are observed lazily, at the
//!   next `sync_from_storage` call (navigation time), not pushed.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialStore, CredentialTuple};
pub use session::Session;
