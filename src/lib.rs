//! Client core for a vehicle-rental web application.
//!
//! What lives here:
//! - [`api`]: typed reqwest bindings over the backend REST contract
//!   (`{code, data, message}` envelope).
//! - [`auth`]: the credential store (durable `{token, user, expiry}`
//!   tuple with expiry-based invalidation) and the session store
//!   (login/register/logout/profile operations, derived predicates).
//! - [`guard`]: the route table and the per-navigation guard decision
//!   procedure.
//! - [`storage`], [`config`], [`model`], [`error`]: the supporting
//!   pieces.
//!
//! The session is an explicit context object — construct one per
//! client context and hand it to the guard; there is no process-global
//! state anywhere in the crate.
//!
//! ```no_run
//! use wheelhouse::api::ApiClient;
//! use wheelhouse::auth::{CredentialStore, Session};
//! use wheelhouse::config::ClientConfig;
//! use wheelhouse::guard::{RouteGuard, RouteTable};
//! use wheelhouse::storage::FileStorage;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), wheelhouse::Error> {
//! let config = ClientConfig::load();
//! let backend = Arc::new(FileStorage::new(&config.storage_dir)?);
//! let session = Session::new(
//!     ApiClient::new(&config)?,
//!     CredentialStore::new(backend),
//! );
//!
//! let guard = RouteGuard::default();
//! let table = RouteTable::default_table();
//! let decision = guard.check(&session, &table, "/orders");
//! if let Some(location) = guard.location_for(&decision) {
//!     // hand `location` to the UI router
//!     let _ = location;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod model;
pub mod storage;

pub use api::{ApiClient, Envelope, LoginCredentials, RegisterData};
pub use auth::{CredentialStore, CredentialTuple, Session};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use guard::{GuardDecision, Route, RouteGuard, RouteTable};
pub use model::{Role, UserRecord, VerificationStatus};
