//! # Remote Episode Stores
//!
//! Storage backends that persist episodes through HTTP services, all built
//! on the [`HttpClient`](store_traits::http::HttpClient) seam:
//!
//! - [`RestApiStore`] - the reference generic REST adapter
//!   (`GET/POST /episodes`, `DELETE /episodes/{id}`); the object-store
//!   flavor is a configuration preset of the same implementation
//! - [`DocumentStore`] - BaaS document-table dialect (snake_case rows,
//!   RFC 3339 timestamps, key/bearer headers)
//! - [`GitHostedStore`] - version-control-hosted JSON store, one file per
//!   episode committed through the repository contents API
//!
//! [`ReqwestHttpClient`] is the production `HttpClient`; tests script the
//! seam with `mockall` doubles instead.
//!
//! Every adapter reports cheap availability (placeholder-credential checks)
//! so the fallback orchestrator can skip it without a network round trip.

pub mod client;
pub mod document;
pub mod error;
pub mod git;
pub mod rest;
pub mod types;

pub use client::ReqwestHttpClient;
pub use document::{DocumentStore, DocumentStoreConfig};
pub use error::{RemoteStoreError, Result};
pub use git::{GitHostedStore, GitHostedConfig};
pub use rest::{RestApiConfig, RestApiStore};
