//! Pixabay search: a live image search provider for desktop search hosts
//!
//! Turns the terms a user types into a debounced, cancellable,
//! stale-response-safe query against the Pixabay API, and caches the
//! results so the host can render and activate them later.

pub mod cache;
pub mod config;
pub mod launcher;
pub mod locales;
pub mod metrics;
pub mod network;
pub mod query;
pub mod remote;
pub mod results;
pub mod search;

pub use cache::ResultCache;
pub use config::Settings;
pub use remote::{RemoteClient, RemoteFetchError};
pub use results::{ImageResult, ResultMeta, Sentinel};
pub use search::{ImageSearchProvider, SearchProvider, SearchSession};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
