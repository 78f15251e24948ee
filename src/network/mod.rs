//! HTTP networking module
//!
//! Provides the HTTP transport used by the remote image client.

mod client;

pub use client::HttpClient;
