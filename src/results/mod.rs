//! Result types
//!
//! Image records decoded from the remote API, the sentinel pseudo-results
//! and the metadata shape handed to the host.

mod types;

pub use types::*;
