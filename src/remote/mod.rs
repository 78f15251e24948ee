//! Remote image search
//!
//! Defines the `RemoteClient` trait the search session drives, and the
//! Pixabay implementation of it.

mod error;
mod traits;

pub mod pixabay;

pub use error::{FetchError, RemoteFetchError};
pub use pixabay::Pixabay;
pub use traits::*;
