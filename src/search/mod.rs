//! Search orchestration module
//!
//! The provider contract, the session state machine behind it and the
//! Pixabay-backed orchestrator that implements it.

mod models;
mod provider;
mod session;
mod traits;

pub use models::*;
pub use provider::ImageSearchProvider;
pub use session::{Flight, SearchSession, SessionPhase, Ticket};
pub use traits::*;
