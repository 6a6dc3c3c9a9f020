//! Session management
//!
//! Login states and the per-identity session every path operation goes
//! through.

pub mod operations;
pub mod state;

pub use state::{Challenge, LoginState, Session};
