//! Server-side models that are not part of the shared core types.

pub mod session;

pub use session::{CurrentAdmin, keys as session_keys};
