// Unauthenticated service endpoints
pub mod service;

pub use service::{health, root};
