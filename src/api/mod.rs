pub mod router;
pub mod state;

pub use router::app;
pub use state::AppState;
