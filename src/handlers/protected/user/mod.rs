pub mod published_creations;
pub mod toggle_like;
pub mod user_creations;

pub use published_creations::published_creations;
pub use toggle_like::toggle_like;
pub use user_creations::user_creations;

use serde::Serialize;

use crate::database::Creation;

/// `{success: true, creations}`
#[derive(Debug, Serialize)]
pub struct CreationList {
    pub creations: Vec<Creation>,
}
