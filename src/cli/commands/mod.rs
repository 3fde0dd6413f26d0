pub mod creations;
pub mod token;
pub mod usage;
