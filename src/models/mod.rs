pub mod entry;
pub mod mood;
