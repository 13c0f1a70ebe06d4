pub mod listing;
pub mod profile;
