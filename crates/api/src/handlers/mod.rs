pub mod catalog;
pub mod jobs;
pub mod reports;
pub mod settings;
pub mod tournaments;
