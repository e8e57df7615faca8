//! Application Layer - Use Cases

pub mod checklists;
pub mod config;
pub mod divisions;
pub mod injuries;
pub mod matches;
pub mod medical_files;
pub mod players;
pub mod treatments;
pub mod upload;

pub use config::ClinicConfig;
pub use upload::UploadedFile;
