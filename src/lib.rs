// Core modules
pub mod api;
pub mod cache;
pub mod config;
pub mod feed;
pub mod models;
pub mod patterns;
pub mod render;
pub mod session;
pub mod summary;

// Re-export commonly used types
pub use models::*;
pub use session::Session;
pub use summary::{assemble, assemble_all, SummaryRow};

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
