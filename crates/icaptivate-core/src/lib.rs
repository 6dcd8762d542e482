pub mod api;
pub mod config;
pub mod error;
pub mod navigation;
pub mod state;

// Re-export main types for convenience
pub use api::{ApiClient, DEFAULT_API_URL};
pub use config::Config;
pub use error::{ApiError, NavigationError, ToneOutOfRange};
pub use navigation::{Navigator, Route, Session, Tab};
pub use state::{Perspective, Suggestion, ToneLevel};
