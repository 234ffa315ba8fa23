pub mod config;
pub mod error;
pub mod result;

pub use config::{AppConfig, DragConfig, NotificationConfig, SyncConfig};
pub use error::BoardError;
pub use result::BoardResult;
