pub mod config;
pub mod directory;
pub mod error;
pub mod ids;
pub mod records;
pub mod registration;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, HandlerError, StoreError};
pub use registration::RegistrationFinalizer;
