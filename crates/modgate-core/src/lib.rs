pub mod config;
pub mod error;
pub mod models;
pub mod threshold;

pub use config::Config;
pub use error::AppError;
pub use threshold::ThresholdStore;
