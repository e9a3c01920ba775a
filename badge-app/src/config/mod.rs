//! Configuration: environment loading and validation.

pub mod app_config;
pub mod validation;

pub use app_config::{AppConfig, BackgroundKind};
pub use validation::{parse_identifier, validate_setting};
