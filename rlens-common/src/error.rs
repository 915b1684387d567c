//! Common error types for RestaurantLens

use thiserror::Error;

/// Common result type for RestaurantLens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration or bootstrapping the engine.
///
/// Analysis calls never surface these; they degrade instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
