//! # RestaurantLens Common Library
//!
//! Shared code for the RestaurantLens crates:
//! - Error type used on the configuration and bootstrap surface
//! - TOML configuration model, defaults and validation
//! - Configuration file resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
