//! # Clemens Configuration Library
//!
//! Type-safe configuration for the Clemens document processing crates.
//! Every setting that the extraction and export code used to read from
//! process-wide state lives here and is passed in explicitly by the caller.
//!
//! ## Features
//!
//! - Multi-format support (TOML, YAML, JSON)
//! - Environment variable overrides
//! - Validation of numeric thresholds
//! - Test utilities behind the `test-utils` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clemens_config::ConfigLoader;
//!
//! let config = ConfigLoader::load_from_file("clemens.toml")?;
//! println!("footer density: {}", config.extraction.footer_emoji_density);
//! # Ok::<(), clemens_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod loader;

#[cfg(feature = "test-utils")]
mod test_utils;

pub use config::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::*;

#[cfg(feature = "test-utils")]
pub use test_utils::*;
