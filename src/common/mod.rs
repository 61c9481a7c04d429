//! # Common Components
//!
//! Shared utilities used by the library entry points and the `vault` binary.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration parsing and validation
//! - [`files`]: path-based image loading/saving and output naming

pub mod config;
pub mod files;
