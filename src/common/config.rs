//! # Configuration Utilities
//!
//! TOML configuration for the vault. Every section is optional; a missing file
//! section falls back to the defaults below.
//!
//! ```toml
//! [kdf]
//! iterations = 100000
//!
//! [container]
//! max_canvas_pixels = 64000000
//!
//! [output]
//! encrypted_suffix = "_encrypted"
//! decrypted_suffix = "_decrypted"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::crypto::kdf::{KeyDerivation, MIN_ITERATIONS};
use crate::error::{Result, VaultError};
use crate::processing::container::ContainerCodec;
use crate::processing::packer::PixelPacker;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Example
/// ```ignore
/// let config: VaultConfig = load_config("config/vault.toml")?;
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(VaultError::InputNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)
        .map_err(|e| VaultError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub kdf: KdfConfig,
    pub container: ContainerConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Key stretching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    /// PBKDF2 rounds; must be at least 100,000
    pub iterations: u32,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            iterations: MIN_ITERATIONS,
        }
    }
}

/// Carrier layout settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Upper bound on carrier pixels; `None` lets the canvas grow without limit
    pub max_canvas_pixels: Option<u64>,
}

/// Naming of generated files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the input stem when writing a container (e.g. "photo_encrypted.png")
    pub encrypted_suffix: String,
    /// Appended (or substituted for the encrypted suffix) when writing a recovered image
    pub decrypted_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            encrypted_suffix: "_encrypted".to_string(),
            decrypted_suffix: "_decrypted".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl VaultConfig {
    /// Read, parse and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: VaultConfig = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that the type system cannot.
    pub fn validate(&self) -> Result<()> {
        KeyDerivation::with_iterations(self.kdf.iterations)?;

        if self.container.max_canvas_pixels == Some(0) {
            return Err(VaultError::Config(
                "container.max_canvas_pixels must be positive".to_string(),
            ));
        }

        let out = &self.output;
        if out.encrypted_suffix.is_empty() || out.decrypted_suffix.is_empty() {
            return Err(VaultError::Config("output suffixes must not be empty".to_string()));
        }
        if out.encrypted_suffix == out.decrypted_suffix {
            return Err(VaultError::Config(
                "output suffixes must differ from each other".to_string(),
            ));
        }

        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(VaultError::Config(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Build a codec from these settings.
    pub fn codec(&self) -> Result<ContainerCodec> {
        let kdf = KeyDerivation::with_iterations(self.kdf.iterations)?;
        let packer = PixelPacker::with_max_canvas_pixels(self.container.max_canvas_pixels);
        Ok(ContainerCodec::with_parts(kdf, packer))
    }
}
