//! # Vault Binary Entry Point
//!
//! Command-line front end for hiding images inside noise carriers.
//!
//! ## Usage
//!
//! ```bash
//! vault encrypt photo.jpg                      # -> photo_encrypted.png
//! vault decrypt photo_encrypted.png            # -> photo_decrypted.png
//! vault detect suspicious.png --json
//! vault demo --dir /tmp/vault-demo
//! ```
//!
//! The password comes from `--password`, the `VAULT_PASSWORD` environment
//! variable, or an echo-free terminal prompt, in that order.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use decoy_vault::common::config::VaultConfig;
use decoy_vault::common::files::{self, encrypted_output_path};
use decoy_vault::processing::sample::sample_image;
use decoy_vault::processing::{detector, worker};
use decoy_vault::utils::init_logger;
use decoy_vault::VaultError;

/// Command-line arguments for the vault binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide an image inside a noise carrier
    Encrypt {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, env = "VAULT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Recover the image hidden in a carrier
    Decrypt {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, env = "VAULT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Attempt decryption even if the input does not look like a container
        #[arg(long)]
        force: bool,
    },
    /// Guess whether an image is a carrier
    Detect {
        input: PathBuf,
        /// Print the full header report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a sample picture and round-trip it through the vault
    Demo {
        /// Directory for the demo files
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(short, long, default_value = "my_secret_password_123")]
        password: String,
    },
}

/// Prompt until a non-empty password is entered, unless one was supplied.
fn resolve_password(supplied: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = supplied {
        if password.is_empty() {
            bail!(VaultError::EmptyPassword);
        }
        return Ok(password);
    }

    loop {
        let password = rpassword::prompt_password("Password: ").context("reading password")?;
        if password.is_empty() {
            warn!("❌ Password cannot be empty! Try again.");
            continue;
        }
        if confirm {
            let again = rpassword::prompt_password("Confirm password: ")
                .context("reading password confirmation")?;
            if again != password {
                warn!("❌ Passwords do not match! Try again.");
                continue;
            }
        }
        return Ok(password);
    }
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => VaultConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VaultConfig::default(),
    };
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logger(level);

    if let Err(e) = run(args.command, &config).await {
        match e.downcast_ref::<VaultError>() {
            Some(VaultError::AuthenticationError) => {
                error!("❌ Decryption failed! Wrong password or corrupted file.")
            }
            _ => error!("❌ {:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Command, config: &VaultConfig) -> Result<()> {
    let codec = config.codec()?;

    match command {
        Command::Encrypt {
            input,
            output,
            password,
        } => {
            let image = files::load_image(&input)?;
            if detector::looks_like_container(&image) {
                warn!(
                    "⚠️  {} already looks like an encrypted carrier; encrypting it again",
                    input.display()
                );
            }
            let password = resolve_password(password, true)?;

            info!(
                "🔒 Encrypting {} ({}x{})...",
                input.display(),
                image.width(),
                image.height()
            );
            let encoded = worker::encode_in_background(codec, image, password).await?;

            let output = output
                .unwrap_or_else(|| encrypted_output_path(&input, &config.output.encrypted_suffix));
            files::save_png(&encoded.image, &output)?;

            info!(
                "✅ Carrier saved to {} ({}x{}, {} bytes)",
                output.display(),
                encoded.image.width(),
                encoded.image.height(),
                file_size(&output)
            );
        }

        Command::Decrypt {
            input,
            output,
            password,
            force,
        } => {
            let container = files::load_image(&input)?;
            if !detector::looks_like_container(&container) {
                if !force {
                    bail!(
                        "{} does not look like an encrypted carrier (use --force to try anyway)",
                        input.display()
                    );
                }
                warn!("⚠️  {} does not look like a carrier; trying anyway", input.display());
            }
            let password = resolve_password(password, false)?;

            info!("🔓 Decrypting {}...", input.display());
            let image = worker::decode_in_background(codec, container, password).await?;

            let output = output.unwrap_or_else(|| {
                files::decrypted_output_path(
                    &input,
                    &config.output.encrypted_suffix,
                    &config.output.decrypted_suffix,
                )
            });
            files::save_png(&image, &output)?;

            info!(
                "✅ Recovered {}x{} image saved to {}",
                image.width(),
                image.height(),
                output.display()
            );
        }

        Command::Detect { input, json } => {
            let image = files::load_image(&input)?;
            let report = detector::inspect(&image);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.looks_like_container {
                println!(
                    "{}: looks like a carrier ({} payload bytes in {} pixels)",
                    input.display(),
                    report.declared_len.unwrap_or(0),
                    report.available_pixels
                );
            } else {
                println!("{}: does not look like a carrier", input.display());
            }
        }

        Command::Demo { dir, password } => {
            std::fs::create_dir_all(&dir)?;

            let original_path = dir.join("test_image.png");
            let original = sample_image(400, 300);
            files::save_png(&original, &original_path)?;
            info!("📸 Created test image: {}", original_path.display());

            let (encrypted_path, _) = files::encrypt_file(
                &codec,
                &config.output,
                &original_path,
                &password,
                None,
            )?;
            info!(
                "🔒 Encrypted: {} ({} -> {} bytes)",
                encrypted_path.display(),
                file_size(&original_path),
                file_size(&encrypted_path)
            );

            let decrypted_path =
                files::decrypt_file(&codec, &config.output, &encrypted_path, &password, None)?;
            info!("🔓 Decrypted: {}", decrypted_path.display());

            let recovered = files::load_image(&decrypted_path)?;
            if recovered != original {
                bail!("demo round-trip produced a different image");
            }
            info!("✅ Round-trip verified: recovered image is pixel-identical");

            match files::decrypt_file(
                &codec,
                &config.output,
                &encrypted_path,
                "definitely-wrong",
                Some(dir.join("should_not_exist.png").as_path()),
            ) {
                Err(VaultError::AuthenticationError) => {
                    info!("✅ Wrong password correctly rejected")
                }
                Ok(_) => bail!("wrong password was accepted"),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
