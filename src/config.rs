//! Configuration management for the image gallery service.
//!
//! Configuration comes from command-line arguments via clap, each with an
//! environment variable fallback, and sensible defaults for optional settings.
//!
//! # Environment Variables
//!
//! Storage (shared by `serve` and `check`):
//!
//! - `STORAGE_ACCOUNT_URL` - Public base URL for stored objects (required)
//! - `IMAGES_CONTAINER` - Container (bucket) name (default: lanternfly-images)
//! - `STORAGE_ACCESS_KEY_ID` - Storage access key id (required)
//! - `STORAGE_SECRET_ACCESS_KEY` - Storage secret access key (required)
//! - `STORAGE_ENDPOINT` - Custom endpoint for S3-compatible services
//! - `STORAGE_REGION` - Storage region (default: us-east-1)
//!
//! Server:
//!
//! - `GALLERY_HOST` - Server bind address (default: 0.0.0.0)
//! - `GALLERY_PORT` - Server port (default: 5000)
//! - `GALLERY_MAX_UPLOAD_SIZE` - Maximum upload body in bytes (default: 16 MiB)
//! - `GALLERY_CORS_ORIGINS` - Allowed CORS origins, comma separated (default: any)

use clap::{Args, Parser, Subcommand};
use url::Url;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default storage region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default image container name.
pub const DEFAULT_CONTAINER: &str = "lanternfly-images";

/// Default maximum upload request body (16 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Gallery - upload images to object storage and list them as URLs.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-gallery")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Arguments for the default `serve` command.
    #[command(flatten)]
    pub serve: ServeConfig,
}

impl Cli {
    /// Resolve the command to run, defaulting to `serve`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve(ServeConfig),

    /// Verify storage configuration and connectivity, then exit.
    Check(CheckConfig),
}

/// Storage backend settings.
#[derive(Args, Debug, Clone)]
pub struct StorageConfig {
    /// Public base URL used to build object URLs (`{url}/{container}/{key}`).
    #[arg(long, env = "STORAGE_ACCOUNT_URL")]
    pub account_url: Option<String>,

    /// Container (bucket) holding uploaded images.
    #[arg(long, default_value = DEFAULT_CONTAINER, env = "IMAGES_CONTAINER")]
    pub container: String,

    /// Access key id for the storage backend.
    #[arg(long, env = "STORAGE_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// Secret access key for the storage backend.
    #[arg(long, env = "STORAGE_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Custom endpoint URL for S3-compatible services (MinIO, R2, etc.).
    #[arg(long = "storage-endpoint", env = "STORAGE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Storage region.
    #[arg(long = "storage-region", default_value = DEFAULT_REGION, env = "STORAGE_REGION")]
    pub region: String,
}

impl StorageConfig {
    /// Validate storage settings.
    ///
    /// Missing credentials are reported here so the process fails at
    /// startup instead of on the first request.
    pub fn validate(&self) -> Result<(), String> {
        let account_url = match self.account_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                return Err(
                    "Storage account URL is required. Set --account-url or STORAGE_ACCOUNT_URL"
                        .to_string(),
                )
            }
        };
        check_http_url("account URL", account_url)?;

        if self.container.is_empty() {
            return Err(
                "Container name is required. Set --container or IMAGES_CONTAINER".to_string(),
            );
        }

        if self.access_key_id.as_deref().map_or(true, str::is_empty)
            || self.secret_access_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(
                "Storage credentials are missing. Set STORAGE_ACCESS_KEY_ID and \
                 STORAGE_SECRET_ACCESS_KEY"
                    .to_string(),
            );
        }

        if let Some(ref endpoint) = self.endpoint {
            check_http_url("storage endpoint", endpoint)?;
        }

        Ok(())
    }

    /// The account URL, or an empty string if unset (call validate() first).
    pub fn account_url_or_empty(&self) -> &str {
        self.account_url.as_deref().unwrap_or("")
    }

    /// The credential pair, or empty strings if unset (call validate() first).
    pub fn credentials_or_empty(&self) -> (&str, &str) {
        (
            self.access_key_id.as_deref().unwrap_or(""),
            self.secret_access_key.as_deref().unwrap_or(""),
        )
    }
}

fn check_http_url(what: &str, value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("Invalid {} '{}': {}", what, value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!(
            "Invalid {} '{}': scheme must be http or https, got '{}'",
            what, value, other
        )),
    }
}

/// Arguments for the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "GALLERY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "GALLERY_PORT")]
    pub port: u16,

    /// Maximum upload request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE, env = "GALLERY_MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "GALLERY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    #[command(flatten)]
    pub storage: StorageConfig,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.storage.validate()?;

        if self.max_upload_size == 0 {
            return Err("max_upload_size must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub storage: StorageConfig,

    /// List every object in the container.
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CheckConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.storage.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
