//! Image Gallery - upload images to object storage and list them.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_gallery::{
    config::{CheckConfig, Cli, Command, ServeConfig, StorageConfig},
    create_router, create_s3_client, RouterConfig, S3ObjectStore, StorageGateway,
};

/// Keys requested when checking container access at startup.
const ACCESS_CHECK_KEYS: i32 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    // Missing credentials fail here, before anything is served
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    print_banner();

    let storage = &config.storage;
    info!("Configuration:");
    info!("  Account URL: {}", storage.account_url_or_empty());
    info!("  Container: {}", storage.container);
    if let Some(ref endpoint) = storage.endpoint {
        info!("  Storage endpoint: {}", endpoint);
    }
    info!("  Storage region: {}", storage.region);
    info!("  Max upload size: {} bytes", config.max_upload_size);
    if config.cors_origins.is_none() {
        warn!("  CORS: any origin");
    }

    let store = build_store(storage).await;

    info!("");
    info!("Connecting to storage...");
    match store.check_access(ACCESS_CHECK_KEYS).await {
        Ok(_) => info!("  Connected successfully"),
        Err(e) => {
            error!("  Failed to reach container '{}': {}", storage.container, e);
            error!("");
            error!("  Please check:");
            error!("    - STORAGE_ACCESS_KEY_ID / STORAGE_SECRET_ACCESS_KEY are correct");
            error!("    - The container '{}' exists and is accessible", storage.container);
            error!("    - The storage endpoint is correct (if using MinIO/custom S3)");
            return ExitCode::FAILURE;
        }
    }

    let gateway = StorageGateway::new(store, storage.account_url_or_empty());
    let router = create_router(gateway, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/api/v1/gallery", addr);
    info!(
        "    curl -F file=@photo.jpg http://{}/api/v1/upload",
        addr
    );
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Print the startup banner.
fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    info!("");
    info!("  ┌─┐┌─┐┬  ┬  ┌─┐┬─┐┬ ┬");
    info!("  │ ┬├─┤│  │  ├┤ ├┬┘└┬┘");
    info!("  └─┘┴ ┴┴─┘┴─┘└─┘┴└─ ┴   image-gallery v{}", version);
    info!("");
}

async fn build_store(storage: &StorageConfig) -> S3ObjectStore {
    let (access_key_id, secret_access_key) = storage.credentials_or_empty();
    let client = create_s3_client(
        storage.endpoint.as_deref(),
        &storage.region,
        access_key_id,
        secret_access_key,
    )
    .await;
    S3ObjectStore::new(client, storage.container.clone())
}

/// Resolve when Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_gallery=debug,tower_http=debug"
    } else {
        "image_gallery=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_max_upload_size(config.max_upload_size);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("Image Gallery Configuration Check");
    println!("═════════════════════════════════");
    println!();

    if let Err(e) = config.validate() {
        println!("✗ Configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let storage = &config.storage;
    println!("✓ Account URL: {}", storage.account_url_or_empty());
    println!("✓ Container: {}", storage.container);
    if let Some(ref endpoint) = storage.endpoint {
        println!("✓ Endpoint: {}", endpoint);
    }
    println!("✓ Region: {}", storage.region);
    println!();

    print!("Testing storage connection... ");

    let store = build_store(storage).await;

    if let Err(e) = store.check_access(ACCESS_CHECK_KEYS).await {
        println!("✗ failed");
        println!();
        println!("Error: {}", e);
        println!();
        println!("Please check:");
        println!("  - Your storage credentials are correct");
        println!("  - The container '{}' exists and is accessible", storage.container);
        if storage.endpoint.is_some() {
            println!("  - The storage endpoint is correct and reachable");
        }
        return ExitCode::FAILURE;
    }
    println!("✓ success");

    if config.list {
        println!();
        println!("Objects in container:");
        println!("─────────────────────");

        let gateway = StorageGateway::new(store, storage.account_url_or_empty());
        match gateway.list().await {
            Ok(objects) if objects.is_empty() => println!("  (no objects found)"),
            Ok(objects) => {
                for obj in &objects {
                    let url = gateway.url_for(&obj.name);
                    match obj.size {
                        Some(size) => println!("  {} ({} bytes)", url, size),
                        None => println!("  {}", url),
                    }
                }
                println!();
                println!("Total: {} object(s)", objects.len());
            }
            Err(e) => {
                println!("  Error listing objects: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    println!();
    println!("═════════════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}
