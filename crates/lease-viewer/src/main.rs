/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::ServiceExt;
use axum::middleware::map_request;
use axum_template::engine::Engine;
use clap::{Parser, ValueEnum};
use common::AppState;
use config::{ConfigError, RuntimeConfig};
use eyre::WrapErr;
use tera::Tera;
use tokio::sync::Notify;
use tower_layer::Layer;
use tracing::metadata::LevelFilter;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

mod common;
mod config;
mod lease_file;
mod metrics;
mod middleware;
mod routes;
mod shutdown;

#[derive(Parser, Debug)]
#[clap(about = "Read-only web view of the leases handed out by ISC dhcpd")]
struct Args {
    #[clap(long, help = "Print version number and exit")]
    pub version: bool,

    #[clap(
        short = 'f',
        long,
        env = "LEASE_VIEWER_CONFIG_FILE",
        help = "Path to TOML configuration file"
    )]
    config_file: Option<PathBuf>,

    #[clap(long, env = "LEASE_VIEWER_BIND_ADDRESS", help = "Address to listen on")]
    bind_address: Option<IpAddr>,

    #[clap(short = 'p', long, env = "LEASE_VIEWER_BIND_PORT", help = "Port to listen on")]
    bind_port: Option<u16>,

    #[clap(
        short = 'l',
        long,
        env = "LEASE_VIEWER_LEASE_FILE",
        help = "Path to the dhcpd lease database"
    )]
    lease_file: Option<PathBuf>,

    #[clap(
        long,
        env = "LEASE_VIEWER_TEMPLATE_DIRECTORY",
        help = "Directory holding the HTML templates"
    )]
    template_directory: Option<PathBuf>,

    #[clap(
        short = 's',
        long,
        env = "LEASE_VIEWER_STATIC_DIRECTORY",
        help = "Directory holding css/, js/ and favicon.ico"
    )]
    static_dir: Option<PathBuf>,

    #[clap(
        long,
        env = "LEASE_VIEWER_SHUTDOWN_TIMEOUT",
        help = "Seconds to wait for in-flight requests on shutdown"
    )]
    shutdown_timeout: Option<u64>,

    #[clap(long, value_enum, env = "LEASE_VIEWER_LOG_FORMAT", default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Command line arguments win over the config file, which wins over the defaults
impl TryFrom<Args> for RuntimeConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mut config = if let Some(config_path) = args.config_file {
            RuntimeConfig::load(&config_path)?
        } else {
            RuntimeConfig::default()
        };

        if let Some(bind_address) = args.bind_address {
            config.bind_address = bind_address;
        }
        if let Some(bind_port) = args.bind_port {
            config.bind_port = bind_port;
        }
        if let Some(lease_file) = args.lease_file {
            config.lease_file = lease_file;
        }
        if let Some(template_directory) = args.template_directory {
            config.template_directory = template_directory;
        }
        if let Some(static_dir) = args.static_dir {
            config.static_directory = static_dir;
        }
        if let Some(shutdown_timeout) = args.shutdown_timeout {
            config.shutdown_timeout_secs = shutdown_timeout;
        }

        Ok(config)
    }
}

fn init_logging(log_format: LogFormat) -> eyre::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("tower=warn".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?);

    tracing_subscriber::registry()
        .with((log_format == LogFormat::Text).then(fmt::layer))
        .with((log_format == LogFormat::Json).then(|| fmt::layer().json()))
        .with(env_filter)
        .try_init()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    let args = Args::parse();
    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(args.log_format)?;

    let runtime_config = RuntimeConfig::try_from(args)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        lease_file = %runtime_config.lease_file.display(),
        "Starting lease-viewer"
    );

    if !runtime_config.static_directory.exists() {
        tracing::warn!(
            static_directory = %runtime_config.static_directory.display(),
            "Static directory does not exist, css/js/favicon requests will 404"
        );
    }

    let prometheus_handle = metrics::setup_prometheus()?;

    let tera = Tera::new(&runtime_config.template_glob()).wrap_err_with(|| {
        format!(
            "unable to load templates from {}",
            runtime_config.template_directory.display()
        )
    })?;

    let socket_addr = runtime_config.socket_addr();
    let shutdown_timeout = runtime_config.shutdown_timeout();

    let app_state = AppState {
        engine: Engine::from(tera),
        runtime_config,
        prometheus_handle,
    };

    let app = routes::build_router(app_state);
    let request_normalizing_middleware = map_request(middleware::normalize_url);
    let final_app = request_normalizing_middleware.layer(app); // this one has to wrap all the others for the map_request to be able to affect routing

    let listener = tokio::net::TcpListener::bind(socket_addr)
        .await
        .wrap_err_with(|| format!("unable to bind to {socket_addr}"))?;
    tracing::info!(%socket_addr, "Listening");

    let shutdown_requested = Arc::new(Notify::new());
    let server = axum::serve(
        listener,
        final_app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown({
        let shutdown_requested = shutdown_requested.clone();
        async move { shutdown_requested.notified().await }
    });
    let mut server_task = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server_task => {
            // Without a shutdown request the server only stops when something broke
            result?.wrap_err("server stopped unexpectedly")?;
            return Ok(());
        }
        _ = shutdown::signal() => {}
    }

    tracing::info!("Waiting for in-flight requests to finish");
    shutdown_requested.notify_one();

    match tokio::time::timeout(shutdown_timeout, server_task).await {
        Ok(result) => {
            result?.wrap_err("error during shutdown")?;
            tracing::info!("Server shutdown succeeded");
        }
        Err(_) => tracing::warn!(
            ?shutdown_timeout,
            "In-flight requests did not finish in time, exiting anyway"
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_args_override_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::try_parse_from([
            "lease-viewer",
            "--bind-address",
            "127.0.0.1",
            "--bind-port",
            "9000",
            "--lease-file",
            "/srv/dhcpd.leases",
            "--shutdown-timeout",
            "10",
        ])?;
        let config = RuntimeConfig::try_from(args)?;

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.lease_file, PathBuf::from("/srv/dhcpd.leases"));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
        assert_eq!(config.template_directory, PathBuf::from("web/template"));
        Ok(())
    }

    #[test]
    fn test_args_override_config_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let config_path = dir.path().join("lease-viewer.toml");
        std::fs::write(
            &config_path,
            "bind_port = 8443\nstatic_directory = \"/usr/share/lease-viewer/static\"\n",
        )?;

        let args = Args::try_parse_from([
            "lease-viewer",
            "--config-file",
            config_path.to_str().ok_or("temp path is not UTF-8")?,
            "--static-dir",
            "/opt/static",
        ])?;
        let config = RuntimeConfig::try_from(args)?;

        assert_eq!(config.bind_port, 8443);
        assert_eq!(config.static_directory, PathBuf::from("/opt/static"));
        Ok(())
    }

    #[test]
    fn test_log_format() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::try_parse_from(["lease-viewer", "--log-format", "json"])?;
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(Args::try_parse_from(["lease-viewer", "--log-format", "xml"]).is_err());
        Ok(())
    }
}
