// # mxdnsctl - MX Local DNS command line
//
// This binary is a THIN presentation layer over mxdns-core:
// - Reading configuration from environment variables
// - Initializing logging and the runtime
// - Registering transports
// - Turning subcommands into manager calls and printing the result
//
// No DNS or API logic lives here.
//
// ## Configuration
//
// - `MXDNS_API_KEY`: Dashboard API key (falls back to `MK_CSM_KEY`)
// - `MXDNS_BASE_URL`: API base URL (default `https://api.meraki.com/api/v1`)
// - `MXDNS_ORGANIZATIONS_TTL_SECS`: Organization list cache lifetime (default 86400)
// - `MXDNS_NETWORKS_TTL_SECS`: Network list cache lifetime (default 3600)
// - `MXDNS_LOG_LEVEL`: trace, debug, info, warn, error (default warn)
// - `MXDNS_MODE`: set to `dry-run` to log mutations instead of sending them
//
// ## Example
//
// ```bash
// export MXDNS_API_KEY=your_key
// mxdnsctl --org "Acme" profiles create Eng
// mxdnsctl --org "Acme" records create --profile 123 db.local 10.0.0.5
// ```

mod cli;
mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use mxdns_core::config::{CacheConfig, DEFAULT_BASE_URL};
use mxdns_core::{ManagerConfig, TransportConfig};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};

/// Exit codes
///
/// - 0: Command succeeded
/// - 1: Configuration or startup error
/// - 2: The command failed (remote error, rejected mutation, bad input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtlExitCode {
    Success = 0,
    ConfigError = 1,
    CommandFailed = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Environment configuration
pub struct Config {
    api_key: Option<String>,
    api_key_source: Option<&'static str>,
    base_url: String,
    organizations_ttl_secs: u64,
    networks_ttl_secs: u64,
    log_level: String,
    dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let defaults = CacheConfig::default();
        Self::from_lookup(|name| env::var(name).ok(), defaults)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, defaults: CacheConfig) -> Self {
        let (api_key, api_key_source) = ["MXDNS_API_KEY", "MK_CSM_KEY"]
            .into_iter()
            .find_map(|name| {
                lookup(name)
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| (Some(value.trim().to_string()), Some(name)))
            })
            .unwrap_or((None, None));

        Self {
            api_key,
            api_key_source,
            base_url: lookup("MXDNS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            organizations_ttl_secs: lookup("MXDNS_ORGANIZATIONS_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.organizations_ttl_secs),
            networks_ttl_secs: lookup("MXDNS_NETWORKS_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.networks_ttl_secs),
            log_level: lookup("MXDNS_LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
            dry_run: lookup("MXDNS_MODE").is_some_and(|mode| mode.eq_ignore_ascii_case("dry-run")),
        }
    }

    fn cache(&self) -> CacheConfig {
        CacheConfig {
            organizations_ttl_secs: self.organizations_ttl_secs,
            networks_ttl_secs: self.networks_ttl_secs,
        }
    }

    /// Validate everything except the API key
    fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            anyhow::bail!(
                "MXDNS_BASE_URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            );
        }

        self.cache().validate().map_err(|e| {
            anyhow::anyhow!(
                "{}. Check MXDNS_ORGANIZATIONS_TTL_SECS and MXDNS_NETWORKS_TTL_SECS",
                e
            )
        })?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "MXDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Build the manager configuration; requires an API key
    fn manager_config(&self) -> Result<ManagerConfig> {
        let Some(api_key) = self.api_key.clone() else {
            anyhow::bail!(
                "MXDNS_API_KEY is required. \
                Set it via: export MXDNS_API_KEY=your_key"
            );
        };

        let config = ManagerConfig {
            transport: TransportConfig::Dashboard {
                api_key,
                base_url: self.base_url.clone(),
                timeout_secs: 30,
            },
            cache: self.cache(),
        };
        config.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    // Logs go to stderr so stdout stays parseable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    if matches!(cli.command, Commands::Config) {
        return match commands::show_config(&config, cli.format) {
            Ok(()) => CtlExitCode::Success.into(),
            Err(e) => {
                eprintln!("Error: {}", e);
                CtlExitCode::CommandFailed.into()
            }
        };
    }

    let manager_config = match config.manager_config() {
        Ok(manager_config) => manager_config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    info!(
        base_url = %config.base_url,
        dry_run = config.dry_run,
        "Starting mxdnsctl"
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::CommandFailed.into();
        }
    };

    let code = rt.block_on(async {
        match commands::run(cli, &manager_config).await {
            Ok(code) => code,
            Err(e) => {
                error!("Command failed: {:#}", e);
                eprintln!("Error: {:#}", e);
                if let Some(hint) = commands::retry_hint(&e) {
                    eprintln!("{}", hint);
                }
                CtlExitCode::CommandFailed
            }
        }
    });

    code.into()
}
