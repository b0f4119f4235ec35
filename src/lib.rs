pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod import;
pub mod models;
pub mod normalize;
pub mod search;
pub mod services;
pub mod state;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, UserCommands};
pub use config::Config;

pub async fn run() -> anyhow::Result<()> {
    run_with(Cli::parse()).await
}

/// Help and `init` run before the config is read, so a broken config file
/// can still be replaced.
pub async fn run_with(cli: Cli) -> anyhow::Result<()> {
    let command = match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
        Some(Commands::Init) => return init_config(),
        Some(command) => command,
    };

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    match command {
        Commands::Serve => run_server(config).await,

        Commands::Import {
            path,
            user,
            format,
            dry_run,
        } => cli::cmd_import(&config, &path, &user, format.map(Into::into), dry_run).await,

        Commands::Export { output } => cli::cmd_export(&config, output).await,

        Commands::Search {
            query,
            company,
            document_type,
        } => cli::cmd_search(&config, &query.join(" "), company, document_type).await,

        Commands::Users { command } => match command {
            UserCommands::List => cli::cmd_users_list(&config).await,
            UserCommands::Add {
                username,
                password,
                admin,
            } => cli::cmd_users_add(&config, &username, password, admin).await,
            UserCommands::Remove { username } => cli::cmd_users_remove(&config, &username).await,
            UserCommands::ResetPassword { username } => {
                cli::cmd_users_reset_password(&config, &username).await
            }
        },

        Commands::Init => init_config(),
    }
}

fn init_config() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("✓ Config file created. Edit config.toml and run again.");
    } else {
        println!("config.toml already exists, left untouched.");
    }
    Ok(())
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn init_metrics(config: &Config) -> anyhow::Result<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    use metrics_exporter_prometheus::PrometheusBuilder;
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");
    Ok(Some(handle))
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let prometheus_handle = init_metrics(&config)?;
    let port = config.server.port;

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Web Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_help_does_not_read_config() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var(config::PORT_ENV, "not-a-port") };
        assert!(Config::load().is_err());

        let cli = Cli::try_parse_from(["frases"]).unwrap();
        let result = run_with(cli).await;

        unsafe { std::env::remove_var(config::PORT_ENV) };
        assert!(result.is_ok());
    }
}
