//! Luma REST API entry point.
//!
//! Binary name: `luma`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then runs
//! the requested command.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use luma_infra::config::{load_config, resolve_data_dir};
use luma_observe::tracing_setup::{LogFormat, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "luma", &mut std::io::stdout());
        return Ok(());
    }

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(cli.log_directive(), format, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;
    tracing::debug!(data_dir = %data_dir.display(), ?config, "loaded configuration");

    let result = run(cli.command, data_dir, config).await;
    shutdown_tracing();
    result
}

async fn run(
    command: Commands,
    data_dir: std::path::PathBuf,
    config: luma_types::config::AppConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Migrate => {
            // Opening the pool applies pending migrations.
            let db_pool = state::open_database(&data_dir, &config).await?;
            db_pool.writer.close().await;
            db_pool.reader.close().await;
            println!(
                "  {} Database is up to date",
                console::style("✓").green().bold()
            );
        }

        Commands::Serve { port, host } => {
            let state = AppState::init(data_dir, &config).await?;
            print_banner(&state, &config);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Luma API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}/api/v1")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Print what the server is running with, so a missing key is obvious.
fn print_banner(state: &AppState, config: &luma_types::config::AppConfig) {
    let check = |ok: bool| {
        if ok {
            format!("{}", console::style("✓").green())
        } else {
            format!("{}", console::style("✗").red())
        }
    };

    println!();
    println!("  {}", console::style("Luma").cyan().bold());
    println!(
        "  {}  {}",
        console::style("Data:").bold(),
        console::style(state.data_dir.display()).dim()
    );
    println!(
        "  {} Anthropic {}",
        check(state.chat_configured),
        console::style(&config.anthropic.model).dim()
    );
    println!(
        "  {} Mail via {}",
        check(state.mail_transport == "smtp"),
        state.mail_transport
    );
    println!();
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
