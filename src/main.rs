use anyhow::{Context, Result, bail};
use clippings::assembly;
use clippings::backend::ApiClient;
use clippings::cli::{Cli, Commands, PhaseSequence};
use clippings::config::Config;
use clippings::mock::MockGenerator;
use clippings::session::{ExportOutcome, SessionController};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::future::Future;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Report {
            client,
            international,
            date,
            offline,
            seed,
        } => handle_report(&config, &client, international, date, offline, seed).await,
        Commands::Search { query } => handle_search(&config, &query).await,
        Commands::Clients => handle_clients(&config),
        Commands::Pdf {
            client,
            international,
            output,
        } => handle_pdf(&config, &client, international, output).await,
        Commands::Export {
            client,
            international,
            date,
            email,
        } => handle_export(&config, &client, international, date, email).await,
    }
}

async fn handle_report(
    config: &Config,
    client: &str,
    international: bool,
    date: Option<String>,
    offline: bool,
    seed: Option<u64>,
) -> Result<()> {
    let date = parse_optional_date(date)?;
    let mut session = new_session(config)?;

    if offline || seed.is_some() {
        session.select_client_offline(client, international, date, seed);
    } else {
        with_progress(session.select_client(client, international, date)).await;
    }

    let report = session
        .current_report()
        .context("No report was produced")?;
    println!("{}", assembly::render_preview(report));

    Ok(())
}

async fn handle_search(config: &Config, query: &str) -> Result<()> {
    let session = new_session(config)?;
    let suggestions = session.search_clients(query).await;

    if suggestions.is_empty() {
        println!("No matching clients");
    } else {
        for name in suggestions {
            println!("{name}");
        }
    }

    Ok(())
}

fn handle_clients(config: &Config) -> Result<()> {
    let session = new_session(config)?;

    for client in session.roster() {
        let industry = client.industry.as_deref().unwrap_or("-");
        let status = if client.is_active { "active" } else { "inactive" };
        println!("{}\t{}\t{}\t{}", client.id, client.name, industry, status);
    }

    Ok(())
}

async fn handle_pdf(
    config: &Config,
    client: &str,
    international: bool,
    output: Option<std::path::PathBuf>,
) -> Result<()> {
    let backend = ApiClient::new(config).context("Failed to create backend client")?;
    let bytes = with_progress(backend.generate_report(client, international))
        .await
        .context("PDF generation failed")?;

    let path = output.unwrap_or_else(|| {
        std::path::PathBuf::from(format!("{}-coverage.pdf", client.replace(' ', "_")))
    });
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to write PDF: {}", path.display()))?;

    println!("PDF saved: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

async fn handle_export(
    config: &Config,
    client: &str,
    international: bool,
    date: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let date = parse_optional_date(date)?;
    let mut session = new_session(config)?;

    with_progress(session.select_client(client, international, date)).await;

    match session.export_report(email.as_deref()).await {
        ExportOutcome::Exported {
            download_url,
            filename,
            email_id,
        } => {
            println!("Exported: {filename}");
            println!("- Download: {download_url}");
            if let Some(email_id) = email_id {
                println!("- Email sent: {email_id}");
            }
            Ok(())
        }
        ExportOutcome::Failed(message) => bail!(message),
        ExportOutcome::Ignored => bail!("No report available to export"),
    }
}

fn new_session(config: &Config) -> Result<SessionController> {
    let backend = ApiClient::new(config).context("Failed to create backend client")?;
    Ok(SessionController::new(backend, MockGenerator::new()))
}

/// Prints the cosmetic generation phases on a timer while the request runs.
/// The labels are decoupled from the request lifecycle on purpose.
async fn with_progress<F: Future>(future: F) -> F::Output {
    let progress = tokio::spawn(async {
        let mut phases = PhaseSequence::new();
        let mut ticker = tokio::time::interval(Duration::from_millis(600));
        loop {
            ticker.tick().await;
            println!("{}...", phases.advance());
        }
    });

    let output = future.await;
    progress.abort();
    output
}

fn parse_optional_date(input: Option<String>) -> Result<NaiveDate> {
    input
        .as_deref()
        .map(|date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date format: {date}. Example: 2025-07-22"))
        })
        .transpose()?
        .map_or_else(|| Ok(Local::now().date_naive()), Ok)
}
