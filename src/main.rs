//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `asin_extractor` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io;
use std::process;

use asin_extractor::collector::collect_from_html;
use asin_extractor::config::{Cli, Command, WebhookArgs, DEFAULT_AMAZON_DOMAIN};
use asin_extractor::export::{export_file_name, export_results};
use asin_extractor::identifier::{build_amazon_url, parse_asin_input, Asin};
use asin_extractor::initialization::{init_client, init_logger_with};
use asin_extractor::status_server::{start_status_server, StatusState};
use asin_extractor::store::{CollectedItem, WebhookConfigUpdate};
use asin_extractor::webhook::{masked_headers, payload_preview, WebhookClient};
use asin_extractor::{run_extraction_job, Config, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env from the current directory, then from next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = Config::from(&cli);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli.command, config).await {
        eprintln!("asin_extractor error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn webhook_update(args: WebhookArgs) -> WebhookConfigUpdate {
    WebhookConfigUpdate {
        url: args.url,
        username: args.username,
        password: args.password,
        mode: args.mode,
    }
}

async fn add_items(store: &Store, items: Vec<CollectedItem>) -> Result<(usize, usize)> {
    let mut added = 0;
    let mut duplicates = 0;
    for item in items {
        if store.add_asin(item).await? {
            added += 1;
        } else {
            duplicates += 1;
        }
    }
    Ok((added, duplicates))
}

async fn run(command: Command, config: Config) -> Result<()> {
    let store = Store::open(&config.db_path)
        .await
        .context("Failed to open store")?;

    match command {
        Command::Extract(cmd) => {
            let report = run_extraction_job(config, cmd.asins, cmd.send).await?;
            println!(
                "✅ Extracted {} product{} ({} succeeded, {} failed) in {:.1}s - extraction {}",
                report.total,
                if report.total == 1 { "" } else { "s" },
                report.successful,
                report.failed,
                report.elapsed_seconds,
                report.extraction_id
            );
            println!("Results saved in {}", report.db_path.display());
            if let Some(response) = report.webhook {
                println!(
                    "Webhook responded {} {}",
                    response.status, response.status_text
                );
            }
        }
        Command::Add { input } => {
            let mut items = Vec::new();
            let mut invalid = Vec::new();
            for raw in parse_asin_input(&input.join("\n")) {
                match Asin::parse(&raw) {
                    Ok(asin) => items.push(CollectedItem::manual(
                        asin.as_str(),
                        build_amazon_url(&asin, DEFAULT_AMAZON_DOMAIN),
                    )),
                    Err(_) => invalid.push(raw),
                }
            }
            let (added, duplicates) = add_items(&store, items).await?;
            println!("Added {added}, skipped {duplicates} duplicate(s)");
            if !invalid.is_empty() {
                println!("Invalid identifiers ignored: {}", invalid.join(", "));
            }
        }
        Command::Remove { asin } => {
            if store.remove_asin(asin.trim()).await? {
                println!("Removed {}", asin.trim());
            } else {
                println!("{} is not in the list", asin.trim());
            }
        }
        Command::List => print_json(&store.classify_asins().await?)?,
        Command::Collect { file, url } => {
            let html = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let items = collect_from_html(url.as_deref(), &html);
            let found = items.len();
            let (added, duplicates) = add_items(&store, items).await?;
            println!("Found {found} product(s): added {added}, skipped {duplicates} duplicate(s)");
        }
        Command::Keywords { value } => match value {
            Some(keywords) => {
                store.set_keywords(&keywords).await?;
                println!("Keywords saved");
            }
            None => println!("{}", store.get_keywords().await?),
        },
        Command::Status => print_json(&store.get_extraction_status().await?)?,
        Command::Results { format, output } => {
            let results = store.get_extraction_results().await?;
            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(export_file_name(&results, format))
                    } else {
                        path
                    };
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                    export_results(&results, format, io::BufWriter::new(file))?;
                    println!("Results exported to {}", path.display());
                }
                None => export_results(&results, format, io::stdout().lock())?,
            }
        }
        Command::Send { mode, preview } => {
            let webhook = store.get_webhook_config().await?;
            let mode = mode.unwrap_or(webhook.mode);
            if preview {
                let (payload, validation) = payload_preview(&store, mode).await?;
                print_json(&validation)?;
                print_json(&payload)?;
                return Ok(());
            }
            let client = init_client(&config)?;
            let response = WebhookClient::new(client)
                .send(&store, mode, &webhook)
                .await?;
            print_json(&response)?;
            if !response.success {
                anyhow::bail!("Webhook rejected the payload ({})", response.status);
            }
        }
        Command::TestWebhook(args) => {
            let webhook = webhook_update(args).apply_to(store.get_webhook_config().await?);
            print_json(&masked_headers(&webhook.username, &webhook.password))?;
            let client = init_client(&config)?;
            let response = WebhookClient::new(client).test_connection(&webhook).await?;
            print_json(&response)?;
            if !response.success {
                anyhow::bail!("Webhook test failed ({})", response.status);
            }
        }
        Command::ConfigureWebhook(args) => {
            let saved = store.set_webhook_config(webhook_update(args)).await?;
            println!("Webhook set to {} ({})", saved.url, saved.mode.as_str());
        }
        Command::Export { output } => {
            let envelope = store.export_data().await?;
            tokio::fs::write(&output, serde_json::to_string_pretty(&envelope)?)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Exported to {}", output.display());
        }
        Command::Import { input } => {
            let raw = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let document: serde_json::Value =
                serde_json::from_str(&raw).context("Import file is not valid JSON")?;
            store.import_data(&document).await?;
            println!("Imported {}", input.display());
        }
        Command::Clear { extraction_only } => {
            if extraction_only {
                store.clear_extraction_data().await?;
                println!("Extraction data cleared");
            } else {
                store.clear().await?;
                println!("All data cleared");
            }
        }
        Command::Usage => print_json(&store.storage_usage().await?)?,
        Command::Serve { port } => {
            start_status_server(port, StatusState::new(store)).await?;
        }
    }
    Ok(())
}
