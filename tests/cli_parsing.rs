//! Tests for CLI subcommand parsing.

use clap::Parser;
use std::path::PathBuf;

use asin_extractor::config::{Cli, Command, LogFormat, LogLevel, WebhookMode};
use asin_extractor::export::ExportFormat;
use asin_extractor::Config;

#[test]
fn test_global_defaults() {
    let cli = Cli::try_parse_from(["asin_extractor", "list"]).expect("Should parse list");
    assert!(matches!(cli.log_level, LogLevel::Info));
    assert!(matches!(cli.log_format, LogFormat::Plain));
    assert_eq!(cli.timeout_seconds, 30);
    assert!(cli.status_port.is_none());
    assert!(matches!(cli.command, Command::List));
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "asin_extractor",
        "status",
        "--log-format",
        "json",
        "--db-path",
        "/tmp/products.db",
    ])
    .expect("Global flags should be accepted after the subcommand");
    assert!(matches!(cli.log_format, LogFormat::Json));
    assert_eq!(cli.db_path, PathBuf::from("/tmp/products.db"));
}

#[test]
fn test_extract_with_identifiers() {
    let cli = Cli::try_parse_from([
        "asin_extractor",
        "--status-port",
        "9000",
        "extract",
        "B0ABCDEFGH",
        "B012345678",
        "--send",
    ])
    .expect("Should parse extract");
    let config = Config::from(&cli);
    assert_eq!(config.status_port, Some(9000));
    assert_eq!(config.batch_timeout_secs, 300);
    match cli.command {
        Command::Extract(cmd) => {
            assert_eq!(cmd.asins, vec!["B0ABCDEFGH", "B012345678"]);
            assert!(cmd.send);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_extract_defaults_to_collected_list() {
    let cli = Cli::try_parse_from(["asin_extractor", "extract"]).expect("Should parse extract");
    match cli.command {
        Command::Extract(cmd) => {
            assert!(cmd.asins.is_empty());
            assert!(!cmd.send);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_add_requires_input() {
    assert!(Cli::try_parse_from(["asin_extractor", "add"]).is_err());
    let cli = Cli::try_parse_from(["asin_extractor", "add", "B0ABCDEFGH,B012345678"]).unwrap();
    assert!(matches!(cli.command, Command::Add { input } if input == vec!["B0ABCDEFGH,B012345678"]));
}

#[test]
fn test_send_mode() {
    let cli = Cli::try_parse_from(["asin_extractor", "send", "--mode", "basic", "--preview"])
        .expect("Should parse send");
    match cli.command {
        Command::Send { mode, preview } => {
            assert_eq!(mode, Some(WebhookMode::Basic));
            assert!(preview);
        }
        other => panic!("unexpected command {:?}", other),
    }
    assert!(Cli::try_parse_from(["asin_extractor", "send", "--mode", "fancy"]).is_err());
}

#[test]
fn test_configure_webhook() {
    let cli = Cli::try_parse_from([
        "asin_extractor",
        "configure-webhook",
        "--url",
        "https://hooks.example.com/amz",
        "--username",
        "team",
        "--mode",
        "enhanced",
    ])
    .expect("Should parse configure-webhook");
    match cli.command {
        Command::ConfigureWebhook(args) => {
            assert_eq!(args.url.as_deref(), Some("https://hooks.example.com/amz"));
            assert_eq!(args.username.as_deref(), Some("team"));
            assert_eq!(args.mode, Some(WebhookMode::Enhanced));
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_collect_with_source_url() {
    let cli = Cli::try_parse_from([
        "asin_extractor",
        "collect",
        "page.html",
        "--url",
        "https://www.amazon.com/dp/B0ABCDEFGH",
    ])
    .expect("Should parse collect");
    match cli.command {
        Command::Collect { file, url } => {
            assert_eq!(file, PathBuf::from("page.html"));
            assert_eq!(url.as_deref(), Some("https://www.amazon.com/dp/B0ABCDEFGH"));
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_results_format() {
    let cli = Cli::try_parse_from(["asin_extractor", "results"]).expect("Should parse results");
    assert!(matches!(
        cli.command,
        Command::Results { format: ExportFormat::Json, output: None }
    ));

    let cli = Cli::try_parse_from(["asin_extractor", "results", "--format", "csv", "--output", "out.csv"])
        .expect("Should parse results export");
    match cli.command {
        Command::Results { format, output } => {
            assert_eq!(format, ExportFormat::Csv);
            assert_eq!(output, Some(PathBuf::from("out.csv")));
        }
        other => panic!("unexpected command {:?}", other),
    }
    assert!(Cli::try_parse_from(["asin_extractor", "results", "--format", "xml"]).is_err());
}

#[test]
fn test_serve_port_default() {
    let cli = Cli::try_parse_from(["asin_extractor", "serve"]).expect("Should parse serve");
    assert!(matches!(cli.command, Command::Serve { port: 8787 }));
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(Cli::try_parse_from(["asin_extractor", "scan", "urls.txt"]).is_err());
}
