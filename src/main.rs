use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lsds::commands;
use lsds_core::config::Config;
use lsds_core::{Query, QueryLanguage};

#[derive(Parser)]
#[command(name = "lsds", about = "Lightstep query data source")]
struct Cli {
    /// Write debug logs to /tmp/lsds-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/lsds/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalise a saved query API response into a data frame.
    Normalize {
        /// Response JSON file, or `-` for stdin.
        response: PathBuf,
        #[arg(long, default_value = "A")]
        ref_id: String,
        /// Query text, used as the series name fallback.
        #[arg(long, default_value = "")]
        text: String,
        /// Legend template.
        #[arg(long, default_value = "")]
        format: String,
        /// Notebook URL to attach to timeseries fields.
        #[arg(long, default_value = "")]
        link: String,
        /// Template variables as name=value.
        #[arg(long = "var")]
        vars: Vec<String>,
    },
    /// Run queries through the configured data source proxy.
    Query {
        /// Query text; repeat for several targets.
        #[arg(long = "text", required = true)]
        texts: Vec<String>,
        #[arg(long)]
        language: Option<QueryLanguage>,
        /// Legend template applied to every target.
        #[arg(long, default_value = "")]
        format: String,
        /// Look back this far from now, e.g. 1h or 30m.
        #[arg(long, default_value = "1h")]
        since: String,
        /// Template variables as name=value.
        #[arg(long = "var")]
        vars: Vec<String>,
    },
    /// Check the configured data source.
    Check,
    /// List metric names, or the labels of one metric.
    Metrics {
        metric: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/lsds-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("lsds debug log started, tail -f /tmp/lsds-debug.log");
    }

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Normalize {
            response,
            ref_id,
            text,
            format,
            link,
            vars,
        } => {
            let query = Query::new(ref_id, text).with_format(format);
            let vars = commands::parse_vars(&vars)?;
            let frame = commands::normalize_file(&response, &query, &link, vars, &config)?;
            print_json(&frame)
        }
        Command::Query {
            texts,
            language,
            format,
            since,
            vars,
        } => {
            let language = language.unwrap_or(config.query.default_language);
            let targets: Vec<Query> = texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| {
                    Query::new(ref_id_for(i), text)
                        .with_language(language)
                        .with_format(format.clone())
                })
                .collect();
            let range = commands::lookback(&since)?;
            let vars = commands::parse_vars(&vars)?;
            let frames = commands::run_query(config, targets, range, vars).await?;
            print_json(&frames)
        }
        Command::Check => {
            let health = commands::check(config).await;
            println!("{}", health.message);
            if !health.ok {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Metrics { metric } => {
            let payload = commands::suggestions(config, metric.as_deref()).await?;
            print_json(&payload)
        }
    }
}

/// Panel-style ref ids: A, B, ... Z, AA, AB, ...
fn ref_id_for(mut index: usize) -> String {
    let mut id = Vec::new();
    loop {
        id.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    id.reverse();
    String::from_utf8_lossy(&id).into_owned()
}
