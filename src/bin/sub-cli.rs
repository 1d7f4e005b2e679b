use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use subscription_merger::codec;
use subscription_merger::config::{load_config, load_unvalidated};
use subscription_merger::http::response::{
    ANNOUNCE, PROFILE_TITLE, PROFILE_UPDATE_INTERVAL, PROFILE_WEB_PAGE_URL, PROVIDER_ID, SUPPORT_URL,
};
use subscription_merger::sources::{LineClassifier, LocalFileProvider, SourceListProvider};
use subscription_merger::SubscriptionService;

#[derive(Parser)]
#[command(name = "sub-cli")]
#[command(about = "Operator CLI for the subscription merger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a local source list document
    Classify {
        file: PathBuf,

        /// Configuration file providing the inline prefixes
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the merge pipeline once and print the result
    Merge {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "")]
        client_id: String,

        /// Print the merged text instead of the base64 body
        #[arg(long)]
        raw: bool,
    },
    /// Fetch a served subscription URL and decode it
    Inspect { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { file, config } => {
            let config = load_unvalidated(config.as_deref())?;
            let lines = LocalFileProvider::new(file).fetch().await?;
            let classified = LineClassifier::new(config.subscriptions.inline_prefixes).classify(&lines);
            println!("{}", serde_json::to_string_pretty(&classified)?);
        }
        Commands::Merge { config, client_id, raw } => {
            let config = load_config(config.as_deref())?;
            let service = SubscriptionService::from_config(&config)?;
            let merged = service.build(&client_id).await?;
            if raw {
                println!("{}", String::from_utf8_lossy(merged.as_bytes()));
            } else {
                println!("{}", codec::encode_payload(merged.as_bytes()));
            }
        }
        Commands::Inspect { url } => {
            let res = reqwest::get(&url).await?;
            print_inspection(res).await?;
        }
    }

    Ok(())
}

async fn print_inspection(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();

    let profile: serde_json::Map<String, Value> = [
        PROFILE_TITLE,
        SUPPORT_URL,
        PROFILE_WEB_PAGE_URL,
        ANNOUNCE,
        PROFILE_UPDATE_INTERVAL,
        PROVIDER_ID,
    ]
    .into_iter()
    .filter_map(|name| {
        let value = res.headers().get(name)?;
        Some((name.to_string(), json!(String::from_utf8_lossy(value.as_bytes()))))
    })
    .collect();

    let body = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: merger returned status {}", status);
        eprintln!("Response: {}", body);
        return Ok(());
    }

    let decoded = codec::decode_subscription(&body)?;
    let text = String::from_utf8_lossy(&decoded);
    let entries: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    let report = json!({
        "status": status.as_u16(),
        "profile": profile,
        "entry_count": entries.len(),
        "entries": entries,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
