use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "mediator-cli")]
#[command(about = "Inspect a running API mediator", long_about = None)]
struct Cli {
    /// Gateway base URL
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Gateway path prefix
    #[arg(short, long, default_value = "mediator")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List backends from the aggregated swagger-config
    Backends,
    /// Fetch a backend's OpenAPI document as served through the gateway
    Docs {
        /// Backend path segment
        backend: String,
        /// API-docs suffix
        #[arg(long, default_value = "/api-docs")]
        suffix: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!(
        "{}/{}",
        cli.url.trim_end_matches('/'),
        cli.prefix.trim_matches('/')
    );

    match cli.command {
        Commands::Backends => {
            let res = client.get(format!("{base}/swagger-config")).send().await?;
            let Some(json) = read_json(res).await? else {
                return Ok(());
            };
            match json["urls"].as_array() {
                Some(urls) => {
                    for entry in urls {
                        println!(
                            "{:<24} {}",
                            entry["name"].as_str().unwrap_or("-"),
                            entry["url"].as_str().unwrap_or("-")
                        );
                    }
                }
                None => println!("{}", serde_json::to_string_pretty(&json)?),
            }
        }
        Commands::Docs { backend, suffix } => {
            let res = client.get(format!("{base}/{backend}{suffix}")).send().await?;
            if let Some(json) = read_json(res).await? {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
    }

    Ok(())
}

async fn read_json(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }

    Ok(Some(res.json().await?))
}
