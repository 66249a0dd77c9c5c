use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "webhook-cli")]
#[command(about = "Operator CLI for the disposable email webhook", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "WEBHOOK_API_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the domain list is loaded
    Health,
    /// Validate an email address the way the identity provider would
    Check {
        /// Address to check
        email: String,
    },
    /// Show domain list status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert("x-api-key", HeaderValue::from_str(&cli.key)?);
    }

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Check { email } => {
            let res = client
                .post(format!("{}/v1/validate/email", cli.url))
                .headers(headers)
                .json(&json!({ "email": email }))
                .send()
                .await?;
            if res.status().is_success() {
                println!("{}: allowed", email);
            } else {
                print_response(res).await?;
            }
        }
        Commands::Status => {
            let res = client
                .get(format!("{}/v1/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if !text.is_empty() => println!("{}", text),
        Err(_) => {}
    }

    if !status.is_success() {
        eprintln!("Webhook returned status {}", status);
    }
    Ok(())
}
