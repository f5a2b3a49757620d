use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "grit-cli")]
#[command(about = "Command-line client for the Grit goal server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "GRIT_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server and network status
    Status,
    /// Show the connected account
    Account,
    /// Ask the wallet to authorize an account
    Connect,
    /// List goals from the last refresh
    List {
        /// Re-read goals from the contract first
        #[arg(long)]
        refresh: bool,
    },
    /// Mint a new goal
    Mint {
        name: String,
        description: String,
        /// Due date as YYYY-MM-DD
        due: String,
    },
    /// Mark a goal achieved (pays the fee when it is past due)
    Achieve { token_id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/health", base)).send().await?,
        Commands::Account => client.get(format!("{}/api/account", base)).send().await?,
        Commands::Connect => {
            client
                .post(format!("{}/api/wallet/connect", base))
                .send()
                .await?
        }
        Commands::List { refresh: false } => {
            client.get(format!("{}/api/goals", base)).send().await?
        }
        Commands::List { refresh: true } => {
            client
                .post(format!("{}/api/goals/refresh", base))
                .send()
                .await?
        }
        Commands::Mint {
            name,
            description,
            due,
        } => {
            client
                .post(format!("{}/api/goals", base))
                .json(&json!({
                    "name": name,
                    "description": description,
                    "due_date": due,
                }))
                .send()
                .await?
        }
        Commands::Achieve { token_id } => {
            client
                .post(format!("{}/api/goals/{}/achieve", base, token_id))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => eprintln!(
                "{}: {}",
                body["error"].as_str().unwrap_or("unknown"),
                body["message"].as_str().unwrap_or(&text)
            ),
            Err(_) => eprintln!("Response: {}", text),
        }
        std::process::exit(1);
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
