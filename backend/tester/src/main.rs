use anyhow::Error;
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde_json::{Value, json};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://localhost:1111")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a raw order or status update payload
    Order { payload: String },

    /// Look up an account email by phone number
    Lookup { phone: String },

    /// Resolve a 6-digit pincode
    Geocode { pin_code: String },

    /// Ask for recommendations
    Recommend {
        #[arg(long)]
        user_id: Option<String>,
    },
}

impl Command {
    fn request(self) -> Result<(&'static str, Value), Error> {
        Ok(match self {
            Command::Order { payload } => ("/api/order", serde_json::from_str(&payload)?),
            Command::Lookup { phone } => ("/api/user/lookup", json!({ "phone": phone })),
            Command::Geocode { pin_code } => ("/api/geocode", json!({ "pinCode": pin_code })),
            Command::Recommend { user_id } => {
                ("/api/recommendations", json!({ "userId": user_id }))
            }
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    let (path, body) = args.command.request()?;

    let url = format!("{}{path}", args.base_url.trim_end_matches('/'));
    println!("POST {url}\n{body}\n");

    let response = Client::new().post(&url).json(&body).send().await?;
    let status = response.status();
    let text = response.text().await?;

    println!("Status: {status}");
    println!("{text}");

    Ok(())
}
