use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the API gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Bearer token for protected routes.
    #[arg(short, long, env = "GATEWAY_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange username and password for an access token
    Login { username: String, password: String },
    /// GET a gateway path, e.g. /gateway/students
    Get { path: String },
    /// POST a JSON body to a gateway path
    Post { path: String, body: String },
    /// PUT a JSON body to a gateway path
    Put { path: String, body: String },
    /// DELETE a gateway path
    Delete { path: String },
    /// Print a bcrypt hash for an `[[auth.users]]` entry
    HashPassword {
        password: String,
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
    }

    match cli.command {
        Commands::Login { username, password } => {
            let res = client
                .post(format!("{}/auth/login", cli.url))
                .form(&[("username", username), ("password", password)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Get { path } => {
            send(&client, &cli.url, Method::GET, &path, headers, None).await?;
        }
        Commands::Post { path, body } => {
            send(&client, &cli.url, Method::POST, &path, headers, Some(serde_json::from_str(&body)?)).await?;
        }
        Commands::Put { path, body } => {
            send(&client, &cli.url, Method::PUT, &path, headers, Some(serde_json::from_str(&body)?)).await?;
        }
        Commands::Delete { path } => {
            send(&client, &cli.url, Method::DELETE, &path, headers, None).await?;
        }
        Commands::HashPassword { password, cost } => {
            println!("{}", bcrypt::hash(password, cost)?);
        }
    }

    Ok(())
}

async fn send(
    client: &reqwest::Client,
    base: &str,
    method: Method,
    path: &str,
    headers: HeaderMap,
    body: Option<Value>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut req = client.request(method, format!("{}{}", base, path)).headers(headers);
    if let Some(body) = body {
        req = req.json(&body);
    }
    print_response(req.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
