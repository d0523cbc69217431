use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "lesson-cli")]
#[command(about = "Query a running lesson gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the quarterlies for a language
    Quarterlies { lang: String },
    /// Show a quarterly and its lessons
    Quarterly { lang: String, id: String },
    /// Show a lesson and its days
    Lesson {
        lang: String,
        quarterly: String,
        lesson: String,
    },
    /// Show the content of one day
    Day {
        lang: String,
        quarterly: String,
        lesson: String,
        day: String,
    },
    /// Download an image through the relay
    Image {
        source: String,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let path = match cli.command {
        Commands::Quarterlies { lang } => format!("/quarterlies/{lang}"),
        Commands::Quarterly { lang, id } => format!("/quarterly/{lang}/{id}"),
        Commands::Lesson { lang, quarterly, lesson } => {
            format!("/quarterly/{lang}/{quarterly}/{lesson}")
        }
        Commands::Day { lang, quarterly, lesson, day } => {
            format!("/quarterly/{lang}/{quarterly}/{lesson}/{day}")
        }
        Commands::Image { source, output } => {
            let res = client
                .get(format!("{base}/proxy-image"))
                .query(&[("url", source.as_str())])
                .send()
                .await?;
            return save_image(res, &output).await;
        }
    };

    let res = client.get(format!("{base}{path}")).send().await?;
    print_response(res).await
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

async fn save_image(res: reqwest::Response, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let bytes = res.bytes().await?;
    tokio::fs::write(output, &bytes).await?;
    println!("Wrote {} bytes ({}) to {}", bytes.len(), content_type, output.display());
    Ok(())
}
