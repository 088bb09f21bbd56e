mod app;
mod client;
mod config;
mod controller;
mod logging;
mod store;
mod transcript;
mod ui;

use crate::client::{AnswerClient, AnswerService};
use crate::config::Config;
use crate::controller::ERROR_REPLY;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "askr")]
#[command(version = "0.1.0")]
#[command(about = "Terminal chat client for a question-answering service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the reply
    Ask { question: Vec<String> },
    /// Check whether the answer service is reachable
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        None => {
            logging::init_file(&config)?;
            app::run(config).await
        }
        Some(Commands::Ask { question }) => {
            logging::init_stderr();
            ask_once(&config, &question.join(" ")).await
        }
        Some(Commands::Ping) => {
            logging::init_stderr();
            ping(&config).await
        }
    }
}

async fn ask_once(config: &Config, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        return Ok(());
    }

    let client = AnswerClient::new(config);
    match client.ask(question).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "ask request failed");
            eprintln!("{ERROR_REPLY}");
            std::process::exit(1);
        }
    }
}

async fn ping(config: &Config) -> Result<()> {
    let client = AnswerClient::new(config);
    match client.ping().await {
        Ok(status) => {
            println!("answer service at {} is {status}", config.base_url);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "ping failed");
            eprintln!("answer service at {} is unreachable", config.base_url);
            std::process::exit(1);
        }
    }
}
