use std::io::{self, Write};

mod action_registry;
mod actions;
mod calendar;
mod config;
mod dispatch;
mod llm_client;
#[cfg(test)]
mod mocks;
#[cfg(test)]
mod tests;
mod types;

use action_registry::ActionRegistry;
use calendar::CalendarClient;
use config::Config;
use dispatch::{DispatchEngine, DispatchOptions};
use llm_client::LlmClient;
use types::Message;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let registry = ActionRegistry::new();
    if registry.is_empty() {
        anyhow::bail!("action registry is empty, nothing to dispatch");
    }

    let llm = LlmClient::new(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.model.clone(),
    )?;
    let calendar = CalendarClient::new(&config)?;
    let engine = DispatchEngine::new(
        Box::new(llm),
        calendar,
        registry,
        DispatchOptions::default(),
    );

    println!("\u{001b}[94mWelcome to calbot! Ask me to book, list, cancel or reschedule meetings.\u{001b}[0m");
    println!("\u{001b}[90mCommands: status, quit\u{001b}[0m");

    let mut history: Vec<Message> = Vec::new();

    loop {
        print!("\u{001b}[93mYou:\u{001b}[0m ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }

        match input.trim() {
            "" => continue,
            "quit" => break,
            "status" => print_status(&config),
            message => match engine.run_turn(&mut history, message, None).await {
                Ok(reply) => {
                    println!("\u{001b}[96mAssistant:\u{001b}[0m {}", reply.response);
                    if !reply.functions_called.is_empty() {
                        println!(
                            "\u{001b}[35m▌🔧 {}\u{001b}[0m",
                            reply.functions_called.join(", ")
                        );
                    }
                }
                Err(e) => eprintln!("Error processing chat: {:#}", e),
            },
        }
    }
    Ok(())
}

/// Read-only status report: service health and configuration presence only,
/// never values of credentials.
fn status_report(config: &Config) -> serde_json::Value {
    serde_json::json!({
        "status": "running",
        "openai_client": if config.openai_api_key.is_empty() { "unavailable" } else { "available" },
        "model": config.model,
        "cal_api_key": if config.cal_api_key.is_some() { "configured" } else { "missing" },
        "cal_username": config.cal_username.as_deref().unwrap_or("missing"),
        "demo_mode": config.demo_mode,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
}

fn print_status(config: &Config) {
    let status = status_report(config);
    println!(
        "{}",
        serde_json::to_string_pretty(&status).unwrap_or_else(|_| status.to_string())
    );
}
