mod chat;
mod error;
mod generate;
mod prompt;
mod settings;
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use chat::AnswerService;
use clap::Parser;
use generate::OllamaGenerator;
use prompt::PromptTemplate;
use settings::{Args, LogSettings, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_file(args.config.as_deref())
        .context("Problem while loading settings")?;
    init_tracing(&settings.log)?;

    info!("Ollama Chat Server {}", env!("CARGO_PKG_VERSION"));

    let template =
        PromptTemplate::new(&settings.prompt.template).context("Invalid prompt template")?;
    let generator =
        OllamaGenerator::new(&settings.ollama).context("Invalid Ollama settings")?;
    info!(
        "Using model `{}` at {}",
        generator.model(),
        settings.ollama.url
    );

    let service = Arc::new(AnswerService::new(template, Arc::new(generator)));
    web::serve(service, &settings.web).await;
    Ok(())
}

fn init_tracing(log: &LogSettings) -> Result<()> {
    let level: tracing::Level = log
        .level
        .parse()
        .with_context(|| format!("Unknown log level `{}`", log.level))?;
    tracing_subscriber::fmt().with_max_level(level).init();
    Ok(())
}
