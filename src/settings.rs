// src/settings.rs

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use clap::Parser;
use config::{builder::DefaultState, ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::prompt::DEFAULT_TEMPLATE;

const DEFAULT_ADDR: &str = "0.0.0.0:5000";

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Path to the local configuration TOML file.
    #[arg(short, value_name = "CONFIG_PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Web {
    #[serde(deserialize_with = "deserialize_socket_addr")]
    pub address: SocketAddr,
    /// Directory holding the chat page served at `/`.
    pub static_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OllamaSettings {
    pub url: String,
    pub model: String,
    /// Per-call limit in seconds; `0` waits for the backend indefinitely.
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptSettings {
    pub template: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub web: Web,
    pub ollama: OllamaSettings,
    pub prompt: PromptSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from the given TOML file, with sane defaults.
    pub fn from_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::<DefaultState>::default()
            .set_default("web.address", DEFAULT_ADDR)?
            .set_default("web.static_dir", "static")?
            .set_default("ollama.url", "http://127.0.0.1:11434")?
            .set_default("ollama.model", "llama3")?
            .set_default("ollama.timeout_secs", 0)?
            .set_default("prompt.template", DEFAULT_TEMPLATE)?
            .set_default("log.level", "info")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder,
        };

        builder.build()?.try_deserialize()
    }
}

fn deserialize_socket_addr<'de, D>(deserializer: D) -> Result<SocketAddr, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
