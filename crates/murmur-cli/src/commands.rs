use clap::{Parser, Subcommand};
use murmur_core::{Message, Role, Settings};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "murmur")]
#[command(about = "murmur - streaming chat with a persisted conversation log")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Send this text instead of reading one line from stdin
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Config file (defaults to <config dir>/murmur/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Conversation history file
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// File holding the API key
    #[arg(long, global = true)]
    pub key_file: Option<PathBuf>,

    /// LLM model to use
    #[arg(short, long, global = true)]
    pub model: Option<String>,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Serve the chat page and HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the persisted conversation
    History,
    /// Replace the content of one entry
    Edit { index: usize, content: String },
    /// Remove one entry
    Delete { index: usize },
    /// Remove every entry
    Clear,
}

impl Cli {
    /// Load settings and apply command-line overrides.
    pub fn settings(&self) -> Settings {
        let mut settings = match self.config {
            Some(ref path) => Settings::load_from(path),
            None => Settings::load(),
        };
        self.apply_overrides(&mut settings);
        settings
    }

    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(ref path) = self.history {
            settings.history.path = path.clone();
        }
        if let Some(ref path) = self.key_file {
            settings.llm.api_key_file = path.clone();
        }
        if let Some(ref model) = self.model {
            settings.llm.model = model.clone();
        }
        if let Some(Command::Serve { host, port }) = &self.command {
            if let Some(host) = host {
                settings.server.host = host.clone();
            }
            if let Some(port) = port {
                settings.server.port = *port;
            }
        }
    }
}

/// Render the log for the terminal, one numbered entry per message.
pub fn format_history(log: &[Message]) -> String {
    if log.is_empty() {
        return "(no messages)".to_string();
    }
    log.iter()
        .enumerate()
        .map(|(i, m)| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            format!("[{i}] {role}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
