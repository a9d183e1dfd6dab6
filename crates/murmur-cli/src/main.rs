use anyhow::Result;
use clap::Parser;
use murmur_cli::app;
use murmur_cli::{Cli, Command};
use murmur_core::{ChatContext, HistoryEditor};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();

    match &cli.command {
        Some(Command::Serve { .. }) => {
            let ctx = ChatContext::from_settings(&settings)?;
            murmur_web::start_server(ctx, &settings.server.host, settings.server.port).await?;
        }
        Some(Command::History) => {
            let editor = HistoryEditor::new(settings.history_store());
            app::print_history(&editor, &mut std::io::stdout())?;
        }
        Some(Command::Edit { index, content }) => {
            let editor = HistoryEditor::new(settings.history_store());
            app::edit_entry(&editor, *index, content)?;
        }
        Some(Command::Delete { index }) => {
            let editor = HistoryEditor::new(settings.history_store());
            app::delete_entry(&editor, *index)?;
        }
        Some(Command::Clear) => {
            HistoryEditor::new(settings.history_store()).clear()?;
        }
        None => {
            // Key problems are fatal before any input is read.
            let ctx = ChatContext::from_settings(&settings)?;
            let prompt = match cli.prompt {
                Some(ref prompt) => prompt.clone(),
                None => app::read_prompt(std::io::stdin().lock())?,
            };
            app::run_single_prompt(&ctx.relay(), &prompt, &mut std::io::stdout()).await?;
        }
    }

    Ok(())
}
