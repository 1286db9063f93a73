mod app;
mod commands;
mod config;
mod prompt;
mod render;

use std::{io, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use media_upload::{HttpImageUploader, ImageUploader};
use phonebook_core::Phonebook;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    app::{App, Outcome},
    commands::parse_line,
    prompt::{is_yes, Input, COMMAND_PROMPT},
};

#[derive(Parser, Debug)]
#[command(about = "Interactive contact book")]
struct Args {
    /// TOML settings file; defaults to ./phonebook.toml when present
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    page_size: Option<usize>,
    /// Country preselected on new contacts
    #[arg(long)]
    country: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(country) = args.country {
        settings.default_country = country;
    }
    settings.validate()?;

    let uploader: Option<Arc<dyn ImageUploader>> = match settings.upload_config() {
        Some(upload) => Some(Arc::new(HttpImageUploader::new(&upload)?)),
        None => {
            warn!("image upload disabled: upload_cloud_name or upload_preset is not set");
            None
        }
    };
    let default_country = settings.default_country()?;
    info!(
        page_size = settings.page_size,
        %default_country,
        upload = uploader.is_some(),
        "phonebook ready"
    );

    let mut input = Input::from_stdin();
    let mut app = App::new(Phonebook::new(settings.page_size), default_country, uploader)
        .confirm_deletes(input.is_interactive());
    if input.is_interactive() {
        println!("Type `help` for commands, `quit` to leave.");
    }

    while let Some(line) = input.read_line(COMMAND_PROMPT)? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        let outcome = match app.execute(command).await {
            Ok(Outcome::Confirm { question, command }) => {
                let answer = input.read_line(&format!("{question} [y/N] "))?;
                if !answer.as_deref().is_some_and(is_yes) {
                    println!("cancelled");
                    continue;
                }
                app.execute(command).await
            }
            other => other,
        };
        match outcome {
            Ok(Outcome::Output(text)) => println!("{text}"),
            Ok(Outcome::Confirm { .. }) => println!("cancelled"),
            Ok(Outcome::Quit) => break,
            Err(report) => println!("error: {report}"),
        }
    }

    if app.draft().is_some() {
        warn!("unsaved draft discarded on exit");
    }
    info!(contacts = app.book().store().len(), "phonebook closed");
    Ok(())
}
