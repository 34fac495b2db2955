//! Terminal front end for the vocabulary trainer.

pub mod commands;
pub mod store;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use vocab_core::{NewWordPair, ReviewController, RngSource, Settings};

use crate::store::JsonFileStore;

#[derive(Debug, Parser)]
#[command(name = "vocab", version, about = "Spaced-repetition vocabulary trainer")]
pub struct Cli {
    /// Word collection file.
    #[arg(long, global = true, env = "VOCAB_DATA")]
    pub data: Option<PathBuf>,

    /// JSON settings file. Missing fields use defaults.
    #[arg(long, global = true, env = "VOCAB_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a word pair.
    Add {
        language_a: String,
        word_a: String,
        language_b: String,
        word_b: String,
    },
    /// List every word, oldest first.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete a word by id.
    Delete { id: Uuid },
    /// Show words due for review.
    Due,
    /// Review due words interactively.
    Review {
        /// Stop after this many reviews.
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Show progress by mastery tier.
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn default_data_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab")
        .join("words.json")
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings from {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(settings)
}

pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;
    let data_path = cli.data.unwrap_or_else(default_data_path);
    tracing::debug!(path = %data_path.display(), "using word store");

    let mut controller = ReviewController::new(
        JsonFileStore::new(data_path),
        RngSource::from_os_rng(),
        settings,
    );
    controller.load().context("failed to load words")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Add {
            language_a,
            word_a,
            language_b,
            word_b,
        } => commands::add(
            &mut controller,
            NewWordPair::new(language_a, word_a, language_b, word_b),
            &mut out,
        )?,
        Command::List { json } => commands::list(&controller, json, &mut out)?,
        Command::Delete { id } => commands::delete(&mut controller, id, &mut out)?,
        Command::Due => commands::due(&controller, Utc::now(), &mut out)?,
        Command::Review { count } => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let reviewed =
                commands::review(&mut controller, count, Utc::now, &mut input, &mut out)?;
            tracing::info!(reviewed, "review session finished");
        }
        Command::Stats { json } => commands::stats(&controller, Utc::now(), json, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_review_count() {
        let cli = Cli::try_parse_from(["vocab", "review", "-n", "5"]).unwrap();
        assert!(matches!(cli.command, Command::Review { count: Some(5) }));
    }

    #[test]
    fn parses_add_and_global_data_flag() {
        let cli = Cli::try_parse_from([
            "vocab", "add", "English", "house", "Spanish", "casa", "--data", "w.json",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("w.json")));
        assert!(matches!(cli.command, Command::Add { ref word_b, .. } if word_b == "casa"));
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn settings_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "max_words": 20 }"#).unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.max_words, 20);
    }

    #[test]
    fn settings_that_break_scheduling_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        for content in [
            r#"{ "scheduler": { "instant_mastery_step": 0.1 } }"#,
            r#"{ "scheduler": { "maximum_interval_days": 200000000 } }"#,
            r#"{ "grading": { "tolerance_ratio": -1.0 } }"#,
        ] {
            fs::write(&path, content).unwrap();
            let err = load_settings(Some(&path)).unwrap_err();
            assert!(format!("{err:#}").contains("invalid settings"), "{content}");
        }
    }
}
