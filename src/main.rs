use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use workmap_lib::export::{self, ExportFormat, ExportOptions};
use workmap_lib::recorder::storage;
use workmap_lib::settings::{self, SettingsError, SettingsStore};

#[derive(Parser)]
#[command(name = "workmap", version, about = "Turn recorded browser workflows into documentation")]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render a saved step log (JSON) as md, json, doc or report
    Render {
        /// Step log written by a recording session
        steps: PathBuf,
        #[arg(long, short, default_value = "md")]
        format: String,
        /// Document title (defaults to "WorkMap Workflow Recording")
        #[arg(long)]
        title: Option<String>,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Inspect or change persisted recorder settings
    Settings {
        #[command(subcommand)]
        action: SettingsCmd,
    },
}

#[derive(Subcommand)]
enum SettingsCmd {
    Show,
    /// e.g. `set maskSensitive false`
    Set { key: String, value: bool },
}

fn main() -> Result<()> {
    workmap_lib::init_logging();
    let args = Args::parse();

    match args.command {
        Cmd::Render {
            steps,
            format,
            title,
            output,
        } => {
            let format: ExportFormat = format.parse()?;
            let log = storage::read_steps(&steps)
                .with_context(|| format!("reading {}", steps.display()))?;
            let mut options = ExportOptions::now();
            if let Some(title) = title {
                options = options.with_title(title);
            }
            match output {
                Some(path) => export::write(&log, format, &options, &path)?,
                None => println!("{}", format.render(&log, &options)),
            }
        }
        Cmd::Settings { action } => {
            let path = settings::default_path().ok_or(SettingsError::NoConfigDir)?;
            let store = SettingsStore::open(Some(path));
            if let SettingsCmd::Set { key, value } = &action {
                store.apply_change(key, *value)?;
            }
            println!("{}", serde_json::to_string_pretty(&store.current())?);
        }
    }
    Ok(())
}
