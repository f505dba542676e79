/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, ArgGroup, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use duty_roster::rotation::render_duty_text;
use duty_roster::settings::store::{load_settings, spawn_autosave, JsonFileStore, SettingsStore};
use duty_roster::settings::weekdays::{split_weekday_list, WeekdayPreset};
use duty_roster::settings::SettingsHandle;
use duty_roster::widget::{Clock, DutyWidget, SystemClock};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Classroom duty roster – shows who is on duty today.
///
/// Example:
///   duty-roster -c Settings.json import roster.txt
///   duty-roster days 周一 周二 周三 周四 周五
///   duty-roster show --date 2024-01-08
#[derive(Debug, Parser)]
#[command(
    name = "duty-roster",
    about = "Classroom duty roster rotation",
    long_about = None,
)]
struct Cli {
    /// Path to the JSON settings document.
    #[arg(short = 'c', long = "config", default_value = "Settings.json")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the duty text for today or for a given date.
    Show {
        /// Target date (YYYY-MM-DD); defaults to today.
        #[arg(short = 'd', long = "date")]
        date: Option<NaiveDate>,
    },

    /// Replace the roster from a plain-text file ("<number> <name>" per line).
    Import {
        file: PathBuf,
    },

    /// Write the roster as plain text to a file or stdout.
    Export {
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Set the weekdays that advance the rotation.
    #[command(group(ArgGroup::new("day_selection").required(true).args(["names", "preset"])))]
    Days {
        /// Weekday names, e.g. "周一 周三" or "Mon,Wed,Fri".
        names: Vec<String>,

        #[arg(short = 'p', long = "preset", value_enum)]
        preset: Option<PresetArg>,
    },

    /// Change the display format, base date or offset.
    Set {
        /// Display template; {n} = number, {s} = name.
        #[arg(short = 'f', long = "format")]
        format: Option<String>,

        /// Rotation base date (YYYY-MM-DD).
        #[arg(short = 'b', long = "base-date")]
        base_date: Option<NaiveDate>,

        /// Rotation offset, may be negative.
        #[arg(short = 'o', long = "offset", allow_negative_numbers = true)]
        offset: Option<i32>,
    },

    /// Keep printing the duty text as it changes, until Ctrl-C.
    Watch {
        /// Refresh period in seconds.
        #[arg(short = 'i', long = "interval-secs", default_value_t = 60)]
        interval_secs: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PresetArg {
    MonSat,
    MonFri,
    EveryDay,
}

impl From<PresetArg> for WeekdayPreset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::MonSat => WeekdayPreset::MonToSat,
            PresetArg::MonFri => WeekdayPreset::MonToFri,
            PresetArg::EveryDay => WeekdayPreset::EveryDay,
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// 0 → warn, 1 → info, 2 → debug, 3+ → trace.  `RUST_LOG` overrides.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("duty_roster={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!(config = %cli.config.display(), command = ?cli.command, "Duty roster starting");

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = JsonFileStore;
    let settings = load_settings(&store, &cli.config)?;
    let handle = SettingsHandle::new(settings);

    match cli.command {
        Command::Show { date } => {
            let day = date.unwrap_or_else(|| SystemClock.today());
            println!("{}", render_duty_text(&handle.snapshot(), day));
        }

        Command::Import { file } => {
            let count = handle.import_roster_from_file(&file)?;
            persist(&store, &cli.config, &handle)?;
            println!("Imported {count} student(s)");
        }

        Command::Export { output } => {
            let text = handle.export_roster_to_text();
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{text}\n"))
                        .with_context(|| format!("Cannot write roster file: {}", path.display()))?;
                    info!("Exported roster to {}", path.display());
                }
                None => println!("{text}"),
            }
        }

        Command::Days { names, preset } => {
            let changed = match preset {
                Some(p) => handle.apply_preset(p.into()),
                None => {
                    let tokens: Vec<&str> =
                        names.iter().flat_map(|n| split_weekday_list(n)).collect();
                    handle.set_participating_days(tokens)
                }
            };
            if changed {
                persist(&store, &cli.config, &handle)?;
            }
            println!(
                "Participating days: {:?}",
                handle.snapshot().participating_days()
            );
        }

        Command::Set {
            format,
            base_date,
            offset,
        } => {
            let mut changed = false;
            if let Some(format) = format {
                changed |= handle.set_display_format(format);
            }
            if let Some(day) = base_date {
                changed |= handle.set_base_day(day);
            }
            if let Some(offset) = offset {
                changed |= handle.set_offset(offset);
            }
            if changed {
                persist(&store, &cli.config, &handle)?;
            }
        }

        Command::Watch { interval_secs } => {
            watch(handle, store, cli.config, Duration::from_secs(interval_secs)).await?;
        }
    }

    Ok(())
}

fn persist<S: SettingsStore>(store: &S, path: &Path, handle: &SettingsHandle) -> Result<()> {
    store.save(path, &handle.snapshot())?;
    info!("Settings saved to {}", path.display());
    Ok(())
}

/// Mount the widget on the system clock and print every new text.
async fn watch(
    handle: SettingsHandle,
    store: JsonFileStore,
    path: PathBuf,
    interval: Duration,
) -> Result<()> {
    let autosave = spawn_autosave(&handle, store, path);
    let widget = DutyWidget::new(handle, SystemClock)
        .with_refresh_interval(interval)
        .mount();

    let mut text = widget.subscribe();
    println!("{}", *text.borrow_and_update());

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("Ctrl-C received, shutting down");
                break;
            }
            changed = text.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", *text.borrow_and_update());
            }
        }
    }

    widget.unmount().await;
    autosave.abort();
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
