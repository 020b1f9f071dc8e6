// tcset (timecode setter for the resolve media pool)
// Copyright (C) 2025 Andrew Nissen

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::config::TcsetConfig;
use crate::host::ClipStore;
use clap::{Parser, Subcommand};
use rust_embed::Embed;

mod batch;
mod config;
mod host;
mod timecode;

#[derive(Embed)]
#[folder = "assets/"]
pub struct Asset;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Set each selected clip's start timecode from its filename")]
    Apply {
        #[arg(
            long,
            help = "Report what would change without writing to the host",
            default_value = "false"
        )]
        dry_run: bool,
    },
    #[command(about = "Display current configuration settings")]
    Config {
        #[command(subcommand)]
        config_command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    #[command(about = "Display current configuration settings")]
    Show,
    #[command(about = "Display path to configuration file")]
    Path,
    #[command(about = "Set a configuration field")]
    Set {
        #[arg(help = "Field name to set")]
        field: String,
        #[arg(help = "Value to set")]
        value: String,
    },
    #[command(about = "Unset/clear a configuration field")]
    Unset {
        #[arg(help = "Field name to unset")]
        field: String,
    },
}

fn is_valid_config_field(field: &str) -> bool {
    matches!(field, "python_path" | "scripting_module_path")
}

fn set_config_field(cfg: &mut TcsetConfig, field: &str, value: &str) -> Result<(), String> {
    match field {
        "python_path" => cfg.python_path = value.to_string(),
        "scripting_module_path" => cfg.scripting_module_path = value.to_string(),
        _ => return Err(format!("Unknown field: {}", field)),
    }
    Ok(())
}

fn unset_config_field(cfg: &mut TcsetConfig, field: &str) -> Result<(), String> {
    match field {
        "python_path" => cfg.python_path = String::new(),
        "scripting_module_path" => cfg.scripting_module_path = String::new(),
        _ => return Err(format!("Unknown field: {}", field)),
    }
    Ok(())
}

fn run_apply(dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config_or_default();

    let mut session = match host::ResolveSession::connect(&cfg) {
        Ok(session) => session,
        Err(host::HostError::NoProject) => {
            eprintln!("ERROR: No project is currently open");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("ERROR: Could not connect to DaVinci Resolve: {}", e);
            eprintln!("Make sure DaVinci Resolve is running");
            std::process::exit(1);
        }
    };

    let clips = match session.selected_clips() {
        Ok(clips) => clips,
        Err(e) => {
            eprintln!("ERROR: Could not read the media pool selection: {}", e);
            std::process::exit(1);
        }
    };

    if clips.is_empty() {
        println!("No clips selected in the Media Pool");
        println!("Please select one or more clips and run again.");
        return Ok(());
    }

    println!("Found {} selected clip(s)", clips.len());
    println!("{}", "-".repeat(60));

    let report = batch::apply(&mut session, &clips, dry_run);

    println!("{}", "-".repeat(60));
    report.print_summary();

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        // Bare invocation runs the batch update, so the tool can be bound
        // to an editor hotkey with no arguments.
        None => run_apply(false)?,
        Some(Commands::Apply { dry_run }) => run_apply(dry_run)?,
        Some(Commands::Config { config_command }) => match config_command {
            Some(ConfigCommands::Show) | None => {
                let cfg: TcsetConfig = config::load_config()?;
                let json_output = serde_json::to_string_pretty(&cfg)?;
                println!("{}", json_output);
            }
            Some(ConfigCommands::Path) => {
                let config_path = config::get_config_path()?;
                println!("{}", config_path.display());
            }
            Some(ConfigCommands::Set { field, value }) => {
                if !is_valid_config_field(&field) {
                    eprintln!(
                        "Error: Unknown field '{}'. Valid fields are: python_path, scripting_module_path",
                        field
                    );
                    std::process::exit(1);
                }

                let mut cfg: TcsetConfig = config::load_config()?;

                if let Err(e) = set_config_field(&mut cfg, &field, &value) {
                    eprintln!("Error setting field: {}", e);
                    std::process::exit(1);
                }

                config::store_config(&cfg)?;
                println!("Set {} = {}", field, value);
            }
            Some(ConfigCommands::Unset { field }) => {
                if !is_valid_config_field(&field) {
                    eprintln!(
                        "Error: Unknown field '{}'. Valid fields are: python_path, scripting_module_path",
                        field
                    );
                    std::process::exit(1);
                }

                let mut cfg: TcsetConfig = config::load_config()?;

                if let Err(e) = unset_config_field(&mut cfg, &field) {
                    eprintln!("Error unsetting field: {}", e);
                    std::process::exit(1);
                }

                config::store_config(&cfg)?;
                println!("Unset {}", field);
            }
        },
    }

    Ok(())
}
