//! pipeline-color - ANSI colors for line-oriented CI log viewers

mod color;
mod config;
mod error;
mod palette;

use clap::{Parser, Subcommand};
use color::ColorName;
use config::Config;
use env_logger::Env;
use error::Result;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pipeline-color")]
#[command(version, about = "ANSI colors for line-oriented CI log viewers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wrap text in a color, repeated on every line
    Colorize {
        /// blue, cyan, green, magenta, red or yellow
        color: String,
        /// Text to colorize (default: read stdin)
        text: Option<String>,
    },
    /// Replace 8-bit color codes with 4-bit ones
    Downsample {
        /// Text to downsample (default: read stdin)
        text: Option<String>,
        /// TOML palette table (default: built-in table)
        #[arg(long, env = "PIPELINE_COLOR_TABLE")]
        table: Option<PathBuf>,
    },
    /// Print the active palette table as TOML
    Table {
        /// TOML palette table (default: built-in table)
        #[arg(long, env = "PIPELINE_COLOR_TABLE")]
        table: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli.command).and_then(|output| write_stdout(&output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<Vec<u8>> {
    match command {
        Command::Colorize { color, text } => {
            // Validate the color before touching stdin
            let color: ColorName = color.parse()?;
            let input = input_or_stdin(text)?;
            let text = String::from_utf8_lossy(&input);
            Ok(color::colorize(color, &text)?.into_bytes())
        }
        Command::Downsample { text, table } => {
            let config = Config::load(table.as_deref())?;
            let input = input_or_stdin(text)?;
            Ok(palette::downsample(&input, &config.table))
        }
        Command::Table { table } => {
            let config = Config::load(table.as_deref())?;
            Ok(config.table.to_toml_string()?.into_bytes())
        }
    }
}

/// Raw bytes of `text`, or of all of stdin when no text was given
fn input_or_stdin(text: Option<String>) -> Result<Vec<u8>> {
    if let Some(text) = text {
        return Ok(text.into_bytes());
    }
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}

fn write_stdout(output: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output)?;
    stdout.flush()?;
    Ok(())
}
