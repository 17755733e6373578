//! ANSI Render
//!
//! Headless renderer for testing and automation.
//! Reads bytes from stdin or a file and prints the rendered lines, either as
//! plain text or in the persisted JSON form.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use ansi_lines::{Config, LineDiscipline, Screen, Terminal};

use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Input is fed to the terminal in pieces of this size
const CHUNK_SIZE: usize = 4096;

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut raw = false;
    let mut lines = 0usize;
    let mut cols = 0usize;
    let mut config_file: Option<String> = None;
    let mut input_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--raw" => {
                raw = true;
            },
            "-l" | "--lines" => {
                i += 1;
                if i < args.len() {
                    lines = args[i].parse().unwrap_or(0);
                }
            },
            "-c" | "--cols" => {
                i += 1;
                if i < args.len() {
                    cols = args[i].parse().unwrap_or(0);
                }
            },
            "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(args[i].clone());
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                // Treat as input file if no flag
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let mut config = match &config_file {
        Some(path) => match Config::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => Config::default(),
    };
    if raw {
        config = config.with_line_discipline(LineDiscipline::Raw);
    }
    config = config.with_screen_size(lines, cols);
    debug!(?config, "starting render");

    let mut terminal = Terminal::with_config(Screen::new(), config);

    let result = match &input_file {
        Some(path) => match File::open(path) {
            Ok(file) => render(file, &mut terminal),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => render(io::stdin().lock(), &mut terminal),
    };
    if let Err(e) = result {
        eprintln!("Error reading input: {}", e);
        return ExitCode::FAILURE;
    }

    let screen = terminal.into_output();
    match output_format {
        OutputFormat::Text => {
            for index in 0..screen.len() {
                println!("{}", screen.text(index).unwrap_or_default());
            }
        },
        OutputFormat::Json => match serde_json::to_string_pretty(&screen.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    ExitCode::SUCCESS
}

/// Feed everything from `input` into the terminal, one chunk at a time
fn render(mut input: impl Read, terminal: &mut Terminal<Screen>) -> io::Result<()> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        terminal.feed(&buf[..n])?;
    }
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("ANSI Render");
    println!();
    println!("Usage: ansi-render [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("      --raw          Line feed does not return to column 0");
    println!("  -l, --lines <N>    Initial line bound (default: 48)");
    println!("  -c, --cols <N>     Initial column bound (default: 80)");
    println!("      --config <F>   Load options from a JSON file");
    println!("  -j, --json         Output the rendered lines as JSON");
    println!("  -t, --text         Output the rendered lines as text (default)");
    println!("  -h, --help         Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!();
    println!("Examples:");
    println!("  printf 'Hello \\x1b[31mWorld\\x1b[0m' | ansi-render");
    println!("  ansi-render --json build.log > build.json");
}
