//! pseudosh - a browser pseudo-terminal with a tiny built-in command set
//!
//! pseudosh serves an xterm.js terminal page plus a JSON shell endpoint
//! that interprets a small fixed command set, and ships a native client
//! that attaches the current console to the same endpoint.
//!
//! # Features
//!
//! - **Browser Terminal**: xterm.js page served straight from the binary
//! - **Shell Endpoint**: stateless `POST /api/shell` command interpreter
//! - **Built-in Commands**: help, echo, curl and clear
//! - **Bounded curl**: timeouts, a response-size ceiling and web-only schemes
//! - **Native Attach**: drive the same session from a real console
//! - **Command History**: Up/Down arrows browse submitted commands
//!
//! # Quick Start
//!
//! ```text
//! pseudosh                     # Serve on 127.0.0.1:7878
//! pseudosh -l 0.0.0.0:8080     # Serve on another address
//! pseudosh attach              # Attach from the current console
//! ```

mod client;
mod config;
mod server;
mod shell;
mod term;

use std::env;
use std::path::PathBuf;
use std::process::exit;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::server::ShellServer;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run mode selected on the command line
enum Mode {
    Serve,
    Attach,
}

/// Command-line options
struct CliArgs {
    mode: Mode,
    /// Listen address override for serve mode
    listen: Option<String>,
    /// Server URL override for attach mode
    server: Option<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            mode: Mode::Serve,
            listen: None,
            server: None,
        }
    }
}

fn print_version() {
    eprintln!("pseudosh {}", VERSION);
}

fn print_help() {
    eprintln!(
        "pseudosh {} - a browser pseudo-terminal with a tiny built-in command set",
        VERSION
    );
    eprintln!();
    eprintln!("Usage: pseudosh [COMMAND] [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  serve                 Run the HTTP server (default)");
    eprintln!("  attach [URL]          Attach this console to a running server");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -l, --listen <ADDR>   Listen address for serve mode");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Attach keys:");
    eprintln!("  Up/Down               Browse command history");
    eprintln!("  Ctrl+C                Detach");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  pseudosh");
    eprintln!("  pseudosh -l 0.0.0.0:8080");
    eprintln!("  pseudosh attach http://127.0.0.1:7878");
    eprintln!();
    eprintln!("Configuration: ~/.pseudosh/config.toml");
    eprintln!("Attach log:    ~/.pseudosh/pseudosh.log");
}

fn parse_args() -> Result<CliArgs, String> {
    let args: Vec<String> = env::args().collect();
    let mut cli = CliArgs::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                exit(0);
            }
            "-v" | "--version" => {
                print_version();
                exit(0);
            }
            "serve" => {
                cli.mode = Mode::Serve;
            }
            "attach" => {
                cli.mode = Mode::Attach;
                // An optional server URL may follow
                if i + 1 < args.len() && !args[i + 1].starts_with('-') {
                    i += 1;
                    cli.server = Some(args[i].clone());
                }
            }
            "-l" | "--listen" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing listen address".to_string());
                }
                cli.listen = Some(args[i].clone());
            }
            arg => {
                return Err(format!("Unknown argument: {}", arg));
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn main() -> anyhow::Result<()> {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("Use --help for usage information");
            exit(1);
        }
    };

    match cli.mode {
        Mode::Serve => {
            init_stderr_logging();
            let mut config = Config::load();
            if let Some(listen) = cli.listen {
                config.server.listen = listen;
            }
            info!("pseudosh {} serving", VERSION);
            let server = ShellServer::new(&config)?;
            server.run()?;
        }
        Mode::Attach => {
            // The console belongs to the session; log to a file instead
            init_file_logging();
            let config = Config::load();
            let server = cli.server.unwrap_or(config.client.server);
            info!("pseudosh {} attaching", VERSION);
            client::run_attach(&server)?;
        }
    }

    Ok(())
}

/// Log to stderr, honoring RUST_LOG (serve mode)
fn init_stderr_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Log to ~/.pseudosh/pseudosh.log (attach mode)
fn init_file_logging() {
    let log_path = config::data_dir()
        .map(|dir| dir.join("pseudosh.log"))
        .unwrap_or_else(|| PathBuf::from("pseudosh.log"));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
