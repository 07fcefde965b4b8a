//! The tcplog binary: load config, start the listener, hand the terminal to
//! the console loop, and exit 0 when the operator types `quit`.

use clap::Parser;
use std::process::ExitCode;
use tcplog::cli::{Cli, build_registry};
use tcplog::config::Config;
use tcplog::server::Server;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config drives bind address, verbosity, and capture paths; it must load
    // before any sink or socket exists
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    let mut server = Server::new(&config, build_registry(&config));

    // Bind failure is fatal at startup: fail fast, no retry
    if let Err(e) = server.start() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = tcplog::shell::run(&server);
    server.stop();
    let _ = server.registry().flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Console error: {e}");
            ExitCode::FAILURE
        }
    }
}
