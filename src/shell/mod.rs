//! tcplog interactive console.
//!
//! The service runs until told otherwise: the console loop reads commands and
//! the literal `quit` (or EOF / interrupt) is what ends the process.

use crate::server::Server;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const PROMPT: &str = "tcplog> ";

/// Runs the console loop until `quit`, EOF, or interrupt.
///
/// # Errors
/// Returns an error message if the line editor cannot be initialized or fails
/// mid-session.
pub fn run(server: &Server) -> Result<(), String> {
    let registry = server.registry();
    let mut rl = DefaultEditor::new().map_err(|e| format!("Error creating editor: {e}"))?;

    registry.info("tcplog console - type 'help' for commands, 'quit' to exit");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if !handle_command(line, server) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(format!("Readline error: {e}")),
        }
    }

    Ok(())
}

/// Returns `false` when the loop should end.
fn handle_command(line: &str, server: &Server) -> bool {
    let registry = server.registry();
    match line {
        "quit" | "exit" => false,
        "status" => {
            match server.local_addr() {
                Some(addr) => registry.info(format!("Listening on {addr}")),
                None => registry.warning("Not listening"),
            }
            registry.info(format!(
                "Active connections: {}",
                server.active_connections()
            ));
            true
        }
        "help" => {
            registry.info("Commands: help, status, quit");
            true
        }
        other => {
            registry.warning(format!("Unknown command: {other} (try 'help')"));
            true
        }
    }
}
