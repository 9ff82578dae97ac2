//! Interactive loop: read stdin, run one request, print, repeat until EOF or
//! quit.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use atlas::AtlasRunner;

fn is_quit_command(line: &str) -> bool {
    matches!(line.trim(), "quit" | "exit" | "/quit")
}

/// Prompt, read a line, run the request, print the response. Exits on EOF
/// (Ctrl+D) or a quit command; empty lines are skipped.
pub async fn run_repl_loop(runner: &AtlasRunner) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        let response = runner.ask(line.trim()).await;
        crate::print_response(&response);
    }

    Ok(())
}
