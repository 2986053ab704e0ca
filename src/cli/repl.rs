//! Interactive REPL for Ensemble
//!
//! Provides the main user interaction loop. Each task line runs one flow
//! execution and prints the merged answer.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::commands::{handle_command, CommandResult};
use crate::core::Result;
use crate::flow::Flow;
use crate::tools::ToolRegistry;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    flow: Flow,
    tools: Arc<ToolRegistry>,
    cancel: CancellationToken,
}

impl Repl {
    /// Create a REPL over a configured flow
    pub fn new(flow: Flow, tools: Arc<ToolRegistry>, cancel: CancellationToken) -> Self {
        Self {
            flow,
            tools,
            cancel,
        }
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            if self.cancel.is_cancelled() {
                println!("\nGoodbye!");
                break;
            }

            print!("> ");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            match handle_command(input, &self.flow, &self.tools) {
                CommandResult::Exit => {
                    println!("\nGoodbye!");
                    break;
                }
                CommandResult::Handled(output) => {
                    println!("{}\n", output);
                }
                CommandResult::Continue(task) => {
                    match self.flow.execute(&self.cancel, &task).await {
                        Ok(answer) => println!("\n{}\n", answer),
                        Err(e) => eprintln!("\nFlow failed: {}\n", e),
                    }
                }
            }
        }

        Ok(())
    }

    fn print_banner(&self) {
        println!("Ensemble - multi-agent task flows");
        println!("Agents: {}", self.flow.agent_names().join(", "));
        println!("Type a task to run it, or /help for commands.\n");
    }
}
