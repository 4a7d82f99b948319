//! Terminal implementation of the `Confirmer` port.

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use dialoguer::Input;

use crate::application::ports::Confirmer;

/// Asks on the terminal through `dialoguer`, or reads one line from stdin
/// when stdin is not a terminal (piped answers, scripts).
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn ask(&self, prompt: &str) -> Result<String> {
        if std::io::stdin().is_terminal() {
            return Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .context("reading confirmation");
        }

        let mut stderr = std::io::stderr();
        write!(stderr, "{prompt} ").context("writing prompt")?;
        stderr.flush().context("writing prompt")?;
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("reading confirmation")?;
        Ok(line)
    }
}
