use std::io::{self, BufRead, IsTerminal, Write};

use flickbox::domain::ports::UserPrompt;

/// Terminal prompt: alerts go to stderr, confirmations read a y/N answer from stdin.
pub struct ConsolePrompt {
    assume_yes: bool,
}

impl ConsolePrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl UserPrompt for ConsolePrompt {
    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            eprintln!("{message} [y/N] y (--yes)");
            return true;
        }
        // Never block on a pipe nobody answers.
        if !io::stdin().is_terminal() {
            eprintln!("{message} [y/N] n (stdin is not a terminal)");
            return false;
        }

        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
