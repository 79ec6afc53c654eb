use std::io::{self, BufRead, Write};

use colored::Colorize;
use mvc_sdk::{ConfirmOverwrite, DiffOp, LineDiff, RepoPath};
use tracing::warn;

/// Interactive yes/no prompt shown before a checkout overwrites a file.
///
/// Only a `y` (any case, surrounding whitespace ignored) accepts. End of
/// input or a read failure counts as "no".
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, path: &RepoPath, preview: &LineDiff) -> io::Result<bool> {
        writeln!(self.output, "\n{} {}", "Conflict in".yellow().bold(), path)?;
        for op in &preview.ops {
            match op {
                DiffOp::Removed(text) => writeln!(self.output, "{}", format!("- {text}").red())?,
                DiffOp::Added(text) => writeln!(self.output, "{}", format!("+ {text}").green())?,
                DiffOp::Equal(_) => {}
            }
        }
        write!(self.output, "Do you want to overwrite {path}? (y/n): ")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

impl<R: BufRead, W: Write> ConfirmOverwrite for Prompt<R, W> {
    fn confirm(&mut self, path: &RepoPath, preview: &LineDiff) -> bool {
        self.ask(path, preview).unwrap_or_else(|e| {
            warn!(error = %e, path = %path, "prompt failed; keeping file");
            false
        })
    }
}
