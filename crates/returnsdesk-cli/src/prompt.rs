//! Confirmation prompts for destructive commands.

use returnsdesk_store::Confirmation;
use std::io::{self, BufRead, Write};

/// Returns `Confirmed` when `assume_yes` is set, otherwise asks on stderr
/// and reads one line of stdin. End of input counts as declining.
pub fn confirm(question: &str, assume_yes: bool) -> io::Result<Confirmation> {
    if assume_yes {
        return Ok(Confirmation::Confirmed);
    }
    let stdin = io::stdin();
    ask(question, &mut stdin.lock(), &mut io::stderr())
}

fn ask<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> io::Result<Confirmation> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(is_yes(&line).into())
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}
