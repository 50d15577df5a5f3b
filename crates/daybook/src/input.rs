//! Reading passwords, entry text and confirmations from stdin.

use std::io::{BufRead, IsTerminal, Read, Write};

use anyhow::{Context, Result, bail};

/// Password from the flag, or the first line of stdin.
pub(crate) fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        std::io::stderr().flush().ok();
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(strip_line_ending(&line).to_string())
}

/// Entry text from the argument, or all of stdin.
///
/// Blank text is passed through; the journal rejects it with its own message.
pub(crate) fn read_entry_text(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!(
            "No entry text provided and stdin is a terminal.\n\n\
             Usage:\n  \
             daybook entry add \"what happened today\" --mood calm\n  \
             echo \"what happened today\" | daybook entry add --mood calm"
        );
    }
    let mut buffer = String::new();
    stdin
        .lock()
        .read_to_string(&mut buffer)
        .context("Failed to read entry text from stdin")?;
    Ok(strip_line_ending(&buffer).to_string())
}

/// Ask a yes/no question on the terminal; `assume_yes` skips it.
pub(crate) fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        bail!("Refusing to delete without confirmation; pass --yes");
    }
    eprint!("{question} [y/N] ");
    std::io::stderr().flush().ok();
    let mut answer = String::new();
    stdin
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_ending_removes_one_newline() {
        assert_eq!(strip_line_ending("secret\n"), "secret");
        assert_eq!(strip_line_ending("secret\r\n"), "secret");
        assert_eq!(strip_line_ending("two\n\n"), "two\n");
        assert_eq!(strip_line_ending("  padded  "), "  padded  ");
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_flag_values_are_used_verbatim() {
        assert_eq!(read_password(Some("p4ss word".into())).unwrap(), "p4ss word");
        assert_eq!(read_entry_text(Some("  hi ".into())).unwrap(), "  hi ");
        assert!(confirm("Delete?", true).unwrap());
    }
}
