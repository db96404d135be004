//! Interactive prompts for the names of the new user and bucket.
//!
//! Uses dialoguer on a terminal. When stdin is piped the answer is read as a
//! plain line so the tool can be scripted.

use anyhow::{bail, Context, Result};
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::{BufRead, IsTerminal};

/// Prompt text for the IAM user name
pub const USERNAME_PROMPT: &str = "Username for the new IAM user";

/// Prompt text for the bucket name
pub const BUCKET_PROMPT: &str = "Name for the new S3 bucket";

/// Interactive session state
pub struct InteractiveSession {
    term: Term,
    theme: ColorfulTheme,
}

impl Default for InteractiveSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveSession {
    /// Create a new interactive session
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }

    /// Return `given` if present, otherwise prompt for a value
    pub fn name_or_prompt(&self, given: Option<&str>, prompt: &str) -> Result<String> {
        match given {
            Some(name) => non_empty(name, prompt),
            None => self.prompt_name(prompt),
        }
    }

    /// Prompt for a non-empty name
    pub fn prompt_name(&self, prompt: &str) -> Result<String> {
        let answer = if self.term.is_term() && std::io::stdin().is_terminal() {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
                    if input.trim().is_empty() {
                        Err("a name is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text_on(&self.term)
                .with_context(|| format!("failed to read '{}'", prompt))?
        } else {
            read_piped_line(prompt)?
        };

        non_empty(&answer, prompt)
    }
}

fn non_empty(name: &str, prompt: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("no value given for '{}'", prompt);
    }
    Ok(name.to_string())
}

/// Read one line from a non-interactive stdin
fn read_piped_line(prompt: &str) -> Result<String> {
    eprint!("{}: ", prompt);

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("failed to read '{}' from stdin", prompt))?;

    if read == 0 {
        bail!("stdin closed before '{}' was answered", prompt);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_given_name_is_trimmed() {
        let session = InteractiveSession::new();
        let name = session
            .name_or_prompt(Some("  svc-ingest "), USERNAME_PROMPT)
            .unwrap();
        assert_eq!(name, "svc-ingest");
    }

    #[test]
    fn test_blank_given_name_rejected() {
        let session = InteractiveSession::new();
        let err = session
            .name_or_prompt(Some("   "), BUCKET_PROMPT)
            .unwrap_err();
        assert!(err.to_string().contains(BUCKET_PROMPT));
    }
}
