//! Prompt implementations.

use async_trait::async_trait;
use shipyard_core::{Error, Prompter, Result};
use std::io::{BufRead, Write};
use tokio::sync::Mutex;

/// Asks questions on the controlling terminal.
///
/// Questions from concurrent platform pipelines are asked one at a time.
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    terminal: Mutex<()>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Questions go to stderr; stdout carries job output.
fn read_answer(question: &str) -> Result<String> {
    ask(question, &mut std::io::stderr(), &mut std::io::stdin().lock())
}

fn ask(question: &str, output: &mut impl Write, input: &mut impl BufRead) -> Result<String> {
    write!(output, "{} ", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::Prompt("input closed before an answer was given".to_string()));
    }
    Ok(line.trim().to_string())
}

fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn select(&self, message: &str, choices: &[&str]) -> Result<usize> {
        let mut question = format!("{}\n", message);
        for (i, choice) in choices.iter().enumerate() {
            question.push_str(&format!("  {}) {}\n", i + 1, choice));
        }
        question.push_str(&format!("Select [1-{}]:", choices.len()));
        let count = choices.len();

        let _terminal = self.terminal.lock().await;
        tokio::task::spawn_blocking(move || {
            loop {
                if let Some(index) = parse_choice(&read_answer(&question)?, count) {
                    return Ok(index);
                }
            }
        })
        .await
        .map_err(|e| Error::Prompt(e.to_string()))?
    }

    async fn confirm(&self, message: &str) -> Result<bool> {
        let question = format!("{} [y/N]", message);

        let _terminal = self.terminal.lock().await;
        tokio::task::spawn_blocking(move || {
            loop {
                if let Some(answer) = parse_confirmation(&read_answer(&question)?) {
                    return Ok(answer);
                }
            }
        })
        .await
        .map_err(|e| Error::Prompt(e.to_string()))?
    }
}

/// Fails every prompt instead of waiting for input.
#[derive(Debug, Default)]
pub struct NonInteractivePrompter;

impl NonInteractivePrompter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Prompter for NonInteractivePrompter {
    async fn select(&self, message: &str, _choices: &[&str]) -> Result<usize> {
        Err(Error::Prompt(format!(
            "cannot ask \"{}\" in non-interactive mode; pass --credentials-source local or remote",
            message
        )))
    }

    async fn confirm(&self, message: &str) -> Result<bool> {
        Err(Error::Prompt(format!(
            "cannot ask \"{}\" in non-interactive mode; pass --credentials-source local or remote",
            message
        )))
    }
}
