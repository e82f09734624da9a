//! Token sources and line splitting.
//!
//! # Responsibility
//! - Split raw input lines into shell-style words.
//! - Abstract where lines come from, so the dispatch loop can be driven by
//!   stdin or by a pre-loaded script.
//!
//! # Invariants
//! - Splitting honors single quotes, double quotes and backslash escapes.
//! - A line that ends inside a quote or escape is an error, never a guess.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

/// Malformed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// Line ended while a quoted section was still open.
    UnbalancedQuote,
    /// Line ended directly after a backslash.
    DanglingEscape,
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedQuote => write!(f, "input line ends inside a quoted section"),
            Self::DanglingEscape => write!(f, "input line ends in an unfinished escape"),
        }
    }
}

impl Error for InputError {}

/// Splits one line into shell-style words.
///
/// Single quotes protect everything; double quotes protect everything but
/// `\"` and `\\`; a bare backslash escapes the next character. Adjacent
/// quoted and unquoted segments join into one word, and `""` produces an
/// empty word.
pub fn split_words(line: &str) -> Result<Vec<String>, InputError> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    // Set when `current` holds a word even if empty, e.g. after `""`.
    let mut pending = false;
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if in_single {
            if c == '\'' {
                in_single = false;
            } else {
                current.push(c);
            }
            continue;
        }
        if in_double {
            match c {
                '"' => in_double = false,
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => return Err(InputError::DanglingEscape),
                },
                _ => current.push(c),
            }
            continue;
        }
        match c {
            '\'' => {
                in_single = true;
                pending = true;
            }
            '"' => {
                in_double = true;
                pending = true;
            }
            '\\' => match chars.next() {
                Some(next) => current.push(next),
                None => return Err(InputError::DanglingEscape),
            },
            c if c.is_whitespace() => {
                if pending || !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            other => current.push(other),
        }
    }

    if in_single || in_double {
        return Err(InputError::UnbalancedQuote);
    }
    if pending || !current.is_empty() {
        words.push(current);
    }
    Ok(words)
}

/// Where the dispatch loop gets its input, and where it shows its output.
pub trait TokenSource {
    /// Blocks for one more line, already split into words.
    ///
    /// `Ok(None)` means the source is exhausted.
    fn next_tokens(&mut self) -> Result<Option<Vec<String>>, InputError>;

    /// Reads one raw answer line, without word splitting.
    ///
    /// Used for yes/no confirmations. `None` means no answer is available.
    fn next_raw(&mut self, prompt: &str) -> Option<String>;

    /// Presents buffered display lines before the loop blocks on input.
    ///
    /// Script-driven sources usually ignore this; the session transcript
    /// carries the same lines.
    fn show(&mut self, lines: &[String]) {
        let _ = lines;
    }
}

/// Pre-loaded script of input lines, consumed front to back.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// True when every scripted line has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.lines.is_empty()
    }
}

impl TokenSource for ScriptedSource {
    fn next_tokens(&mut self) -> Result<Option<Vec<String>>, InputError> {
        match self.lines.pop_front() {
            Some(line) => split_words(&line).map(Some),
            None => Ok(None),
        }
    }

    fn next_raw(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Interactive source reading from stdin and printing to stdout.
#[derive(Debug)]
pub struct StdinSource {
    prompt: String,
}

impl StdinSource {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()),
            Err(_) => None,
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new("> ")
    }
}

impl TokenSource for StdinSource {
    fn next_tokens(&mut self) -> Result<Option<Vec<String>>, InputError> {
        let prompt = self.prompt.clone();
        match self.read_line(&prompt) {
            Some(line) => split_words(&line).map(Some),
            None => Ok(None),
        }
    }

    fn next_raw(&mut self, prompt: &str) -> Option<String> {
        self.read_line(prompt)
    }

    fn show(&mut self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }
}
