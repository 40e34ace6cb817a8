//! Line-oriented prompting over any `BufRead`/`Write` pair.
//!
//! Every reader retries invalid entries up to the configured limit and
//! never guesses: an empty required field, a non-numeric number, or an
//! out-of-range choice is re-asked, not defaulted.

use std::io::{BufRead, Write};
use thiserror::Error;

/// Prompting failures.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input was closed (EOF). The caller treats this as "leave".
    #[error("input closed")]
    Eof,

    /// Too many invalid entries in a row.
    #[error("no valid entry after {0} attempts")]
    RetriesExhausted(u32),

    /// The underlying stream failed.
    #[error("prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive prompter.
///
/// Generic over the streams so tests drive it with in-memory buffers.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
    max_retries: u32,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Creates a prompter allowing `max_retries` attempts per question.
    pub fn new(input: R, output: W, max_retries: u32) -> Self {
        Self {
            input,
            output,
            max_retries: max_retries.max(1),
        }
    }

    /// Direct access to the output stream, for rendering around the
    /// questions.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Reads one line, trimmed. EOF is an error, not an empty string.
    fn read_line(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim().to_string())
    }

    /// Asks once; the answer may be empty.
    pub fn read_text(&mut self, label: &str) -> Result<String, PromptError> {
        write!(self.output, "{label}: ")?;
        self.read_line()
    }

    /// Asks until the answer is non-empty.
    pub fn read_required_text(&mut self, label: &str) -> Result<String, PromptError> {
        for _ in 0..self.max_retries {
            let answer = self.read_text(label)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "A value is required.")?;
        }
        Err(PromptError::RetriesExhausted(self.max_retries))
    }

    /// Asks until the answer parses as a non-negative integer.
    pub fn read_u32(&mut self, label: &str) -> Result<u32, PromptError> {
        for _ in 0..self.max_retries {
            let answer = self.read_text(label)?;
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Enter a whole number.")?,
            }
        }
        Err(PromptError::RetriesExhausted(self.max_retries))
    }

    /// Asks until the answer parses as a strictly positive amount.
    ///
    /// Only the number format is checked here; balance rules are
    /// enforced by the operation that consumes the amount.
    pub fn read_amount(&mut self, label: &str) -> Result<f64, PromptError> {
        for _ in 0..self.max_retries {
            let answer = self.read_text(label)?;
            match answer.parse::<f64>() {
                Ok(value) if value > 0.0 => return Ok(value),
                Ok(_) => writeln!(self.output, "Enter a positive amount.")?,
                Err(_) => writeln!(self.output, "Enter a number.")?,
            }
        }
        Err(PromptError::RetriesExhausted(self.max_retries))
    }

    /// Asks until the answer parses as a non-negative amount.
    ///
    /// Used for opening balances, where zero is legitimate.
    pub fn read_non_negative_amount(&mut self, label: &str) -> Result<f64, PromptError> {
        for _ in 0..self.max_retries {
            let answer = self.read_text(label)?;
            match answer.parse::<f64>() {
                Ok(value) if value >= 0.0 => return Ok(value),
                Ok(_) => writeln!(self.output, "Enter a non-negative amount.")?,
                Err(_) => writeln!(self.output, "Enter a number.")?,
            }
        }
        Err(PromptError::RetriesExhausted(self.max_retries))
    }

    /// Asks until the answer is a menu choice in `1..=max`.
    pub fn read_choice(&mut self, label: &str, max: u32) -> Result<u32, PromptError> {
        for _ in 0..self.max_retries {
            let answer = self.read_text(label)?;
            match answer.parse::<u32>() {
                Ok(value) if (1..=max).contains(&value) => return Ok(value),
                _ => writeln!(self.output, "Choose 1 to {max}.")?,
            }
        }
        Err(PromptError::RetriesExhausted(self.max_retries))
    }

    /// Yes/no question. Accepts `y`/`yes`/`n`/`no`, case-insensitive.
    pub fn confirm(&mut self, label: &str) -> Result<bool, PromptError> {
        for _ in 0..self.max_retries {
            write!(self.output, "{label} [y/n]: ")?;
            let answer = self.read_line()?.to_lowercase();
            match answer.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Answer y or n.")?,
            }
        }
        Err(PromptError::RetriesExhausted(self.max_retries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(input: &str) -> Prompt<&[u8], Vec<u8>> {
        Prompt::new(input.as_bytes(), Vec::new(), 3)
    }

    #[test]
    fn read_text_trims() {
        let mut p = prompt("  hello  \n");
        assert_eq!(p.read_text("name").unwrap(), "hello");
    }

    #[test]
    fn required_text_retries_on_empty() {
        let mut p = prompt("\n\nfinally\n");
        assert_eq!(p.read_required_text("name").unwrap(), "finally");
    }

    #[test]
    fn required_text_exhausts_retries() {
        let mut p = prompt("\n\n\n");
        assert!(matches!(
            p.read_required_text("name"),
            Err(PromptError::RetriesExhausted(3))
        ));
    }

    #[test]
    fn eof_is_its_own_error() {
        let mut p = prompt("");
        assert!(matches!(p.read_text("name"), Err(PromptError::Eof)));
    }

    #[test]
    fn read_u32_retries_on_garbage() {
        let mut p = prompt("abc\n-2\n1234\n");
        assert_eq!(p.read_u32("pin").unwrap(), 1234);
    }

    #[test]
    fn read_amount_rejects_zero_and_negative() {
        let mut p = prompt("0\n-5\n12.5\n");
        assert_eq!(p.read_amount("amount").unwrap(), 12.5);
    }

    #[test]
    fn read_non_negative_amount_allows_zero() {
        let mut p = prompt("-1\n0\n");
        assert_eq!(p.read_non_negative_amount("balance").unwrap(), 0.0);
    }

    #[test]
    fn read_choice_enforces_range() {
        let mut p = prompt("0\n9\n3\n");
        assert_eq!(p.read_choice("choice", 8).unwrap(), 3);
    }

    #[test]
    fn confirm_accepts_variants() {
        let mut p = prompt("YES\n");
        assert!(p.confirm("sure?").unwrap());

        let mut p = prompt("n\n");
        assert!(!p.confirm("sure?").unwrap());
    }

    #[test]
    fn confirm_retries_on_noise() {
        let mut p = prompt("maybe\ny\n");
        assert!(p.confirm("sure?").unwrap());
    }
}
