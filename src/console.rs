//! Blocking prompt/answer helpers over any reader and writer.

use log::warn;
use std::io::{BufRead, Write};

use crate::error::{RentalError, Result};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write without a newline and flush, so the cursor waits after the prompt.
    pub fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// One line of input with the line ending removed.
    pub fn read_line(&mut self, what: &'static str) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RentalError::InputClosed(what));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    pub fn ask(&mut self, text: &str, what: &'static str) -> Result<String> {
        self.prompt(text)?;
        self.read_line(what)
    }

    /// Keep asking until the answer parses as an integer accepted by `check`.
    /// `check` returns the rejection message for values it refuses.
    pub fn ask_integer<F>(&mut self, text: &str, what: &'static str, mut check: F) -> Result<i64>
    where
        F: FnMut(i64) -> std::result::Result<(), String>,
    {
        loop {
            let answer = self.ask(text, what)?;
            match answer.trim().parse::<i64>() {
                Ok(value) => match check(value) {
                    Ok(()) => return Ok(value),
                    Err(reason) => {
                        warn!("rejected {} {}", what, value);
                        self.say(&reason)?;
                    }
                },
                Err(_) => {
                    warn!("rejected non-numeric {} {:?}", what, answer);
                    self.say(&format!("'{}' is not a whole number.", answer.trim()))?;
                }
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
