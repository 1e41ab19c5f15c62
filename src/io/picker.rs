use std::io::{BufRead, Write};
use std::sync::Mutex;

use super::CompositionPicker;
use crate::core::params::Composition;
use crate::error::{Error, Result};

/// Lists compositions on the prompt writer and reads the choice from the input.
///
/// The answer may be the 1-based number shown in the list or the composition id.
pub struct TerminalPicker<R, W> {
    input: Mutex<R>,
    prompt: Mutex<W>,
}

impl TerminalPicker<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPicker<R, W> {
    pub fn new(input: R, prompt: W) -> Self {
        Self {
            input: Mutex::new(input),
            prompt: Mutex::new(prompt),
        }
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> Error {
    Error::external(format!("picker lock poisoned: {e}"))
}

impl<R: BufRead, W: Write> CompositionPicker for TerminalPicker<R, W> {
    fn select_composition(&self, compositions: &[Composition]) -> Result<String> {
        {
            let mut prompt = self.prompt.lock().map_err(lock_err)?;
            writeln!(prompt, "Select composition:")?;
            for (i, comp) in compositions.iter().enumerate() {
                writeln!(
                    prompt,
                    "  {}) {} ({} frames)",
                    i + 1,
                    comp.id,
                    comp.duration_in_frames
                )?;
            }
            write!(prompt, "> ")?;
            prompt.flush()?;
        }

        let mut line = String::new();
        self.input.lock().map_err(lock_err)?.read_line(&mut line)?;
        let answer = line.trim();

        if let Ok(n) = answer.parse::<usize>() {
            if let Some(comp) = n.checked_sub(1).and_then(|i| compositions.get(i)) {
                return Ok(comp.id.clone());
            }
        }
        compositions
            .iter()
            .find(|c| c.id == answer)
            .map(|c| c.id.clone())
            .ok_or_else(|| Error::InvalidSelection {
                input: answer.to_string(),
            })
    }
}
