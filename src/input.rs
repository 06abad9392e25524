//! Sources of configuration answers.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::Result;

/// A synchronous, line-oriented question/answer channel.
pub trait ConfigInput {
    /// Show `prompt` and return the next answer line without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the answer cannot be read, including end of input.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Show a non-fatal message to the user.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the message cannot be written.
    fn notify(&mut self, message: &str) -> Result<()>;
}

impl<T: ConfigInput + ?Sized> ConfigInput for &mut T {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        (**self).ask(prompt)
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        (**self).notify(message)
    }
}

/// Console implementation reading answers from `reader` and writing prompts to `writer`.
pub struct LineInput<R, W> {
    reader: R,
    writer: W,
    echo_prompts: bool,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    /// Create a console input that echoes prompts.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            echo_prompts: true,
        }
    }

    /// Suppress prompts. Notifications are still written.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.echo_prompts = !quiet;
        self
    }
}

impl LineInput<io::StdinLock<'static>, io::Stdout> {
    /// Console input over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConfigInput for LineInput<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        if self.echo_prompts {
            writeln!(self.writer, "{prompt}")?;
            self.writer.flush()?;
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no answer for: {prompt}"),
            )
            .into());
        }
        let answer = strip_line_terminator(&line).to_string();
        log::debug!("answer to {prompt:?}: {answer:?}");
        Ok(answer)
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")?;
        Ok(())
    }
}

fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Pre-recorded answers, handed out in order. Prompts and notifications are recorded.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    notices: Vec<String>,
}

impl ScriptedInput {
    /// Create from a list of answers.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Prompts asked so far, in order.
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Notifications shown so far, in order.
    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ConfigInput for ScriptedInput {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no answer for: {prompt}"),
            )
            .into()
        })
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }
}
