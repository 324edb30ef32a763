use std::collections::VecDeque;

use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use crate::error::{ProvisionError, ProvisionResult};

/// Source of operator answers.
pub trait Prompter {
    /// Ask for an echoed value, offering `default` when given.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> ProvisionResult<String>;

    /// Ask for a value without echoing it.
    fn secret(&mut self, prompt: &str) -> ProvisionResult<Zeroizing<String>>;
}

/// Interactive prompts on the controlling terminal.
pub struct Terminal;

impl Prompter for Terminal {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> ProvisionResult<String> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        Ok(input.interact_text()?.trim().to_string())
    }

    fn secret(&mut self, prompt: &str) -> ProvisionResult<Zeroizing<String>> {
        let value = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        Ok(Zeroizing::new(value))
    }
}

/// Replays a fixed queue of answers in order. An empty answer
/// to [`Prompter::input`] falls back to the default.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: VecDeque<String>,
}

impl Scripted {
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn pop(&mut self, prompt: &str) -> ProvisionResult<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| ProvisionError::Prompt(format!("no scripted answer for '{prompt}'")))
    }
}

impl Prompter for Scripted {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> ProvisionResult<String> {
        let answer = self.pop(prompt)?;
        match default {
            Some(d) if answer.is_empty() => Ok(d.to_string()),
            _ => Ok(answer),
        }
    }

    fn secret(&mut self, prompt: &str) -> ProvisionResult<Zeroizing<String>> {
        self.pop(prompt).map(Zeroizing::new)
    }
}
