//! services/client/src/app/console.rs
//!
//! The terminal seam. Pages talk to a `Console` so they can be driven by a
//! script in tests and by `dialoguer` prompts for real.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

use crate::error::ClientError;

pub trait Console {
    /// Prints a block of text.
    fn show(&mut self, text: &str);

    /// Returns the index of the picked option.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize, ClientError>;

    fn input(&mut self, prompt: &str, initial: &str) -> Result<String, ClientError>;

    fn password(&mut self, prompt: &str) -> Result<String, ClientError>;

    fn confirm(&mut self, prompt: &str) -> Result<bool, ClientError>;
}

/// `Console` backed by interactive `dialoguer` prompts on the terminal.
pub struct TerminalConsole {
    theme: ColorfulTheme,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn show(&mut self, text: &str) {
        println!("{}", text);
    }

    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize, ClientError> {
        let picked = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()?;
        Ok(picked)
    }

    fn input(&mut self, prompt: &str, initial: &str) -> Result<String, ClientError> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn password(&mut self, prompt: &str) -> Result<String, ClientError> {
        let value = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact()?;
        Ok(value)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, ClientError> {
        let value = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(value)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// One scripted reply. `Choose` picks the first option starting with
    /// the given text.
    #[derive(Debug, Clone)]
    pub enum Reply {
        Choose(&'static str),
        Text(&'static str),
        Yes,
        No,
    }

    #[derive(Default)]
    pub struct ScriptedConsole {
        replies: VecDeque<Reply>,
        pub shown: Vec<String>,
        /// Option lists offered at each `choose`, in order.
        pub menus: Vec<Vec<String>>,
    }

    impl ScriptedConsole {
        pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
            Self {
                replies: replies.into_iter().collect(),
                ..Default::default()
            }
        }

        pub fn output(&self) -> String {
            self.shown.join("\n")
        }

        pub fn is_done(&self) -> bool {
            self.replies.is_empty()
        }

        fn next(&mut self, prompt: &str) -> Result<Reply, ClientError> {
            self.replies
                .pop_front()
                .ok_or_else(|| ClientError::Internal(format!("script ran out at '{}'", prompt)))
        }
    }

    impl Console for ScriptedConsole {
        fn show(&mut self, text: &str) {
            self.shown.push(text.to_string());
        }

        fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize, ClientError> {
            self.menus.push(options.to_vec());
            match self.next(prompt)? {
                Reply::Choose(label) => options
                    .iter()
                    .position(|o| o.starts_with(label))
                    .ok_or_else(|| {
                        ClientError::Internal(format!("'{}' not offered: {:?}", label, options))
                    }),
                other => Err(ClientError::Internal(format!("expected a choice, got {:?}", other))),
            }
        }

        fn input(&mut self, prompt: &str, _initial: &str) -> Result<String, ClientError> {
            match self.next(prompt)? {
                Reply::Text(text) => Ok(text.to_string()),
                other => Err(ClientError::Internal(format!("expected text, got {:?}", other))),
            }
        }

        fn password(&mut self, prompt: &str) -> Result<String, ClientError> {
            self.input(prompt, "")
        }

        fn confirm(&mut self, prompt: &str) -> Result<bool, ClientError> {
            match self.next(prompt)? {
                Reply::Yes => Ok(true),
                Reply::No => Ok(false),
                other => Err(ClientError::Internal(format!("expected yes/no, got {:?}", other))),
            }
        }
    }
}
