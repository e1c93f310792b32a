use secrecy::SecretString;

/// Interactive input the acquisition workflow needs from the user.
pub trait Prompter {
    /// Read a visible line (usernames, role choices).
    fn input(&self, label: &str) -> Result<String, PromptError>;
    /// Read a masked line (passwords, one-time codes).
    fn secret(&self, label: &str) -> Result<SecretString, PromptError>;
}

/// The terminal could not supply an answer.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PromptError(pub String);

/// [`Prompter`] on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, label: &str) -> Result<String, PromptError> {
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .interact_text()
            .map(|s| s.trim().to_string())
            .map_err(|e| PromptError(e.to_string()))
    }

    fn secret(&self, label: &str) -> Result<SecretString, PromptError> {
        dialoguer::Password::new()
            .with_prompt(label)
            .interact()
            .map(SecretString::new)
            .map_err(|e| PromptError(e.to_string()))
    }
}
