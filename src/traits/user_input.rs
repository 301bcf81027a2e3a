use anyhow::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Response type for mock user input
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum MockResponse {
    Text(String),
    Secret(String),
}

/// Trait for user input operations to enable testing with mocks
pub trait UserInput: Send + Sync {
    /// Display a text input prompt
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Display a masked input prompt (for the API key)
    fn secret(&self, prompt: &str) -> Result<String>;
}

/// Real user input implementation using inquire crate
pub struct InquireUserInput;

impl UserInput for InquireUserInput {
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        use inquire::Text;
        let mut text_prompt = Text::new(prompt);
        if let Some(default_val) = default {
            text_prompt = text_prompt.with_default(default_val);
        }
        let answer = text_prompt.prompt()?;
        Ok(answer)
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        use inquire::Password;
        let answer = Password::new(prompt).without_confirmation().prompt()?;
        Ok(answer)
    }
}

/// Mock user input implementation for testing
#[allow(dead_code)]
pub struct MockUserInput {
    responses: Mutex<VecDeque<MockResponse>>,
}

#[allow(dead_code)]
impl MockUserInput {
    /// Create new mock with no pre-configured responses
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
        }
    }

    /// Create mock with pre-configured responses
    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

impl Default for MockUserInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInput for MockUserInput {
    fn text(&self, prompt: &str, _default: Option<&str>) -> Result<String> {
        match self.responses.lock().unwrap().pop_front() {
            Some(MockResponse::Text(s)) => Ok(s),
            Some(other) => anyhow::bail!("Unexpected mock response {:?} for prompt: {}", other, prompt),
            None => anyhow::bail!("No mock response configured for prompt: {}", prompt),
        }
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        match self.responses.lock().unwrap().pop_front() {
            Some(MockResponse::Secret(s)) => Ok(s),
            Some(other) => anyhow::bail!("Unexpected mock response {:?} for prompt: {}", other, prompt),
            None => anyhow::bail!("No mock response configured for prompt: {}", prompt),
        }
    }
}
