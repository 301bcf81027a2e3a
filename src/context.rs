use crate::traits::{FileSystem, InquireUserInput, Output, RealFileSystem, TerminalOutput, UserInput};
#[cfg(test)]
use crate::traits::{MockFileSystem, MockOutput, MockUserInput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub input: Arc<dyn UserInput>,
    pub output: Arc<dyn Output>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            input: Arc::new(InquireUserInput),
            output: Arc::new(TerminalOutput),
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            input: Arc::new(MockUserInput::new()),
            output: Arc::new(MockOutput::new()),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        input: Arc<dyn UserInput>,
        output: Arc<dyn Output>,
    ) -> Self {
        Self { fs, input, output }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
