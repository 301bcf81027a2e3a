use std::sync::Mutex;

/// Output message captured by MockOutput for testing
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum OutputMessage {
    Success(String),
    Error(String),
    Warning(String),
    Info(String),
    Section(String),
    KeyValue(String, String),
    Dimmed(String),
    Path(String),
    TableHeader(Vec<String>),
    TableRow(Vec<String>),
    Plain(String),
    Blank,
}

/// Trait for terminal output operations to enable testing with mocks
pub trait Output: Send + Sync {
    /// Print a success message
    fn success(&self, message: &str);

    /// Print an error message
    #[allow(dead_code)]
    fn error(&self, message: &str);

    /// Print a warning message
    fn warning(&self, message: &str);

    /// Print an info message
    fn info(&self, message: &str);

    /// Print a section header
    fn section(&self, title: &str);

    /// Print a key-value pair
    fn key_value(&self, key: &str, value: &str);

    /// Print a key-value pair with highlighted value
    fn key_value_highlight(&self, key: &str, value: &str);

    /// Print a dimmed/muted message
    fn dimmed(&self, message: &str);

    /// Print a path
    fn path(&self, path_str: &str);

    /// Print a table header row
    fn table_header(&self, columns: &[&str]);

    /// Print a table data row
    fn table_row(&self, values: &[&str]);

    /// Print a line verbatim, without styling
    fn plain(&self, message: &str);

    /// Print a blank line
    fn blank(&self);
}

/// Real terminal output implementation using the output module
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn success(&self, message: &str) {
        crate::output::success(message);
    }

    fn error(&self, message: &str) {
        crate::output::error(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn info(&self, message: &str) {
        crate::output::info(message);
    }

    fn section(&self, title: &str) {
        crate::output::section(title);
    }

    fn key_value(&self, key: &str, value: &str) {
        crate::output::key_value(key, value);
    }

    fn key_value_highlight(&self, key: &str, value: &str) {
        crate::output::key_value_highlight(key, value);
    }

    fn dimmed(&self, message: &str) {
        crate::output::dimmed(message);
    }

    fn path(&self, path_str: &str) {
        crate::output::path(path_str);
    }

    fn table_header(&self, columns: &[&str]) {
        crate::output::table_header(columns);
    }

    fn table_row(&self, values: &[&str]) {
        crate::output::table_row(values);
    }

    fn plain(&self, message: &str) {
        crate::output::plain(message);
    }

    fn blank(&self) {
        crate::output::blank();
    }
}

/// Mock output implementation for testing (captures messages)
#[allow(dead_code)]
pub struct MockOutput {
    messages: Mutex<Vec<OutputMessage>>,
}

#[allow(dead_code)]
impl MockOutput {
    /// Create new mock with no captured messages
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Get all captured messages for assertions
    pub fn messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Check whether any captured message contains the given text
    pub fn contains_text(&self, text: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| match m {
            OutputMessage::Success(s)
            | OutputMessage::Error(s)
            | OutputMessage::Warning(s)
            | OutputMessage::Info(s)
            | OutputMessage::Section(s)
            | OutputMessage::Dimmed(s)
            | OutputMessage::Path(s)
            | OutputMessage::Plain(s) => s.contains(text),
            OutputMessage::KeyValue(k, v) => k.contains(text) || v.contains(text),
            OutputMessage::TableHeader(cols) => cols.iter().any(|c| c.contains(text)),
            OutputMessage::TableRow(vals) => vals.iter().any(|v| v.contains(text)),
            OutputMessage::Blank => false,
        })
    }

    fn push(&self, message: OutputMessage) {
        self.messages.lock().unwrap().push(message);
    }
}

impl Default for MockOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for MockOutput {
    fn success(&self, message: &str) {
        self.push(OutputMessage::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(OutputMessage::Error(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(OutputMessage::Warning(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.push(OutputMessage::Info(message.to_string()));
    }

    fn section(&self, title: &str) {
        self.push(OutputMessage::Section(title.to_string()));
    }

    fn key_value(&self, key: &str, value: &str) {
        self.push(OutputMessage::KeyValue(key.to_string(), value.to_string()));
    }

    fn key_value_highlight(&self, key: &str, value: &str) {
        self.push(OutputMessage::KeyValue(key.to_string(), value.to_string()));
    }

    fn dimmed(&self, message: &str) {
        self.push(OutputMessage::Dimmed(message.to_string()));
    }

    fn path(&self, path_str: &str) {
        self.push(OutputMessage::Path(path_str.to_string()));
    }

    fn table_header(&self, columns: &[&str]) {
        self.push(OutputMessage::TableHeader(
            columns.iter().map(|c| c.to_string()).collect(),
        ));
    }

    fn table_row(&self, values: &[&str]) {
        self.push(OutputMessage::TableRow(
            values.iter().map(|v| v.to_string()).collect(),
        ));
    }

    fn plain(&self, message: &str) {
        self.push(OutputMessage::Plain(message.to_string()));
    }

    fn blank(&self) {
        self.push(OutputMessage::Blank);
    }
}
