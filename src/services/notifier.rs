use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info};

/// User-facing notification sink (toasts in a UI, log lines in the CLI)
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Destination for copied share links
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Resolves message keys such as `dashboard.loadError` to display text
pub trait Translator: Send + Sync {
    fn resolve(&self, key: &str) -> String;
}

/// Notifier that routes everything into the tracing log
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "notify", "✅ {}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "notify", "❌ {}", message);
    }
}

/// Clipboard that prints the copied text on stdout
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Clipboard that keeps the last copied text in memory
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut contents = self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *contents = Some(text.to_string());
        Ok(())
    }
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("dashboard.loadError", "Failed to load dashboard data"),
    ("dashboard.linkCopied", "Link copied to clipboard"),
    ("dashboard.linkCopyError", "Failed to copy link"),
    ("shareActions.editSuccess", "Share updated successfully"),
    ("shareActions.editError", "Failed to update share"),
    ("shareActions.deleteSuccess", "Share deleted successfully"),
    ("shareActions.deleteError", "Failed to delete share"),
    ("shareActions.filesSuccess", "Share files updated successfully"),
    ("shareActions.filesError", "Failed to update share files"),
    ("shareActions.recipientsSuccess", "Share recipients updated successfully"),
    ("shareActions.recipientsError", "Failed to update share recipients"),
];

/// Key/value message table. Unknown keys resolve to the key itself.
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Load overrides from a flat JSON object on top of the built-in English texts
    pub fn with_overrides_json(json: &str) -> Result<Self> {
        let overrides: HashMap<String, String> = serde_json::from_str(json)?;
        let mut catalog = Self::default();
        catalog.messages.extend(overrides);
        Ok(catalog)
    }

    /// Read overrides from a JSON file, see [`MessageCatalog::with_overrides_json`]
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read messages from {}", path.display()))?;
        Self::with_overrides_json(&json)
            .with_context(|| format!("invalid messages file {}", path.display()))
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl Translator for MessageCatalog {
    fn resolve(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
