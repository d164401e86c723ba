pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::api::{FileShareApi, HttpApiClient};
use crate::config::ClientConfig;
use crate::services::notifier::{
    Clipboard, MessageCatalog, Notifier, StdoutClipboard, TracingNotifier, Translator,
};
use std::sync::Arc;
use tracing::info;

/// Collaborators shared by the dashboard and the share dialogs
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn FileShareApi>,
    pub notifier: Arc<dyn Notifier>,
    pub clipboard: Arc<dyn Clipboard>,
    pub translator: Arc<dyn Translator>,
    pub config: ClientConfig,
}

/// Wire the HTTP client and the terminal side channels for the CLI
pub fn create_context(config: ClientConfig) -> anyhow::Result<AppContext> {
    let api = HttpApiClient::from_config(&config)?;

    let catalog = match &config.messages_file {
        Some(path) => {
            info!("🌐 Loading messages from {}", path.display());
            MessageCatalog::from_file(path)?
        }
        None => MessageCatalog::default(),
    };

    Ok(AppContext {
        api: Arc::new(api),
        notifier: Arc::new(TracingNotifier),
        clipboard: Arc::new(StdoutClipboard),
        translator: Arc::new(catalog),
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_context_uses_messages_file() {
        let path = std::env::temp_dir()
            .join(format!("share-dashboard-{}.json", std::process::id()));
        fs::write(&path, r#"{"dashboard.loadError": "Impossible de charger"}"#).unwrap();

        let config = ClientConfig {
            messages_file: Some(path.clone()),
            ..ClientConfig::default()
        };
        let ctx = create_context(config).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(ctx.translator.resolve("dashboard.loadError"), "Impossible de charger");
        assert_eq!(ctx.translator.resolve("dashboard.linkCopied"), "Link copied to clipboard");
    }

    #[test]
    fn test_missing_messages_file_is_an_error() {
        let config = ClientConfig {
            messages_file: Some("/nonexistent/share-dashboard/messages.json".into()),
            ..ClientConfig::default()
        };
        let err = create_context(config).err().unwrap();
        assert!(err.to_string().contains("failed to read messages"));
    }
}
