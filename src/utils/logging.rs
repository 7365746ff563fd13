/// Logging helpers
///
/// Banner-style lifecycle logging around the HTTP server
use tracing::info;

use crate::config::Config;

/// Logs startup configuration
///
/// # Parameters
/// - `config`: effective configuration
/// - `templates`: number of form templates loaded
pub fn log_startup(config: &Config, templates: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 Plataforma 2M - painel de formulários e documentos");
    info!("🌐 Endereço: http://{}:{}", config.bind_addr, config.port);
    info!("📁 Uploads: {} | Exportações: {}", config.upload_dir, config.export_dir);
    info!(
        "📦 Limite de upload: {} MB",
        config.max_upload_bytes / (1024 * 1024)
    );
    info!("🧩 Modelos de formulário: {}", templates);
    info!("{}", "=".repeat(60));
}

/// Logs server shutdown with a timestamp
pub fn log_shutdown() {
    info!("\n{}", "─".repeat(60));
    info!(
        "🛑 Servidor encerrado em {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "─".repeat(60));
}

/// Truncates long text for log display
///
/// # Parameters
/// - `text`: original text
/// - `max_len`: maximum number of characters
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("ação longa", 4), "ação...");
    }
}
