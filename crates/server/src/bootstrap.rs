use std::sync::Arc;

use intake_core::config::AppConfig;
use intake_crm::{CrmError, CrmGateway, PipedriveClient};
use intake_notify::{HttpWebhookSender, NoopWebhookSender, WebhookError, WebhookSender};
use thiserror::Error;
use tracing::info;

/// Fully wired application: validated configuration plus the two
/// outbound clients, constructed once at startup and never mutated.
pub struct Application {
    pub config: AppConfig,
    pub gateway: Arc<dyn CrmGateway>,
    pub notifier: Arc<dyn WebhookSender>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("CRM client initialization failed: {0}")]
    Crm(#[source] CrmError),
    #[error("webhook client initialization failed: {0}")]
    Webhook(#[source] WebhookError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let gateway: Arc<dyn CrmGateway> =
        Arc::new(PipedriveClient::new(&config.crm).map_err(BootstrapError::Crm)?);
    info!(
        event_name = "system.bootstrap.crm_client_ready",
        correlation_id = "bootstrap",
        base_url = %config.crm.base_url,
        "CRM client initialized"
    );

    // Config validation guarantees a URL is present while enabled.
    let notifier: Arc<dyn WebhookSender> = match (config.notify.enabled, &config.notify.webhook_url)
    {
        (true, Some(url)) => Arc::new(
            HttpWebhookSender::new(url.clone(), config.notify.timeout_secs)
                .map_err(BootstrapError::Webhook)?,
        ),
        _ => Arc::new(NoopWebhookSender),
    };
    info!(
        event_name = "system.bootstrap.notifier_ready",
        correlation_id = "bootstrap",
        transport = if config.notify.enabled { "webhook" } else { "noop" },
        "outcome notifier initialized"
    );

    Ok(Application { config, gateway, notifier })
}

#[cfg(test)]
mod tests {
    use intake_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use super::bootstrap_with_config;

    fn config(notify_enabled: bool) -> AppConfig {
        AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                crm_api_token: Some("token-123".to_string()),
                notify_enabled: Some(notify_enabled),
                notify_webhook_url: notify_enabled
                    .then(|| "https://hooks.example.com/services/T/B/x".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config should load")
    }

    #[tokio::test]
    async fn bootstrap_wires_webhook_transport_when_enabled() {
        let app = bootstrap_with_config(config(true)).expect("bootstrap should succeed");
        assert!(app.config.notify.enabled);
    }

    #[tokio::test]
    async fn bootstrap_falls_back_to_noop_transport_when_disabled() {
        let app = bootstrap_with_config(config(false)).expect("bootstrap should succeed");
        assert!(!app.config.notify.enabled);
    }
}
