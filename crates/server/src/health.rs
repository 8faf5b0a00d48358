use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use intake_core::config::AppConfig;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{error, info};

/// Readiness facts frozen at startup. There is no database or other
/// mutable backing resource, so health reduces to whether the outbound
/// collaborators were configured.
#[derive(Clone)]
pub struct HealthState {
    crm_configured: bool,
    notifications_enabled: bool,
}

impl HealthState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            crm_configured: !config.crm.api_token.expose_secret().trim().is_empty(),
            notifications_enabled: config.notify.enabled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub crm: HealthCheck,
    pub notifications: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn spawn(bind_address: &str, port: u16, state: HealthState) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(serve_error) = axum::serve(listener, router(state)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %serve_error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let crm = if state.crm_configured {
        HealthCheck { status: "ready", detail: "CRM API token configured".to_string() }
    } else {
        HealthCheck { status: "degraded", detail: "CRM API token missing".to_string() }
    };

    let notifications = if state.notifications_enabled {
        HealthCheck { status: "ready", detail: "webhook notifications enabled".to_string() }
    } else {
        HealthCheck { status: "disabled", detail: "webhook notifications disabled".to_string() }
    };

    let ready = crm.status == "ready";
    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "intake-server runtime initialized".to_string(),
        },
        crm,
        notifications,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
