//! Contact intake routes.
//!
//! - `GET  /`        — service banner
//! - `POST /contact` — run the intake pipeline for one submission
//!
//! The router carries a permissive CORS layer (the form posts from a
//! browser on another origin, so the `OPTIONS` preflight must pass) and
//! response compression.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use intake_core::ContactSubmission;
use intake_crm::{CrmGateway, IntakePipeline};
use intake_notify::{render, OutcomeKind, WebhookSender};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ContactState {
    gateway: Arc<dyn CrmGateway>,
    notifier: Arc<dyn WebhookSender>,
}

impl ContactState {
    pub fn new(gateway: Arc<dyn CrmGateway>, notifier: Arc<dyn WebhookSender>) -> Self {
        Self { gateway, notifier }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: ContactState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/contact", post(submit_contact))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::compression::CompressionLayer::new())
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the contact intake API" }))
}

pub async fn submit_contact(
    State(state): State<ContactState>,
    Json(submission): Json<ContactSubmission>,
) -> Response {
    let correlation_id = Uuid::new_v4().simple().to_string();
    info!(
        event_name = "intake.contact.received",
        correlation_id = %correlation_id,
        name = %submission.name,
        email = %submission.email,
        "contact submission received"
    );

    // Invalid input never reaches the CRM and never notifies the channel.
    if let Err(validation_error) = submission.validate() {
        warn!(
            event_name = "intake.contact.rejected",
            correlation_id = %correlation_id,
            error = %validation_error,
            "contact submission failed validation"
        );
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse { error: validation_error.to_string() }),
        )
            .into_response();
    }

    // The submission is captured here, before the pipeline runs; the
    // failure report renders from it regardless of how far the run got.
    let pipeline = IntakePipeline::new(state.gateway.clone());
    match pipeline.run(&submission).await {
        Ok(outcome) => {
            info!(
                event_name = "intake.pipeline.succeeded",
                correlation_id = %correlation_id,
                person_id = outcome.person_id,
                organization_id = outcome.organization_id,
                deal_id = outcome.deal_id,
                note_id = outcome.note_id,
                "intake pipeline completed"
            );
            dispatch_notification(
                state.notifier,
                render(OutcomeKind::Success, &submission),
                correlation_id,
            );
            (StatusCode::OK, Json(json!({ "message": "success!" }))).into_response()
        }
        Err(pipeline_error) => {
            error!(
                event_name = "intake.pipeline.failed",
                correlation_id = %correlation_id,
                step = pipeline_error.step.as_str(),
                error = %pipeline_error,
                "intake pipeline failed"
            );
            dispatch_notification(
                state.notifier,
                render(OutcomeKind::Failure, &submission),
                correlation_id,
            );
            let status = StatusCode::from_u16(pipeline_error.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ErrorResponse { error: pipeline_error.to_string() })).into_response()
        }
    }
}

/// Fire-and-forget relative to the HTTP response: delivery happens in
/// its own task and a failed delivery only reaches the operator log,
/// never the caller.
fn dispatch_notification(
    notifier: Arc<dyn WebhookSender>,
    text: String,
    correlation_id: String,
) {
    tokio::spawn(async move {
        if let Err(webhook_error) = notifier.send(&text).await {
            error!(
                event_name = "intake.notify.failed",
                correlation_id = %correlation_id,
                error = %webhook_error,
                "outcome notification could not be delivered"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use intake_crm::{
        CrmError, Deal, NewDeal, NewNote, NewOrganization, NewPerson, Note, Organization, Person,
    };
    use intake_notify::WebhookError;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    /// Gateway fake handing out sequential record ids, with optional
    /// scripted failures per step. Call log records step and input name
    /// so concurrent submissions can be told apart.
    #[derive(Default)]
    struct ScriptedGateway {
        fail_person_with: Option<u16>,
        fail_organization: bool,
        next_id: AtomicI64,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn record(&self, call: String) {
            self.calls.lock().expect("calls lock").push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn allocate_id(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    #[async_trait]
    impl CrmGateway for ScriptedGateway {
        async fn create_person(&self, input: NewPerson) -> Result<Person, CrmError> {
            self.record(format!("person:{}", input.name));
            if let Some(status) = self.fail_person_with {
                return Err(CrmError::Remote { status, detail: "rejected".to_string() });
            }
            Ok(Person { id: self.allocate_id(), name: input.name })
        }

        async fn create_organization(
            &self,
            input: NewOrganization,
        ) -> Result<Organization, CrmError> {
            self.record(format!("organization:{}", input.name));
            if self.fail_organization {
                return Err(CrmError::Timeout);
            }
            Ok(Organization { id: self.allocate_id(), name: input.name })
        }

        async fn create_deal(&self, input: NewDeal) -> Result<Deal, CrmError> {
            self.record(format!("deal:{}", input.title));
            Ok(Deal { id: self.allocate_id() })
        }

        async fn create_note(&self, input: NewNote) -> Result<Note, CrmError> {
            self.record(format!("note:{}", input.content));
            Ok(Note { id: self.allocate_id() })
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingSender {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().expect("sent lock").clone()
        }
    }

    #[async_trait]
    impl WebhookSender for RecordingSender {
        async fn send(&self, text: &str) -> Result<(), WebhookError> {
            self.sent.lock().expect("sent lock").push(text.to_string());
            Ok(())
        }
    }

    fn app(gateway: Arc<ScriptedGateway>, notifier: Arc<RecordingSender>) -> Router {
        router(ContactState::new(gateway, notifier))
    }

    fn taro_payload() -> Value {
        json!({
            "name": "Taro",
            "email": "taro@example.com",
            "phone": "0312345678",
            "organization_name": "Acme",
            "title": "Website",
            "budget": "500000",
            "contact_body": "Please call me"
        })
    }

    fn post_contact(payload: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/contact")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("parse body")
    }

    /// Notification dispatch is a spawned task; poll until it lands.
    async fn wait_for_notifications(sender: &RecordingSender, expected: usize) -> Vec<String> {
        for _ in 0..100 {
            let sent = sender.sent();
            if sent.len() >= expected {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {expected} notifications, got {:?}", sender.sent());
    }

    #[tokio::test]
    async fn successful_submission_returns_success_and_notifies_once() {
        let gateway = Arc::new(ScriptedGateway::default());
        let notifier = Arc::new(RecordingSender::default());

        let response = app(gateway.clone(), notifier.clone())
            .oneshot(post_contact(&taro_payload()))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "message": "success!" }));

        let calls = gateway.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.contains(&"deal:Website".to_string()));
        assert!(calls.contains(&"note:Please call me".to_string()));

        let sent = wait_for_notifications(&notifier, 1).await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("新規のお問い合わせがありました。"));
        assert!(sent[0].contains("お名前: Taro"));
        assert!(sent[0].contains("メールアドレス: taro@example.com"));
        assert!(sent[0].contains("電話番号: 0312345678"));
        assert!(sent[0].contains("会社名: Acme"));
        assert!(sent[0].contains("ご予算: 500000"));
        assert!(sent[0].contains("Please call me"));
    }

    #[tokio::test]
    async fn organization_failure_short_circuits_and_notifies_failure() {
        let gateway =
            Arc::new(ScriptedGateway { fail_organization: true, ..ScriptedGateway::default() });
        let notifier = Arc::new(RecordingSender::default());

        let response = app(gateway.clone(), notifier.clone())
            .oneshot(post_contact(&taro_payload()))
            .await
            .expect("response");

        // A timeout never produced a remote status, so the caller sees 500.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().expect("error string").contains("organization"));

        let calls = gateway.calls();
        assert!(!calls.iter().any(|call| call.starts_with("deal")));
        assert!(!calls.iter().any(|call| call.starts_with("note")));

        let sent = wait_for_notifications(&notifier, 1).await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("サーバーエラーが発生しました。"));
        assert!(sent[0].contains("お名前: Taro"));
        assert!(sent[0].contains("ご予算: 500000"));
    }

    #[tokio::test]
    async fn crm_rejection_status_is_carried_to_the_caller() {
        let gateway = Arc::new(ScriptedGateway {
            fail_person_with: Some(403),
            ..ScriptedGateway::default()
        });
        let notifier = Arc::new(RecordingSender::default());

        let response = app(gateway.clone(), notifier.clone())
            .oneshot(post_contact(&taro_payload()))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        wait_for_notifications(&notifier, 1).await;
    }

    #[tokio::test]
    async fn invalid_submission_is_rejected_without_side_effects() {
        let gateway = Arc::new(ScriptedGateway::default());
        let notifier = Arc::new(RecordingSender::default());

        let response = app(gateway.clone(), notifier.clone())
            .oneshot(post_contact(&json!({ "name": "Taro" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().expect("error string").contains("email"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(gateway.calls().is_empty());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn cors_preflight_is_accepted_for_the_contact_route() {
        let gateway = Arc::new(ScriptedGateway::default());
        let notifier = Arc::new(RecordingSender::default());

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/contact")
            .header("origin", "https://forms.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .expect("request");

        let response =
            app(gateway, notifier).oneshot(request).await.expect("response");

        assert!(response.status().is_success());
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn concurrent_submissions_are_independent() {
        let gateway = Arc::new(ScriptedGateway::default());
        let notifier = Arc::new(RecordingSender::default());
        let router = app(gateway.clone(), notifier.clone());

        let mut hanako = taro_payload();
        hanako["name"] = json!("Hanako");
        hanako["email"] = json!("hanako@example.com");

        let (first, second) = tokio::join!(
            router.clone().oneshot(post_contact(&taro_payload())),
            router.clone().oneshot(post_contact(&hanako)),
        );

        assert_eq!(first.expect("first response").status(), StatusCode::OK);
        assert_eq!(second.expect("second response").status(), StatusCode::OK);

        // Eight creates total, four per submission, no shared records.
        let calls = gateway.calls();
        assert_eq!(calls.len(), 8);
        assert!(calls.contains(&"person:Taro".to_string()));
        assert!(calls.contains(&"person:Hanako".to_string()));

        let sent = wait_for_notifications(&notifier, 2).await;
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().any(|text| text.contains("お名前: Taro")));
        assert!(sent.iter().any(|text| text.contains("お名前: Hanako")));
    }

    #[tokio::test]
    async fn welcome_route_returns_service_banner() {
        let gateway = Arc::new(ScriptedGateway::default());
        let notifier = Arc::new(RecordingSender::default());

        let request =
            Request::builder().method("GET").uri("/").body(Body::empty()).expect("request");
        let response = app(gateway, notifier).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["message"].as_str().expect("message").contains("contact intake"));
    }
}
