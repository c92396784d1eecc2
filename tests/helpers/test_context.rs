//! Router harness backed by the in-memory fakes

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use UserEvents::hubs::ConsoleHub;
use UserEvents::services::{EmailService, HealthService, Mailer};
use UserEvents::{AppState, ServiceFactory, Settings};

use super::fakes::*;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("not JSON ({}): {}", e, self.body))
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    pub mailer: Arc<RecordingMailer>,
    pub shutdown: CancellationToken,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(true)
    }

    /// An app whose email settings are missing.
    pub fn without_email() -> Self {
        Self::build(false)
    }

    fn build(with_email: bool) -> Self {
        let store = InMemoryStore::default();
        let mailer = Arc::new(RecordingMailer::default());
        let email = if with_email {
            EmailService::new(Some(mailer.clone() as Arc<dyn Mailer>))
        } else {
            EmailService::new(None)
        };

        let services = ServiceFactory::from_parts(
            Arc::new(FakeUserService::new(store.clone())),
            Arc::new(FakeEventService::new(store.clone())),
            Arc::new(FakeUserEventService::new(store.clone())),
            HealthService::new(Arc::new(StaticProbe), Duration::from_secs(60)),
            email,
        );

        let shutdown = CancellationToken::new();
        let state = AppState::new(services, ConsoleHub::new(16), Settings::default());

        Self {
            router: UserEvents::router(state, shutdown.clone()),
            store,
            mailer,
            shutdown,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
