//! Integration tests for the Mauro Business storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mauro-integration-tests
//! ```
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! server or network is needed. By default the geolocation service points at
//! a closed local port, so every lookup falls back to the unavailable banner;
//! [`spawn_geolocation_service`] starts a local stand-in for the success path.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut ctx = TestContext::new();
//! let page = ctx.get("/").await;
//! assert_eq!(page.status, StatusCode::OK);
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::json;
use tower::ServiceExt;

use mauro_storefront::build_router;
use mauro_storefront::config::{GeolocationConfig, StorefrontConfig};
use mauro_storefront::middleware::session::SESSION_COOKIE_NAME;
use mauro_storefront::state::AppState;

/// Session secret used by every test router.
pub const TEST_SESSION_SECRET: &str = "k3J9x!Qp2Lm8Zr4@Vt6Wn1Yb5Hc7Fd0G";

/// Largest response body the helpers will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for an isolated test instance.
///
/// # Panics
///
/// Panics if the geolocation URL literal fails to parse.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 5000,
        base_url: "http://localhost:5000".to_string(),
        session_secret: SecretString::from(TEST_SESSION_SECRET),
        geolocation: GeolocationConfig {
            base_url: "http://127.0.0.1:9/json"
                .parse()
                .expect("valid geolocation URL"),
            timeout: Duration::from_secs(1),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Start a stand-in for the geolocation service on an ephemeral local port.
///
/// Every lookup, including the empty-address one sent for loopback
/// clients, answers `Luanda, Angola`. Returns the `/json` base URL.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn_geolocation_service() -> String {
    async fn luanda() -> Json<serde_json::Value> {
        Json(json!({"status": "success", "city": "Luanda", "country": "Angola"}))
    }

    let app = Router::new()
        .route("/json/", get(luanda))
        .route("/json/{ip}", get(luanda));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind geolocation stand-in");
    let addr = listener.local_addr().expect("bound address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("geolocation stand-in stopped");
    });

    format!("http://{addr}/json")
}

/// A rendered response, already buffered.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Whether this is a 303 redirect to `path`.
    #[must_use]
    pub fn redirects_to(&self, path: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(path)
    }
}

/// One browser talking to one fresh storefront instance.
///
/// Keeps the session cookie between requests the way a browser would.
pub struct TestContext {
    pub state: AppState,
    router: Router,
    cookie: Option<String>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Build a storefront with empty stores, reached from 127.0.0.1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Build a storefront from `config`, reached from 127.0.0.1.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build app state");
        let router = build_router(state.clone())
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 8080))));

        Self {
            state,
            router,
            cookie: None,
        }
    }

    /// The session cookie currently held, as `name=value`.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Drop the session cookie, as a new browser would.
    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    /// Send a GET request.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty());
        self.send(request.expect("valid request")).await
    }

    /// Send a POST with an `application/x-www-form-urlencoded` body.
    ///
    /// `body` must already be encoded (`email=ana%40example.com&password=1234`).
    pub async fn post_form(&mut self, path: &str, body: &str) -> TestResponse {
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()));
        self.send(request.expect("valid request")).await
    }

    /// Send a POST with an arbitrary body and optional `Content-Type`.
    pub async fn post_raw(
        &mut self,
        path: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut request = self.request("POST", path);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let request = request.body(Body::from(body.to_owned()));
        self.send(request.expect("valid request")).await
    }

    /// Sign up and log in, leaving this context authenticated.
    pub async fn sign_up_and_log_in(&mut self, email_encoded: &str, password: &str) {
        let body = format!("email={email_encoded}&password={password}");

        let signup = self.post_form("/signup", &body).await;
        assert!(signup.redirects_to("/login"), "signup: {signup:?}");

        let login = self.post_form("/login", &body).await;
        assert!(login.redirects_to("/"), "login: {login:?}");
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let pair = value.split(';').next().unwrap_or_default().trim();
            if pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")) {
                self.cookie = Some(pair.to_owned());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, MAX_BODY_BYTES)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            location,
            headers: parts.headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
