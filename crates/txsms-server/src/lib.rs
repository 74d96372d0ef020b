//! txsms Web Server
//!
//! Axum-based REST API that turns forwarded bank SMS into transaction records.
//!
//! Security features:
//! - Shared-secret authentication on the write route (secure by default, use --no-auth for local dev)
//! - Constant-time credential comparison
//! - Sanitized error responses

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use txsms_core::{RecordStore, SmsParser};

mod handlers;

/// Environment variable holding the auth key (takes precedence over the key file)
pub const AUTH_KEY_ENV: &str = "TXSMS_AUTH_KEY";

/// Default auth key file, relative to the working directory
pub const DEFAULT_AUTH_KEY_FILE: &str = "authkey.txt";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether the write route requires the auth key (secure by default)
    pub require_auth: bool,
    /// Shared secret compared against the raw Authorization header
    pub auth_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            auth_key: None,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub parser: SmsParser,
    pub store: Arc<dyn RecordStore>,
    pub config: ServerConfig,
}

/// Authentication middleware for the write route
///
/// The Authorization header is compared as-is (no "Bearer" prefix) against
/// the configured key. Comparison is constant-time for same-length values.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let has_credential = presented.is_some();

    let authorized = match (presented, state.config.auth_key.as_deref()) {
        (Some(presented), Some(key)) => validate_auth_key(presented, key),
        _ => false,
    };

    if authorized {
        return next.run(request).await;
    }

    warn!(
        path = %request.uri().path(),
        has_credential,
        "Forbidden request - invalid or missing auth key"
    );
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({
            "error": "Forbidden"
        })),
    )
        .into_response()
}

/// Validate the presented credential using constant-time comparison
fn validate_auth_key(provided: &str, key: &str) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();
    let key_bytes = key.as_bytes();
    // Only compare if lengths match (constant-time for same-length keys)
    provided_bytes.len() == key_bytes.len() && provided_bytes.ct_eq(key_bytes).into()
}

/// Load the auth key from `TXSMS_AUTH_KEY`, falling back to a key file
pub fn load_auth_key(key_file: &Path) -> anyhow::Result<String> {
    resolve_auth_key(std::env::var(AUTH_KEY_ENV).ok(), key_file)
}

fn resolve_auth_key(env_value: Option<String>, key_file: &Path) -> anyhow::Result<String> {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        info!("Using auth key from {}", AUTH_KEY_ENV);
        return Ok(key);
    }

    let content = std::fs::read_to_string(key_file).with_context(|| {
        format!(
            "Failed to read auth key file {} (set {} or pass --no-auth)",
            key_file.display(),
            AUTH_KEY_ENV
        )
    })?;
    let key = content.trim_end();
    if key.is_empty() {
        anyhow::bail!("Auth key file {} is empty", key_file.display());
    }

    info!("Using auth key from {}", key_file.display());
    Ok(key.to_string())
}

/// Create the application router
pub fn create_router(
    parser: SmsParser,
    store: Arc<dyn RecordStore>,
    config: ServerConfig,
) -> Router {
    let state = Arc::new(AppState {
        parser,
        store,
        config,
    });

    let submit = post(handlers::post_message).route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/v1/messages",
            get(handlers::list_messages).merge(submit),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    parser: SmsParser,
    store: Arc<dyn RecordStore>,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.auth_key.is_none() {
        anyhow::bail!("Authentication is enabled but no auth key is configured");
    }

    info!(
        templates = parser.catalog().templates().len(),
        source = %parser.catalog().source(),
        "Message catalog ready"
    );

    let app = create_router(parser, store, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
