use crate::adapters::session::{
    commit_session, open_session, session_cookie, session_id_from_headers, SessionLocks,
};
use crate::core::handler::ContactHandler;
use crate::domain::model::ContactFields;
use crate::domain::ports::SessionStore;
use crate::utils::error::{ContactError, Result};
use axum::extract::{ConnectInfo, FromRequest, Multipart, Request, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Form, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ContactHandler>,
    pub sessions: Arc<dyn SessionStore>,
    pub locks: SessionLocks,
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub path: String,
    pub allowed_origin: String,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            path: "/contact".to_string(),
            allowed_origin: "*".to_string(),
        }
    }
}

pub fn router(state: AppState, options: &RouteOptions) -> Result<Router> {
    let origin = if options.allowed_origin == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(&options.allowed_origin).map_err(|e| {
            ContactError::InvalidConfigValueError {
                field: "server.allowed_origin".to_string(),
                value: options.allowed_origin.clone(),
                reason: e.to_string(),
            }
        })?;
        AllowOrigin::exact(value)
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS]);

    Ok(Router::new()
        .route(&options.path, any(contact))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serves the router; the peer address is needed for the email footer.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn contact(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let method = request.method().clone();
    let source = client_address(request.headers(), peer, state.trust_forwarded_for);
    let presented = session_id_from_headers(request.headers());

    // 非 POST 不讀 body，直接交給 handler 回 405
    let fields = if method == Method::POST {
        read_fields(request).await
    } else {
        ContactFields::default()
    };

    // 同一 session 的請求依序處理，寄信期間第二個請求會等到時間戳寫入後才檢查
    let _lease = match &presented {
        Some(id) => Some(state.locks.acquire(id).await),
        None => None,
    };
    let mut session = open_session(state.sessions.as_ref(), presented).await;
    let outcome = state
        .handler
        .handle(&method, &fields, &source, &mut session)
        .await;
    commit_session(state.sessions.as_ref(), &session).await;

    let mut response = (outcome.status, Json(outcome.body)).into_response();
    if session.created && session.dirty {
        if let Ok(cookie) = HeaderValue::from_str(&session_cookie(&session)) {
            response.headers_mut().insert(SET_COOKIE, cookie);
        }
    }
    response
}

/// Reads the four fields from a urlencoded or multipart body. A body that
/// cannot be parsed yields empty fields, which validation then rejects.
async fn read_fields(request: Request) -> ContactFields {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        return match Form::<ContactFields>::from_request(request, &()).await {
            Ok(Form(fields)) => fields,
            Err(e) => {
                tracing::debug!("Unreadable form body: {}", e);
                ContactFields::default()
            }
        };
    }

    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::debug!("Unreadable multipart body: {}", e);
            return ContactFields::default();
        }
    };

    let mut fields = ContactFields::default();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().map(str::to_string);
                match field.text().await {
                    Ok(value) => {
                        if let Some(name) = name {
                            fields.set(&name, value);
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Unreadable multipart field: {}", e);
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Malformed multipart body: {}", e);
                break;
            }
        }
    }
    fields
}

pub fn client_address(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(address) = forwarded {
            return address.to_string();
        }
    }
    peer.ip().to_string()
}
