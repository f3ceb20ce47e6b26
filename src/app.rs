use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::errors::AppError;
use crate::event::{ApiRequest, ApiResponse};
use crate::router;
use crate::state::AppState;

/// HTTP front for the router: any method on any path becomes one
/// invocation, with the query string and headers carried over.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }).fallback(invoke))
        .fallback(invoke)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Bind the address named by the state's config.
pub async fn bind(state: &AppState) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = state.config.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    Ok(listener)
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let listener = bind(&state).await?;
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

async fn invoke(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = match String::from_utf8(body.to_vec()) {
        Ok(body) => body,
        // Preflight never reads the body.
        Err(_) if method == Method::OPTIONS => String::new(),
        Err(e) => {
            let err = AppError::Internal(format!("request body is not valid UTF-8: {e}"));
            return into_http_response(err.into_response());
        }
    };
    let req = to_api_request(&method, query, &headers, body);
    into_http_response(router::handle(&state, req).await)
}

fn to_api_request(
    method: &Method,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: String,
) -> ApiRequest {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((canonical_header_name(name.as_str()), value.to_string()))
        })
        .collect();
    ApiRequest {
        http_method: method.as_str().to_string(),
        query_string_parameters: query,
        headers,
        body: (!body.is_empty()).then_some(body),
    }
}

/// `x-authorization` -> `X-Authorization`. HTTP/1 header names arrive
/// lowercased, while the router looks headers up by exact key.
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn into_http_response(res: ApiResponse) -> Response {
    let status = StatusCode::from_u16(res.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut headers = HeaderMap::new();
    for (name, value) in &res.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "dropping invalid response header"),
        }
    }
    (status, headers, Body::from(res.body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::services::generate_token;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[test]
    fn canonicalizes_header_names() {
        assert_eq!(canonical_header_name("x-authorization"), "X-Authorization");
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("HOST"), "Host");
    }

    #[tokio::test]
    async fn binds_address_from_config() {
        let (state, _store) = AppState::in_memory();
        let listener = bind(&state).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert_eq!(addr.ip().to_string(), state.config.host);
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let (state, _store) = AppState::in_memory();
        let res = build_app(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_string(res).await, "ok");
    }

    #[tokio::test]
    async fn http_request_reaches_router_with_auth_header() {
        let (state, store) = AppState::in_memory();
        store.seed_setting("discord_url", "https://discord.gg/x", "url").await;

        let res = build_app(state)
            .oneshot(
                Request::get("/?action=settings")
                    .header("x-authorization", format!("Bearer {}", generate_token()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
        assert_eq!(res.headers()["content-type"], "application/json");
        let body: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body["discord_url"]["type"], "url");
    }

    #[tokio::test]
    async fn preflight_over_http() {
        let (state, _store) = AppState::in_memory();
        let res = build_app(state)
            .oneshot(
                Request::options("/anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["access-control-max-age"], "86400");
        assert!(body_string(res).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_action_over_http_is_400() {
        let (state, _store) = AppState::in_memory();
        let res = build_app(state)
            .oneshot(
                Request::post("/?action=nope")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(res).await, r#"{"error":"Invalid action"}"#);
    }

    #[tokio::test]
    async fn non_utf8_body_gets_json_error_with_cors() {
        let (state, _store) = AppState::in_memory();
        let res = build_app(state)
            .oneshot(
                Request::post("/?action=login")
                    .body(Body::from(vec![0xff_u8, 0xfe]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
        assert_eq!(res.headers()["content-type"], "application/json");
        let body: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("UTF-8"));
    }

    #[tokio::test]
    async fn health_path_still_answers_preflight() {
        let (state, _store) = AppState::in_memory();
        let res = build_app(state)
            .oneshot(Request::options("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["access-control-max-age"], "86400");
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn other_methods_on_health_go_through_router() {
        let (state, _store) = AppState::in_memory();
        let res = build_app(state)
            .oneshot(Request::post("/health").body(Body::from("{}")).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_string(res).await, r#"{"error":"Invalid action"}"#);
    }
}
