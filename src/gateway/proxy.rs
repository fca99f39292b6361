use axum::{
    body::{Body, Bytes},
    debug_handler,
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::Response,
};

use crate::{AppError, AppResult};

use super::{GatewayState, Upstreams};

#[debug_handler(state = GatewayState)]
pub(crate) async fn forward_user(
    State(http_client): State<reqwest::Client>,
    State(upstreams): State<Upstreams>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> AppResult<Response> {
    forward(&http_client, &upstreams.user_service_url, method, &uri, body).await
}

#[debug_handler(state = GatewayState)]
pub(crate) async fn forward_chat(
    State(http_client): State<reqwest::Client>,
    State(upstreams): State<Upstreams>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> AppResult<Response> {
    forward(&http_client, &upstreams.chat_service_url, method, &uri, body).await
}

/// Maps `/api/<rest>` onto `<base_url>/<rest>`, keeping the query string.
fn upstream_url(base_url: &str, uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let rest = path_and_query.strip_prefix("/api").unwrap_or(path_and_query);
    format!("{base_url}{rest}")
}

fn upstream_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout
    } else {
        AppError::Internal(err.into())
    }
}

async fn forward(
    http_client: &reqwest::Client,
    base_url: &str,
    method: Method,
    uri: &Uri,
    body: Bytes,
) -> AppResult<Response> {
    let url = upstream_url(base_url, uri);
    tracing::debug!(%method, %url, "forwarding");

    let mut request = http_client.request(method, &url);
    if !body.is_empty() {
        request = request
            .header(CONTENT_TYPE, "application/json")
            .body(body);
    }

    let upstream = request.send().await.map_err(upstream_error)?;
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let body = upstream.bytes().await.map_err(upstream_error)?;

    Ok(relay(status, content_type, body))
}

/// Rebuilds the upstream answer; the content type is only carried over with a body.
fn relay(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let has_body = !body.is_empty();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;

    if let (true, Some(content_type)) = (has_body, content_type) {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }

    response
}
