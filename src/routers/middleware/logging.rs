use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request, Response},
    middleware::Next,
};
use tokio::time::Instant;
use tracing::Level;

use crate::{
    build_info::{AXUM_VERSION, BUILD_TIME, RUST_VERSION},
    init::state::ServerState,
};

const ERROR_HEADERS: [&str; 5] = [
    "x-error-log-level",
    "x-error-status-code",
    "x-error-code",
    "x-error-message",
    "x-error-detail",
];

// tracing needs the level at compile time
macro_rules! log_error_response {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN => tracing::warn!($($field)*),
            Level::INFO => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            _ => tracing::trace!($($field)*),
        }
    };
}

fn header_str<'a>(headers: &'a HeaderMap, key: &str) -> &'a str {
    headers
        .get(key)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// First hop of `x-forwarded-for` when behind a proxy, else the peer address.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| peer.ip().to_string())
}

/// One RECV line per request, then RESP on success or ERSP carrying the
/// `x-error-*` details a `CodeErrorResp` attached. Those headers never reach
/// the client.
pub async fn log_middleware(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let start = Instant::now();
    state.add_responses_handled();

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let client_ip = client_ip(request.headers(), peer);

    tracing::info!(kind = %"RECV", method = %method, path = %path, client_ip = %client_ip);

    let mut response = next.run(request).await;
    let duration = start.elapsed();
    let status = response.status();
    let headers = response.headers_mut();

    if headers.contains_key("x-error-status-code") {
        let level = header_str(headers, "x-error-log-level")
            .parse::<Level>()
            .unwrap_or(Level::ERROR);

        log_error_response!(
            level,
            kind = %"ERSP",
            method = %method,
            path = %path,
            client_ip = %client_ip,
            status_code = %status.as_u16(),
            duration = ?duration,
            error_code = %header_str(headers, "x-error-code"),
            message = %header_str(headers, "x-error-message"),
            detail = %header_str(headers, "x-error-detail")
        );

        for key in ERROR_HEADERS {
            headers.remove(key);
        }
    } else {
        tracing::info!(
            kind = %"RESP",
            method = %method,
            path = %path,
            client_ip = %client_ip,
            status_code = %status.as_u16(),
            duration = ?duration
        );
    }

    headers.insert("x-server-built-time", HeaderValue::from_static(BUILD_TIME));
    headers.insert("x-server-name", HeaderValue::from_static(AXUM_VERSION));
    headers.insert("x-server-rust-version", HeaderValue::from_static(RUST_VERSION));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_for_wins_over_peer() {
        let peer: SocketAddr = "10.0.0.1:5555".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer), "10.0.0.1");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, peer), "203.0.113.9");
    }
}
