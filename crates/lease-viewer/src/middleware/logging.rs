/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Writes one logfmt access line per request
pub(crate) async fn logger(request: Request, next: Next) -> Response {
    let mut line = LogfmtLine::default();
    line.push("request_method", request.method().as_str());
    line.push("request_path", request.uri().path());
    line.push("request_query", request.uri().query().unwrap_or_default());
    for (header, key) in [
        ("Host", "request_headers_host"),
        ("X-Forwarded-For", "request_headers_x-forwarded-for"),
        ("User-Agent", "request_headers_user-agent"),
    ] {
        if let Some(value) = request.headers().get(header).and_then(|h| h.to_str().ok()) {
            line.push(key, value);
        }
    }
    // Only present when served through into_make_service_with_connect_info
    if let Some(ConnectInfo(socket_addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>()
    {
        line.push("remote_ip", socket_addr.ip().to_string());
        line.push("remote_port", socket_addr.port().to_string());
    }

    let start = Instant::now();
    let response = next.run(request).await;

    line.push("response_status", response.status().as_str());
    if let Some(content_length) = response
        .headers()
        .get("Content-Length")
        .and_then(|h| h.to_str().ok())
    {
        line.push("response_headers_content-length", content_length);
    }
    line.push(
        "duration_ms",
        format!("{:.3}", start.elapsed().as_secs_f64() * 1000.0),
    );

    tracing::info!(target: "lease_viewer::access", "{line}");

    response
}

/// Key-value pairs rendered as a logfmt line, sorted by key
#[derive(Default, Debug)]
struct LogfmtLine {
    props: BTreeMap<&'static str, String>,
}

impl LogfmtLine {
    fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.props.insert(key, value.into());
    }
}

impl fmt::Display for LogfmtLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.props.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            let needs_quotes = value.is_empty()
                || value
                    .bytes()
                    .any(|c| c <= b' ' || matches!(c, b'=' | b'"'));
            if needs_quotes {
                write!(f, "{key}=\"{}\"", value.escape_debug())?;
            } else {
                write!(f, "{key}={}", value.escape_debug())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_logfmt() {
        let mut line = LogfmtLine::default();
        line.push("request_method", "GET");
        line.push("request_path", "/api/leases");
        line.push("remote_ip", "127.0.0.1");
        assert_eq!(
            line.to_string(),
            "remote_ip=127.0.0.1 request_method=GET request_path=/api/leases"
        );

        line.push("request_query", "");
        line.push("request_headers_user-agent", "curl/8.5.0 (x86_64)");
        line.push("z", "say \"hi\"");
        assert_eq!(
            line.to_string(),
            "remote_ip=127.0.0.1 request_headers_user-agent=\"curl/8.5.0 (x86_64)\" \
             request_method=GET request_path=/api/leases request_query=\"\" z=\"say \\\"hi\\\"\""
        );
    }

    #[tokio::test]
    async fn test_logger_passes_response_through() -> Result<(), Box<dyn std::error::Error>> {
        let app = Router::new()
            .route("/", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .route_layer(axum::middleware::from_fn(logger));

        let response = app
            .oneshot(Request::builder().uri("/?x=1").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        Ok(())
    }
}
