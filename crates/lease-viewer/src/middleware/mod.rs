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
use std::str::FromStr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::Uri;
use axum::http::uri::PathAndQuery;
use axum::middleware::Next;
use axum::response::Response;

use crate::metrics::{REQUEST_DURATION, REQUESTS_TOTAL};

pub mod logging;

/// Collapses repeated slashes in the request path, so `/api//leases` is routed like `/api/leases`
pub async fn normalize_url<B>(mut request: Request<B>) -> Request<B> {
    let uri = request.uri_mut();
    if let Some(p_q) = uri.path_and_query() {
        if p_q.path().contains("//") {
            let mut normalized = collapse_slashes(p_q.path());
            if let Some(query) = p_q.query() {
                normalized.push('?');
                normalized.push_str(query);
            }
            if let Ok(path_and_query) = PathAndQuery::from_str(&normalized) {
                *uri = Uri::from(path_and_query);
            }
        }
    }
    request
}

fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Records a request counter and latency histogram, labelled by route rather than raw path
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(REQUESTS_TOTAL, "path" => path.clone(), "status" => status.clone())
        .increment(1);
    metrics::histogram!(REQUEST_DURATION, "path" => path, "status" => status)
        .record(start.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod test {
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::map_request;
    use axum::routing::get;
    use tower::ServiceExt;
    use tower_layer::Layer;

    use super::*;

    #[tokio::test]
    pub async fn test_url_normalize() {
        let request = Request::builder()
            .uri("http://localhost:8080//api///leases?state=active")
            .body(())
            .unwrap();
        let result = normalize_url(request).await;
        assert_eq!(result.uri().path(), "/api/leases");
        assert_eq!(result.uri().query(), Some("state=active"));
    }

    #[tokio::test]
    pub async fn test_url_normalize_leaves_clean_paths_alone() {
        let request = Request::builder()
            .uri("http://localhost:8080/css/style.css")
            .body(())
            .unwrap();
        let result = normalize_url(request).await;
        assert_eq!(result.uri().to_string(), "http://localhost:8080/css/style.css");
    }

    #[tokio::test]
    async fn test_normalized_request_is_routed() -> Result<(), Box<dyn std::error::Error>> {
        let router = Router::new()
            .route("/api/leases", get(|| async { "leases" }))
            .route_layer(axum::middleware::from_fn(track_metrics));
        let app = map_request(normalize_url).layer(router);

        let response = app
            .oneshot(Request::builder().uri("//api//leases").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}
