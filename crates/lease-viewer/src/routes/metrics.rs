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
use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::common::AppState;

/// Version 0.0.4 of the prometheus text exposition format
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    // The upkeep task only runs every few seconds, flush histograms before scraping
    state.prometheus_handle.run_upkeep();

    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.prometheus_handle.render(),
    )
}

pub fn get_router(path_prefix: &str) -> Router<AppState> {
    Router::new().route(path_prefix, get(render_metrics))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::common::test_support::app_state;

    #[tokio::test]
    async fn test_render_metrics_content_type() -> Result<(), Box<dyn std::error::Error>> {
        let static_dir = TempDir::new()?;
        let lease_file = static_dir.path().join("dhcpd.leases");
        let app = get_router("/metrics").with_state(app_state(&lease_file, static_dir.path()));

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|h| h.to_str().ok()),
            Some(EXPOSITION_CONTENT_TYPE)
        );
        Ok(())
    }
}
