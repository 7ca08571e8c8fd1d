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
use tower_http::services::{ServeDir, ServeFile};

use crate::common::AppState;
use crate::middleware;

pub(crate) mod leases;
pub(crate) mod metrics;
pub(crate) mod page;

pub(crate) fn build_router(state: AppState) -> Router {
    let static_directory = state.runtime_config.static_directory.clone();

    Router::new()
        .nest_service("/css", ServeDir::new(static_directory.join("css")))
        .nest_service("/js", ServeDir::new(static_directory.join("js")))
        .route_service(
            "/favicon.ico",
            ServeFile::new(static_directory.join("favicon.ico")),
        )
        .merge(page::get_router("/"))
        .merge(leases::get_router("/api"))
        .route_layer(axum::middleware::from_fn(middleware::logging::logger))
        .route_layer(axum::middleware::from_fn(middleware::track_metrics))
        // Merged after the layers, /metrics stays out of the access log and the request metrics
        .merge(metrics::get_router("/metrics"))
        .with_state(state)
}
