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
use std::collections::BTreeSet;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum_template::RenderHtml;
use dhcp_lease_parser::LeaseRecord;
use serde::Serialize;

use crate::common::AppState;
use crate::lease_file;
use crate::routes::leases::LeaseQuery;

#[derive(Debug, Serialize)]
struct LeasePage {
    leases: Vec<LeaseRecord>,
    total: usize,
    /// Every binding state present in the file, for the filter drop-down
    states: Vec<String>,
    selected_state: String,
    lease_file: String,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorPage {
    error: String,
}

pub async fn show_html(
    State(state): State<AppState>,
    Query(query): Query<LeaseQuery>,
) -> Response {
    let leases = match lease_file::load_leases(&state.runtime_config.lease_file).await {
        Ok(leases) => leases,
        Err(err) => {
            tracing::error!(%err, "show_html");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                RenderHtml(
                    "error.html",
                    state.engine,
                    ErrorPage {
                        error: err.to_string(),
                    },
                ),
            )
                .into_response();
        }
    };

    let states = leases
        .iter()
        .filter(|lease| !lease.binding_state.is_empty())
        .map(|lease| lease.binding_state.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let selected_state = query.state.unwrap_or_default();
    let leases = lease_file::filter_by_state(leases, Some(selected_state.as_str()));

    let page = LeasePage {
        total: leases.len(),
        leases,
        states,
        selected_state,
        lease_file: state.runtime_config.lease_file.display().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    };

    RenderHtml("page.html", state.engine, page).into_response()
}

pub fn get_router(path_prefix: &str) -> Router<AppState> {
    Router::new().route(path_prefix, get(show_html))
}
