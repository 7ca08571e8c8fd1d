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
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use dhcp_lease_parser::LeaseRecord;
use serde::{Deserialize, Serialize};

use crate::common::AppState;
use crate::lease_file::{self, LeaseFileError};

const CODE_OK: i32 = 0;
const CODE_LEASE_FILE_ERROR: i32 = 1;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LeaseQuery {
    /// Only return leases in this binding state, e.g. `active`
    pub state: Option<String>,
}

/// Envelope shared by every `/api` response
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    code: i32,
    msg: String,
    data: T,
}

impl IntoResponse for LeaseFileError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            code: CODE_LEASE_FILE_ERROR,
            msg: self.to_string(),
            data: Vec::<LeaseRecord>::new(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub async fn list_leases(
    State(state): State<AppState>,
    Query(query): Query<LeaseQuery>,
) -> Result<impl IntoResponse, LeaseFileError> {
    let leases = lease_file::load_leases(&state.runtime_config.lease_file)
        .await
        .inspect_err(|err| tracing::error!(%err, "list_leases"))?;

    Ok(Json(ApiResponse {
        code: CODE_OK,
        msg: "ok".to_string(),
        data: lease_file::filter_by_state(leases, query.state.as_deref()),
    }))
}

pub fn get_router(path_prefix: &str) -> Router<AppState> {
    Router::new().route(
        format!("{}/{}", path_prefix, "leases").as_str(),
        get(list_leases),
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tempfile::{NamedTempFile, TempDir};
    use tower::ServiceExt;

    use super::*;
    use crate::common::test_support::{app_state, body_string};

    const LEASES: &str = "\
# generated by dhcpd
lease 10.0.0.5 {
  binding state active;
  hardware ethernet 00:11:22:33:44:55;
  client-hostname \"foo\";
}
lease 10.0.0.6 {
  binding state free;
  uid \"\\001\\002abc\";
}
";

    async fn get_json(
        app: Router,
        uri: &str,
    ) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        let status = response.status();
        Ok((status, serde_json::from_str(&body_string(response).await)?))
    }

    #[tokio::test]
    async fn test_list_leases() -> Result<(), Box<dyn std::error::Error>> {
        let mut lease_file = NamedTempFile::new()?;
        lease_file.write_all(LEASES.as_bytes())?;
        let static_dir = TempDir::new()?;
        let app = get_router("/api").with_state(app_state(lease_file.path(), static_dir.path()));

        let (status, body) = get_json(app, "/api/leases").await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "code": 0,
                "msg": "ok",
                "data": [
                    {
                        "ip": "10.0.0.5",
                        "state": "active",
                        "hardware": "00:11:22:33:44:55",
                        "uid": "",
                        "vendor": "",
                        "host": "\"foo\"",
                    },
                    {
                        "ip": "10.0.0.6",
                        "state": "free",
                        "hardware": "",
                        "uid": "01 02 61 62 63 ",
                        "vendor": "",
                        "host": "",
                    },
                ],
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_list_leases_by_state() -> Result<(), Box<dyn std::error::Error>> {
        let mut lease_file = NamedTempFile::new()?;
        lease_file.write_all(LEASES.as_bytes())?;
        let static_dir = TempDir::new()?;
        let app = get_router("/api").with_state(app_state(lease_file.path(), static_dir.path()));

        let (status, body) = get_json(app.clone(), "/api/leases?state=free").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["ip"], "10.0.0.6");

        let (_, body) = get_json(app, "/api/leases?state=").await?;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_leases_empty_file() -> Result<(), Box<dyn std::error::Error>> {
        let lease_file = NamedTempFile::new()?;
        let static_dir = TempDir::new()?;
        let app = get_router("/api").with_state(app_state(lease_file.path(), static_dir.path()));

        let (status, body) = get_json(app, "/api/leases").await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_leases_missing_file() -> Result<(), Box<dyn std::error::Error>> {
        let static_dir = TempDir::new()?;
        let missing = static_dir.path().join("dhcpd.leases");
        let app = get_router("/api").with_state(app_state(&missing, static_dir.path()));

        let (status, body) = get_json(app, "/api/leases").await?;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 1);
        assert_eq!(body["data"], json!([]));
        assert!(
            body["msg"]
                .as_str()
                .is_some_and(|msg| msg.starts_with("Could not read lease file"))
        );
        Ok(())
    }
}
