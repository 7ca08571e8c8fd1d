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
use std::path::Path;

use dhcp_lease_parser::{LeaseRecord, parse_leases_with_diagnostics, strip_comment_lines};

use crate::metrics::{LEASE_FILE_ERRORS, LEASES_PARSED};

#[derive(thiserror::Error, Debug)]
pub(crate) enum LeaseFileError {
    #[error("Could not read lease file {path}: {error}")]
    CouldNotRead { path: String, error: std::io::Error },
}

/// Reads the lease file from disk and parses it. Nothing is cached, every call sees the file as
/// dhcpd last wrote it.
///
/// Bytes which are not valid UTF-8 (dhcpd copies client supplied names as-is) are replaced
/// rather than failing the whole file.
pub(crate) async fn load_leases(path: &Path) -> Result<Vec<LeaseRecord>, LeaseFileError> {
    let raw = tokio::fs::read(path).await.map_err(|error| {
        metrics::counter!(LEASE_FILE_ERRORS).increment(1);
        LeaseFileError::CouldNotRead {
            path: path.display().to_string(),
            error,
        }
    })?;
    let content = String::from_utf8_lossy(&raw);

    let parsed = parse_leases_with_diagnostics(&strip_comment_lines(&content));
    for diagnostic in &parsed.diagnostics {
        tracing::trace!(%diagnostic, "skipped lease file content");
    }
    tracing::debug!(
        leases = parsed.leases.len(),
        skipped = parsed.diagnostics.len(),
        path = %path.display(),
        "parsed lease file"
    );
    metrics::gauge!(LEASES_PARSED).set(parsed.leases.len() as f64);

    Ok(parsed.leases)
}

/// Keeps the leases in the given binding state. An empty or missing state keeps everything.
pub(crate) fn filter_by_state(leases: Vec<LeaseRecord>, state: Option<&str>) -> Vec<LeaseRecord> {
    match state {
        Some(state) if !state.is_empty() => leases
            .into_iter()
            .filter(|lease| lease.binding_state == state)
            .collect(),
        _ => leases,
    }
}
