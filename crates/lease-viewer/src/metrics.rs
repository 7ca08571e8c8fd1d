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
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub(crate) const REQUESTS_TOTAL: &str = "lease_viewer_requests_total";
pub(crate) const REQUEST_DURATION: &str = "lease_viewer_request_duration_seconds";
pub(crate) const LEASES_PARSED: &str = "lease_viewer_leases_parsed";
pub(crate) const LEASE_FILE_ERRORS: &str = "lease_viewer_lease_file_errors_total";

const TIME_BUCKETS: &[f64; 11] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

pub(crate) fn setup_prometheus() -> Result<PrometheusHandle, BuildError> {
    let prometheus_handle = PrometheusBuilder::new()
        .add_global_label("system", "lease-viewer")
        .add_global_label("build_version", env!("CARGO_PKG_VERSION"))
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            TIME_BUCKETS,
        )?
        .install_recorder()?;

    describe_metrics();

    let handle_clone = prometheus_handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            handle_clone.run_upkeep();
        }
    });

    Ok(prometheus_handle)
}

fn describe_metrics() {
    metrics::describe_counter!(REQUESTS_TOTAL, "HTTP requests served, by route and status");
    metrics::describe_histogram!(
        REQUEST_DURATION,
        metrics::Unit::Seconds,
        "Time spent serving HTTP requests"
    );
    metrics::describe_gauge!(
        LEASES_PARSED,
        "Number of leases found the last time the lease file was parsed"
    );
    metrics::describe_counter!(
        LEASE_FILE_ERRORS,
        "Requests which failed because the lease file could not be read"
    );
}
