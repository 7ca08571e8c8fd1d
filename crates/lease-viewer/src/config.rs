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
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_BIND_PORT: u16 = 8080;
const DEFAULT_LEASE_FILE: &str = "/var/lib/dhcp/dhcpd.leases";
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 3;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct RuntimeConfig {
    #[serde(default = "Defaults::bind_address")]
    pub bind_address: IpAddr,
    #[serde(default = "Defaults::bind_port")]
    pub bind_port: u16,
    /// The dhcpd lease database. It is read again on every request.
    #[serde(default = "Defaults::lease_file")]
    pub lease_file: PathBuf,
    #[serde(default = "Defaults::template_directory")]
    pub template_directory: PathBuf,
    /// Holds `css/`, `js/` and `favicon.ico`
    #[serde(default = "Defaults::static_directory")]
    pub static_directory: PathBuf,
    /// How long in-flight requests get to finish once a shutdown signal arrives
    #[serde(default = "Defaults::shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

pub(crate) struct Defaults;

impl Defaults {
    pub fn bind_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }
    pub fn bind_port() -> u16 {
        DEFAULT_BIND_PORT
    }
    pub fn lease_file() -> PathBuf {
        DEFAULT_LEASE_FILE.into()
    }
    pub fn template_directory() -> PathBuf {
        "web/template".into()
    }
    pub fn static_directory() -> PathBuf {
        "web/static".into()
    }
    pub fn shutdown_timeout_secs() -> u64 {
        DEFAULT_SHUTDOWN_TIMEOUT_SECS
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Could not read config file: {path}: {error}")]
    CouldNotRead { path: String, error: std::io::Error },
    #[error("Invalid TOML in config file: {path}: {error}")]
    InvalidToml {
        path: String,
        error: toml::de::Error,
    },
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: Defaults::bind_address(),
            bind_port: Defaults::bind_port(),
            lease_file: Defaults::lease_file(),
            template_directory: Defaults::template_directory(),
            static_directory: Defaults::static_directory(),
            shutdown_timeout_secs: Defaults::shutdown_timeout_secs(),
        }
    }
}

impl RuntimeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg = std::fs::read_to_string(path).map_err(|error| ConfigError::CouldNotRead {
            path: path.to_string_lossy().to_string(),
            error,
        })?;
        toml::from_str::<Self>(&cfg).map_err(|error| ConfigError::InvalidToml {
            path: path.to_string_lossy().to_string(),
            error,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.bind_port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Glob handed to tera, every file below the template directory is a template
    pub fn template_glob(&self) -> String {
        format!("{}/**/*", self.template_directory.display())
    }
}
