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

//! Parser for the lease database written by ISC dhcpd (`dhcpd.leases`).
//!
//! The parser never fails. Lines and blocks it can't make sense of are skipped, and
//! [`parse_leases_with_diagnostics`] reports what was skipped for callers which care.

use std::fmt;

use serde::Serialize;

pub mod octal;

const LEASE_KEYWORD: &str = "lease";
const BLOCK_OPEN: &str = "{";
const BLOCK_CLOSE: &str = "}";
const BINDING_STATE_PREFIX: &str = "state ";
const HARDWARE_ETHERNET_PREFIX: &str = "ethernet ";
const VENDOR_CLASS_PREFIX: &str = "vendor-class-identifier = ";

/// A single `lease <ip> { ... }` block. Fields which were not present in the block are empty.
#[derive(Serialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct LeaseRecord {
    pub ip: String,
    #[serde(rename = "state")]
    pub binding_state: String,
    #[serde(rename = "hardware")]
    pub hardware_ethernet: String,
    /// Client identifier as a hex dump, see [`octal::decode`]
    pub uid: String,
    #[serde(rename = "vendor")]
    pub vendor_class_identifier: String,
    /// Kept exactly as written, including any surrounding quotes
    #[serde(rename = "host")]
    pub hostname: String,
}

impl LeaseRecord {
    fn new(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            ..Default::default()
        }
    }
}

/// Result of [`parse_leases_with_diagnostics`]
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct ParsedLeases {
    pub leases: Vec<LeaseRecord>,
    /// Everything that was skipped, ordered by line
    pub diagnostics: Vec<ParseDiagnostic>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ParseDiagnostic {
    /// 1-based line number in the parsed text
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum DiagnosticKind {
    /// The text ended before the block was closed. The block is dropped.
    UnterminatedBlock { ip: String },
    /// Looked like a block header but wasn't `lease <ip> {`
    MalformedHeader { text: String },
    /// A body line with no value after its key
    MissingValue { text: String },
    /// A body line with a key that doesn't map onto a [`LeaseRecord`] field
    UnrecognizedField { key: String },
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            DiagnosticKind::UnterminatedBlock { ip } => {
                write!(f, "lease block for {ip} is never closed")
            }
            DiagnosticKind::MalformedHeader { text } => {
                write!(f, "malformed lease header: {text}")
            }
            DiagnosticKind::MissingValue { text } => write!(f, "line has no value: {text}"),
            DiagnosticKind::UnrecognizedField { key } => write!(f, "ignored field: {key}"),
        }
    }
}

/// Parses every lease block in `content`, in file order.
///
/// `content` is expected to have comment lines removed already (see [`strip_comment_lines`]).
pub fn parse_leases(content: &str) -> Vec<LeaseRecord> {
    parse_leases_with_diagnostics(content).leases
}

/// Same as [`parse_leases`], but also reports what was skipped along the way.
pub fn parse_leases_with_diagnostics(content: &str) -> ParsedLeases {
    let mut diagnostics = Vec::new();

    let blocks = scan_blocks(content, &mut diagnostics);
    let leases = blocks
        .into_iter()
        .map(|block| block.reduce(&mut diagnostics))
        .collect();

    // Structural problems are found before field problems, put them back in file order
    diagnostics.sort_by_key(|d| d.line);

    ParsedLeases {
        leases,
        diagnostics,
    }
}

/// Drops every line whose trimmed form starts with `#`. All other lines, blank ones included,
/// are kept verbatim and newline-terminated.
pub fn strip_comment_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().starts_with('#'))
        .fold(String::with_capacity(content.len()), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
}

enum LineToken<'a> {
    Open { ip: &'a str },
    MalformedOpen,
    Close,
    Content,
}

impl<'a> LineToken<'a> {
    fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed == BLOCK_CLOSE {
            return LineToken::Close;
        }

        let tokens = trimmed.split_whitespace().collect::<Vec<&str>>();
        match tokens.as_slice() {
            [LEASE_KEYWORD, ip, BLOCK_OPEN] if is_lease_ip(ip) => LineToken::Open { ip: *ip },
            [LEASE_KEYWORD, .., BLOCK_OPEN] => LineToken::MalformedOpen,
            _ => LineToken::Content,
        }
    }
}

/// Lease addresses are a run of decimal digits and dots
fn is_lease_ip(ip: &str) -> bool {
    ip.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && ip.bytes().any(|b| b.is_ascii_digit())
}

/// The raw lines between a block's header and its closing brace
struct LeaseBlock<'a> {
    ip: &'a str,
    body: Vec<(usize, &'a str)>,
}

/// First phase: split the text into lease blocks
fn scan_blocks<'a>(
    content: &'a str,
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> Vec<LeaseBlock<'a>> {
    enum ScanState<'a> {
        Outside,
        InBlock {
            header_line: usize,
            block: LeaseBlock<'a>,
        },
    }

    let mut blocks = Vec::new();
    let mut scan_state = ScanState::Outside;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        scan_state = match (scan_state, LineToken::classify(line)) {
            (ScanState::Outside, LineToken::Open { ip }) => ScanState::InBlock {
                header_line: line_no,
                block: LeaseBlock {
                    ip,
                    body: Vec::new(),
                },
            },
            (ScanState::Outside, LineToken::MalformedOpen) => {
                diagnostics.push(ParseDiagnostic {
                    line: line_no,
                    kind: DiagnosticKind::MalformedHeader {
                        text: line.trim().to_string(),
                    },
                });
                ScanState::Outside
            }
            (ScanState::Outside, LineToken::Close | LineToken::Content) => ScanState::Outside,
            (ScanState::InBlock { block, .. }, LineToken::Close) => {
                blocks.push(block);
                ScanState::Outside
            }
            // A block runs to the first closing brace, headers inside it are ordinary body lines
            (
                ScanState::InBlock {
                    header_line,
                    mut block,
                },
                LineToken::Open { .. } | LineToken::MalformedOpen | LineToken::Content,
            ) => {
                block.body.push((line_no, line));
                ScanState::InBlock { header_line, block }
            }
        };
    }

    if let ScanState::InBlock { header_line, block } = scan_state {
        diagnostics.push(ParseDiagnostic {
            line: header_line,
            kind: DiagnosticKind::UnterminatedBlock {
                ip: block.ip.to_string(),
            },
        });
    }

    blocks
}

impl LeaseBlock<'_> {
    /// Second phase: fold the body lines into a record. Later lines overwrite earlier ones.
    fn reduce(self, diagnostics: &mut Vec<ParseDiagnostic>) -> LeaseRecord {
        let mut record = LeaseRecord::new(self.ip);

        for (line_no, line) in self.body {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(' ') else {
                diagnostics.push(ParseDiagnostic {
                    line: line_no,
                    kind: DiagnosticKind::MissingValue {
                        text: line.to_string(),
                    },
                });
                continue;
            };
            let value = value.trim_end_matches(';');

            match key {
                "binding" => {
                    record.binding_state = strip_prefix_or_all(value, BINDING_STATE_PREFIX);
                }
                "hardware" => {
                    record.hardware_ethernet =
                        strip_prefix_or_all(value, HARDWARE_ETHERNET_PREFIX);
                }
                "uid" => record.uid = octal::decode(value),
                "set" => match value.strip_prefix(VENDOR_CLASS_PREFIX) {
                    Some(vendor) => record.vendor_class_identifier = vendor.to_string(),
                    None => diagnostics.push(ParseDiagnostic {
                        line: line_no,
                        kind: DiagnosticKind::UnrecognizedField {
                            key: line.to_string(),
                        },
                    }),
                },
                "client-hostname" => record.hostname = value.to_string(),
                _ => diagnostics.push(ParseDiagnostic {
                    line: line_no,
                    kind: DiagnosticKind::UnrecognizedField {
                        key: key.to_string(),
                    },
                }),
            }
        }

        record
    }
}

fn strip_prefix_or_all(value: &str, prefix: &str) -> String {
    value.strip_prefix(prefix).unwrap_or(value).to_string()
}
