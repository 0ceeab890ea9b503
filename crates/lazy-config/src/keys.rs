//! Unused-key guard for portfolio files.
//!
//! Every leaf of the merged document must sit under a consumed pointer, or it
//! is reported. This catches typos like `contributon:` or `targte:` that would
//! otherwise silently fall back to defaults.
//!
//! Consumed pointers are JSON Pointer prefixes. A `*` segment matches any single
//! segment (used for list indices).
//!
//! Examples:
//! - "/output" consumes "/output/decimals"
//! - "/assets/*/name" consumes "/assets/3/name" but NOT "/assets/3/nam"

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Pointers read by `PortfolioConfig`. Keep in step with its fields.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/contribution",
    "/output/decimals",
    "/assets/*/name",
    "/assets/*/value",
    "/assets/*/target",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed pointers used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Produce an unused-key report for a merged portfolio document.
/// `Fail` errors when unused keys exist; `Warn` logs them and returns the report.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed_prefixes: Vec<String> = CONSUMED_POINTERS
        .iter()
        .map(|p| p.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if !report.is_clean() {
        if policy == UnusedKeyPolicy::Fail {
            let shown: Vec<&String> = report.unused_leaf_pointers.iter().take(12).collect();
            bail!(
                "PORTFOLIO_UNUSED_KEYS: {} key(s) not read by the allocator: {:?}",
                report.unused_leaf_pointers.len(),
                shown
            );
        }
        for p in &report.unused_leaf_pointers {
            tracing::warn!(pointer = %p, "unused portfolio key");
        }
    }

    Ok(report)
}

/// True if `prefix` covers `leaf`, segment by segment.
///
/// - "/" covers everything
/// - "*" matches exactly one segment
/// - "/a/b" covers "/a/b" and "/a/b/c" but NOT "/a/bc"
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    let mut leaf_segs = leaf.split('/').skip(1);
    for p in prefix.split('/').skip(1) {
        match leaf_segs.next() {
            Some(l) if p == "*" || p == l => {}
            _ => return false,
        }
    }
    true
}

/// Scalar leaves only; empty maps and lists carry no keys to report.
fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                // RFC 6901: '~' before '/', so "a/b" reads back as one token.
                let token = k.replace('~', "~0").replace('/', "~1");
                let next = format!("{prefix}/{token}");
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{prefix}/{i}");
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ if prefix.is_empty() => {}
        _ => out.push(prefix.to_string()),
    }
}
