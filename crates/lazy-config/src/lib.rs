//! lazy-config
//!
//! Portfolio inputs for the allocator:
//! - Layered YAML portfolio files (base holdings + per-event overlays)
//! - Canonical JSON + SHA-256 `portfolio_hash` so a plan can be tied to its inputs
//! - Unused-key guard (Warn | Fail)
//! - Cleansing of sheet-like rows/columns into aligned numeric sequences

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

mod cleanse;
mod keys;
mod portfolio;

pub use cleanse::{
    cleanse_columns, cleanse_rows, parse_amount, parse_fraction, CleanedInputs, DropReason,
    DroppedCell,
};
pub use keys::{report_unused_keys, UnusedKeyPolicy, UnusedKeyReport, CONSUMED_POINTERS};
pub use portfolio::{AssetRow, Cell, OutputConfig, PortfolioConfig};

#[derive(Debug, Clone)]
pub struct LoadedPortfolio {
    pub portfolio_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedPortfolio {
    /// Typed view of the merged document.
    pub fn portfolio(&self) -> Result<PortfolioConfig> {
        serde_json::from_value(self.config_json.clone())
            .context("portfolio document does not match the expected schema")
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedPortfolio> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read portfolio yaml: {p}"))?;
        tracing::debug!(path = %p, bytes = raw.len(), "portfolio layer read");
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedPortfolio> {
    let mut merged = Value::Object(Default::default());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let layer: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        let layer = serde_json::to_value(layer)
            .with_context(|| format!("layer {i} is not representable as json"))?;
        overlay(&mut merged, layer);
    }

    let (canonical_json, portfolio_hash) = fingerprint(&merged)?;
    tracing::debug!(layers = yaml_docs.len(), %portfolio_hash, "portfolio layers merged");

    Ok(LoadedPortfolio {
        portfolio_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Later layers win. Maps merge key by key; anything else (lists included) replaces.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, val) in layer_map {
                match base_map.get_mut(&key) {
                    Some(slot) => overlay(slot, val),
                    None => {
                        base_map.insert(key, val);
                    }
                }
            }
        }
        (slot, val) => *slot = val,
    }
}

/// Compact JSON with sorted keys (serde_json's default map) and its SHA-256.
fn fingerprint(v: &Value) -> Result<(String, String)> {
    let canonical = serde_json::to_string(v).context("canonical json serialize failed")?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok((canonical, hex::encode(digest)))
}
