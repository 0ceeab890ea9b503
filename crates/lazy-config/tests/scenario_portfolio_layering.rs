//! Scenario: layered portfolio files merge deterministically
//!
//! GREEN when:
//! - Later layers override earlier ones (contribution overlay on base holdings).
//! - Reordering keys within YAML does not change `portfolio_hash`.
//! - Different values produce different hashes.
//! - The merged document cleanses into allocator inputs and allocates.

use lazy_config::{cleanse_rows, load_layered_yaml, load_layered_yaml_from_strings};
use std::fs;
use tempfile::tempdir;

const HOLDINGS_YAML: &str = r#"
output:
  decimals: 2
assets:
  - name: VTI
    value: 9000
    target: 0.55
  - name: VXUS
    value: "$4,000"
    target: "30%"
  - name: CASH
    value:
    target: 0
  - name: BND
    value: 3500
    target: 0.15
"#;

/// Same holdings, keys in a different order.
const HOLDINGS_YAML_REORDERED: &str = r#"
assets:
  - target: 0.55
    name: VTI
    value: 9000
  - value: "$4,000"
    target: "30%"
    name: VXUS
  - target: 0
    name: CASH
    value:
  - name: BND
    target: 0.15
    value: 3500
output:
  decimals: 2
"#;

const DEPOSIT_YAML: &str = r#"
contribution: 2000
"#;

const WITHDRAW_YAML: &str = r#"
contribution: -10000
"#;

#[test]
fn overlay_sets_contribution_and_keeps_holdings() {
    let loaded = load_layered_yaml_from_strings(&[HOLDINGS_YAML, DEPOSIT_YAML]).unwrap();
    let p = loaded.portfolio().unwrap();

    assert_eq!(p.contribution, Some(2000.0));
    assert_eq!(p.output.decimals, Some(2));
    assert_eq!(p.assets.len(), 4);
}

#[test]
fn later_layer_wins() {
    let loaded =
        load_layered_yaml_from_strings(&[HOLDINGS_YAML, DEPOSIT_YAML, WITHDRAW_YAML]).unwrap();
    assert_eq!(loaded.portfolio().unwrap().contribution, Some(-10_000.0));
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[HOLDINGS_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[HOLDINGS_YAML_REORDERED]).unwrap();

    assert_eq!(a.portfolio_hash, b.portfolio_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn different_contribution_changes_hash() {
    let a = load_layered_yaml_from_strings(&[HOLDINGS_YAML, DEPOSIT_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[HOLDINGS_YAML, WITHDRAW_YAML]).unwrap();
    assert_ne!(a.portfolio_hash, b.portfolio_hash);
}

#[test]
fn invalid_yaml_is_an_error() {
    let err = load_layered_yaml_from_strings(&["assets: [unclosed"]).unwrap_err();
    assert!(format!("{err:#}").contains("invalid yaml"));
}

#[test]
fn merged_portfolio_cleanses_and_allocates() {
    let loaded = load_layered_yaml_from_strings(&[HOLDINGS_YAML, DEPOSIT_YAML]).unwrap();
    let p = loaded.portfolio().unwrap();
    let inputs = cleanse_rows(&p.assets).unwrap();

    assert_eq!(inputs.labels, vec!["VTI", "VXUS", "BND"]);
    assert_eq!(inputs.dropped.len(), 1);
    assert_eq!(inputs.dropped[0].label, "CASH");

    let deltas = lazy_alloc::lazy_alloc(
        &inputs.current_values,
        &inputs.target_allocs,
        p.contribution.unwrap(),
    )
    .unwrap();
    let rounded = lazy_alloc::round_deltas(&deltas, p.output.decimals.unwrap());
    assert_eq!(rounded, vec![705.88, 1294.12, 0.0]);
}

#[test]
fn files_load_in_merge_order() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("holdings.yaml");
    let overlay = dir.path().join("deposit.yaml");
    fs::write(&base, HOLDINGS_YAML).unwrap();
    fs::write(&overlay, DEPOSIT_YAML).unwrap();

    let base_s = base.to_string_lossy().to_string();
    let overlay_s = overlay.to_string_lossy().to_string();
    let from_files = load_layered_yaml(&[base_s.as_str(), overlay_s.as_str()]).unwrap();
    let from_strings = load_layered_yaml_from_strings(&[HOLDINGS_YAML, DEPOSIT_YAML]).unwrap();

    assert_eq!(from_files.portfolio_hash, from_strings.portfolio_hash);
}

#[test]
fn missing_file_names_the_path() {
    let err = load_layered_yaml(&["/definitely/not/here.yaml"]).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
}
