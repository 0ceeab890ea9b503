use serde::{Deserialize, Serialize};

/// Merged portfolio document.
///
/// ```yaml
/// contribution: 2000
/// output:
///   decimals: 2
/// assets:
///   - { name: VTI,  value: 9000, target: 0.55 }
///   - { name: VXUS, value: "$4,000", target: "30%" }
///   - { name: BND,  value: 3500, target: 0.15 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Signed amount to add (> 0) or remove (< 0). The CLI may override it.
    #[serde(default)]
    pub contribution: Option<f64>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub assets: Vec<AssetRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Round printed deltas to this many places; unset prints raw deltas.
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// One holding. `value` may be blank; such rows are dropped before allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRow {
    pub name: String,
    #[serde(default)]
    pub value: Option<Cell>,
    #[serde(default)]
    pub target: Option<Cell>,
}

impl AssetRow {
    pub fn new<S: Into<String>>(name: S, value: f64, target: f64) -> Self {
        Self {
            name: name.into(),
            value: Some(Cell::Number(value)),
            target: Some(Cell::Number(target)),
        }
    }
}

/// A spreadsheet-style cell: a number or free text ("$1,200", "55%", "").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Cell text as shown in drop reasons and errors.
    pub fn raw(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}
