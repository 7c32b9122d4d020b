use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub labels: SideLabels,
    #[serde(default)]
    pub keywords: KeywordTable,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Logical column roles the detector looks for in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    OrderNumber,
    Amount,
    Date,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::OrderNumber, Role::Amount, Role::Date];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderNumber => write!(f, "order_number"),
            Self::Amount => write!(f, "amount"),
            Self::Date => write!(f, "date"),
        }
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Role → header keyword substrings. Matching is case-insensitive; keywords
/// are lower-cased on load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordTable {
    #[serde(default = "default_order_number_keywords")]
    pub order_number: Vec<String>,
    #[serde(default = "default_amount_keywords")]
    pub amount: Vec<String>,
    #[serde(default = "default_date_keywords")]
    pub date: Vec<String>,
}

impl KeywordTable {
    pub fn for_role(&self, role: Role) -> &[String] {
        match role {
            Role::OrderNumber => &self.order_number,
            Role::Amount => &self.amount,
            Role::Date => &self.date,
        }
    }

    fn normalize(&mut self) {
        for list in [&mut self.order_number, &mut self.amount, &mut self.date] {
            for kw in list.iter_mut() {
                *kw = kw.trim().to_lowercase();
            }
        }
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            order_number: default_order_number_keywords(),
            amount: default_amount_keywords(),
            date: default_date_keywords(),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_order_number_keywords() -> Vec<String> {
    words(&[
        "auftrag",
        "auftragsnummer",
        "auftrags-nr",
        "bestellnummer",
        "bestellung",
        "order",
        "order number",
        "ordernumber",
        "order_id",
        "beleg",
        "referenz",
        "reference",
    ])
}

fn default_amount_keywords() -> Vec<String> {
    words(&[
        "betrag", "summe", "preis", "wert", "netto", "brutto", "amount", "total", "price", "value",
    ])
}

fn default_date_keywords() -> Vec<String> {
    words(&["datum", "date", "zeitpunkt", "tag", "time"])
}

// ---------------------------------------------------------------------------
// Labels + Tolerance
// ---------------------------------------------------------------------------

/// Display names for the two sides, used in messages and exports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct SideLabels {
    #[serde(default = "default_label_a")]
    pub a: String,
    #[serde(default = "default_label_b")]
    pub b: String,
}

impl Default for SideLabels {
    fn default() -> Self {
        Self {
            a: default_label_a(),
            b: default_label_b(),
        }
    }
}

fn default_label_a() -> String {
    "Protokoll".into()
}

fn default_label_b() -> String {
    "Abrechnung".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceConfig {
    /// Absolute amount difference below which two amounts count as equal.
    #[serde(default = "default_amount_tolerance")]
    pub amount: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            amount: default_amount_tolerance(),
        }
    }
}

fn default_amount_tolerance() -> f64 {
    0.01
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let mut config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.keywords.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ReconError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for role in Role::ALL {
            let list = self.keywords.for_role(role);
            if list.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "keywords.{role} must not be empty"
                )));
            }
            if list.iter().any(|kw| kw.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "keywords.{role} contains a blank keyword"
                )));
            }
        }

        let tol = self.tolerance.amount;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.amount must be a finite number >= 0, got {tol}"
            )));
        }

        if self.labels.a.trim().is_empty() || self.labels.b.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "labels.a and labels.b must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
