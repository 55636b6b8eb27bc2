//! Declarative column-mapping schema.
//!
//! A schema entry per canonical field names the source CSV column, the
//! coercion rule for its values, and whether the field is mandatory. The
//! schema is data loaded from the settings document, never code.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A raw CSV row keyed by header name.
pub type RawRow = BTreeMap<String, String>;

/// Coercion rule for one mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Leading numeric token of the value (e.g. `70.5kg` -> 70.5).
    Weight,
    /// First integer or decimal token anywhere in the value.
    Kcal,
    /// First decimal token with a fractional part (e.g. `23.4%` -> 23.4).
    Percent,
    /// Plain floating-point parse of the whole value.
    #[default]
    Value,
    /// Pass the value through unmodified.
    Raw,
}

impl<'de> Deserialize<'de> for RuleType {
    /// Unrecognized rule names deserialize as [`RuleType::Raw`].
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

impl RuleType {
    /// Parse a rule type from the settings document.
    ///
    /// Unrecognized names pass values through unmodified.
    pub fn parse(name: &str) -> Self {
        match name {
            "weight" => Self::Weight,
            "kcal" => Self::Kcal,
            "percent" => Self::Percent,
            "value" => Self::Value,
            _ => Self::Raw,
        }
    }
}

/// How one canonical field is extracted from a source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Column name in the source CSV header.
    pub source_column: String,
    pub rule_type: RuleType,
    pub mandatory: bool,
}

/// Ordered mapping of canonical field name to extraction rule.
///
/// Immutable once loaded; entries keep the order of the settings document.
#[derive(Debug, Clone, Default)]
pub struct MappingSchema {
    rules: Vec<(String, MappingRule)>,
}

impl MappingSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: MappingRule) {
        self.rules.push((field.into(), rule));
    }

    pub fn rule(&self, field: &str) -> Option<&MappingRule> {
        self.rules
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rule)| rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A value extracted from a source row by the mapping engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedValue {
    Number(f64),
    Text(String),
}

impl MappedValue {
    /// Presence check used by mandatory-field validation.
    ///
    /// Zero and the empty string count as absent, matching the original
    /// import tool's truthiness rules.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0,
            Self::Text(t) => !t.is_empty(),
        }
    }

    /// Numeric view; text values are parsed when possible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => t.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Number(_) => None,
        }
    }
}
