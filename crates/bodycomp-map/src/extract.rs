//! Typed coercion of raw CSV cells.
//!
//! Every failure mode — no match, unparsable capture, garbage input — is
//! `None`. Extraction never panics and never returns an error.

use std::sync::OnceLock;

use regex::Regex;

use bodycomp_model::{MappedValue, RuleType};

fn weight_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9.]+)").expect("invalid weight regex"))
}

fn kcal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+\.?[0-9]*)").expect("invalid kcal regex"))
}

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+\.[0-9]+)").expect("invalid percent regex"))
}

/// Coerce one raw cell according to its rule type.
pub fn coerce(rule_type: RuleType, raw: &str) -> Option<MappedValue> {
    match rule_type {
        RuleType::Value => raw.trim().parse().ok().map(MappedValue::Number),
        RuleType::Weight => capture_number(weight_re(), raw),
        RuleType::Kcal => capture_number(kcal_re(), raw),
        RuleType::Percent => capture_number(percent_re(), raw),
        RuleType::Raw => Some(MappedValue::Text(raw.to_string())),
    }
}

fn capture_number(re: &Regex, raw: &str) -> Option<MappedValue> {
    let captures = re.captures(raw)?;
    captures
        .get(1)?
        .as_str()
        .parse()
        .ok()
        .map(MappedValue::Number)
}
