//! Identifier (SKU) generation
//!
//! Identifiers have the shape `{prefix_code}{brand_prefix}{sequence}`:
//! the category prefix code (1-2 letters), the first two characters of the
//! brand/model uppercased and space-padded, and a zero-padded four-digit
//! sequence. For example the first Samsung phone in category "H" is `HSA0001`.

use crate::error::{DomainError, DomainResult};
use crate::models::Category;
use crate::types::Sku;
use crate::validation::validate_prefix_code;

/// Number of digits in the sequence suffix
pub const SEQUENCE_WIDTH: usize = 4;

/// Largest sequence that fits in `SEQUENCE_WIDTH` digits
pub const MAX_SEQUENCE: u32 = 9_999;

const BRAND_PREFIX_LEN: usize = 2;

/// Two-character brand prefix, e.g. "Samsung S24" -> "SA", "X" -> "X "
pub fn brand_prefix(brand_model: &str) -> DomainResult<String> {
    let trimmed = brand_model.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            "brand_model",
            "Brand and model must not be empty",
        ));
    }

    let mut prefix: String = trimmed.to_uppercase().chars().take(BRAND_PREFIX_LEN).collect();
    while prefix.chars().count() < BRAND_PREFIX_LEN {
        prefix.push(' ');
    }
    Ok(prefix)
}

/// Category prefix code followed by the brand prefix
pub fn combined_prefix(prefix_code: &str, brand_model: &str) -> DomainResult<String> {
    validate_prefix_code(prefix_code).map_err(|m| DomainError::validation("prefix_code", m))?;
    Ok(format!("{}{}", prefix_code, brand_prefix(brand_model)?))
}

/// Sequence encoded in `id` when it belongs to `prefix`
///
/// Only an exact four-digit tail counts, so "HSAM0001" is not read as a
/// member of prefix "HSA".
pub fn sequence_of(id: &str, prefix: &str) -> Option<u32> {
    let tail = id.strip_prefix(prefix)?;
    if tail.len() != SEQUENCE_WIDTH || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

/// Render `prefix` + zero-padded sequence, refusing to overflow the width
pub fn format_identifier(prefix: &str, sequence: u32) -> DomainResult<Sku> {
    if sequence == 0 || sequence > MAX_SEQUENCE {
        return Err(DomainError::Capacity {
            prefix: prefix.to_string(),
        });
    }
    Ok(Sku::from_generated(format!(
        "{}{:0width$}",
        prefix,
        sequence,
        width = SEQUENCE_WIDTH
    )))
}

/// Next identifier for a raw prefix code
///
/// `existing` are the identifiers that reserve sequence slots: the active
/// stock, plus the sold history when sold ids must never be reused.
pub fn next_for_prefix<'a, I>(prefix_code: &str, brand_model: &str, existing: I) -> DomainResult<Sku>
where
    I: IntoIterator<Item = &'a Sku>,
{
    let prefix = combined_prefix(prefix_code, brand_model)?;
    let highest = existing
        .into_iter()
        .filter_map(|id| sequence_of(id.as_str(), &prefix))
        .max()
        .unwrap_or(0);

    format_identifier(&prefix, highest + 1)
}

/// Next identifier for a unit of `brand_model` in `category`
pub fn next_identifier<'a, I>(category: &Category, brand_model: &str, existing: I) -> DomainResult<Sku>
where
    I: IntoIterator<Item = &'a Sku>,
{
    next_for_prefix(&category.prefix_code, brand_model, existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skus(ids: &[&str]) -> Vec<Sku> {
        ids.iter().map(|id| Sku::parse(id).unwrap()).collect()
    }

    #[test]
    fn test_first_identifier_for_prefix() {
        let id = next_for_prefix("H", "Samsung S24", &skus(&[])).unwrap();
        assert_eq!(id.as_str(), "HSA0001");
    }

    #[test]
    fn test_sequence_follows_highest_existing() {
        let existing = skus(&["HSA0001", "HSA0005", "HAP0009", "LSA0010"]);
        let id = next_for_prefix("H", "samsung a10", &existing).unwrap();
        assert_eq!(id.as_str(), "HSA0006");
    }

    #[test]
    fn test_ignores_longer_prefixes() {
        let existing = skus(&["HSAM0042"]);
        let id = next_for_prefix("H", "Samsung", &existing).unwrap();
        assert_eq!(id.as_str(), "HSA0001");
        assert_eq!(sequence_of("HSAM0042", "HSA"), None);
        assert_eq!(sequence_of("HSA0042", "HSA"), Some(42));
    }

    #[test]
    fn test_short_brand_is_space_padded() {
        assert_eq!(brand_prefix("x").unwrap(), "X ");
        let id = next_for_prefix("T", "x", &skus(&[])).unwrap();
        assert_eq!(id.as_str(), "TX 0001");
    }

    #[test]
    fn test_empty_brand_is_rejected() {
        assert!(matches!(
            next_for_prefix("H", "  ", &skus(&[])),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_invalid_prefix_code_is_rejected() {
        assert!(next_for_prefix("h1", "Samsung", &skus(&[])).is_err());
    }

    #[test]
    fn test_capacity_exhausted() {
        let existing = skus(&["HSA9999"]);
        assert_eq!(
            next_for_prefix("H", "Samsung", &existing),
            Err(DomainError::Capacity {
                prefix: "HSA".to_string()
            })
        );
    }
}
