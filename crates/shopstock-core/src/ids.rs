//! Deterministic identifier generation for catalog records.
//!
//! Public IDs and SKU codes are the idempotency keys for every upsert the
//! importer issues, so the functions here must produce byte-identical output
//! for identical input across runs.

use crate::catalog::{AttributeMap, Condition};

/// Maximum length of a generated product public ID.
const PUBLIC_ID_MAX_LEN: usize = 60;

/// Maximum length of a generated SKU code.
const SKU_CODE_MAX_LEN: usize = 80;

/// Attribute keys contributing to a SKU code suffix, in the fixed order they
/// are joined. Attributes outside this list never affect the code.
const SKU_ATTRIBUTE_ORDER: [&str; 5] = ["storage", "ram", "color", "chip_tier", "connectivity"];

/// Generates a lowercase URL-safe slug from free text.
///
/// Diacritics are folded to their ASCII base character, anything outside
/// `[a-z0-9\s-]` is dropped, and runs of whitespace or hyphens collapse to a
/// single hyphen. Empty input yields an empty string.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        let c = fold_diacritic(c);
        for lower in c.to_lowercase() {
            if lower.is_ascii_alphanumeric() || lower.is_whitespace() || lower == '-' {
                cleaned.push(lower);
            }
        }
    }

    cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Generates the stable uppercase public ID for a logical product.
///
/// The non-empty parts among family, model, variant, and title are joined
/// with single spaces, uppercased, runs of non-alphanumeric characters are
/// collapsed to single hyphens, and the result is truncated to 60 characters.
///
/// Truncation can collide for two distinct inputs sharing a 60-character
/// prefix. This is an accepted limitation of the format, not detected here.
#[must_use]
pub fn generate_public_id(
    family: Option<&str>,
    model: Option<&str>,
    variant: Option<&str>,
    title: &str,
) -> String {
    let joined = [family, model, variant, Some(title)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    hyphenate_upper(&joined).chars().take(PUBLIC_ID_MAX_LEN).collect()
}

/// Generates the stable SKU code for one purchasable variant.
///
/// The base is `{public_id}-NEW` or `{public_id}-USED` depending on
/// condition. Present values among the fixed attribute order
/// storage, ram, color, `chip_tier`, connectivity are joined with hyphens
/// into an uppercase suffix. The final code is truncated to 80 characters,
/// with the same accepted collision caveat as [`generate_public_id`].
#[must_use]
pub fn generate_sku_code(
    public_id: &str,
    condition: Condition,
    attributes: &AttributeMap,
) -> String {
    let suffix = SKU_ATTRIBUTE_ORDER
        .iter()
        .filter_map(|key| attributes.get(*key))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let suffix = hyphenate_upper(&suffix);

    let base = format!("{public_id}-{}", condition.code_tag());
    let code = if suffix.is_empty() {
        base
    } else {
        format!("{base}-{suffix}")
    };

    code.chars().take(SKU_CODE_MAX_LEN).collect()
}

/// Uppercases `text` and collapses every run of non-alphanumeric characters
/// into a single hyphen, stripping leading and trailing hyphens.
fn hyphenate_upper(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_uppercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Folds common Latin diacritics to their ASCII base character.
///
/// Characters without a single-character fold pass through unchanged and are
/// dropped later by the slug character filter.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'ç' | 'Ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ñ' | 'Ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        'ý' | 'ÿ' | 'Ý' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Ultramarine Blue!"), "ultramarine-blue");
    }

    #[test]
    fn slugify_empty_input() {
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slugify_collapses_whitespace() {
        assert_eq!(slugify("  Multi   Space  "), "multi-space");
    }

    #[test]
    fn slugify_collapses_repeated_hyphens() {
        assert_eq!(slugify("a --- b"), "a-b");
    }

    #[test]
    fn slugify_folds_diacritics() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
    }

    #[test]
    fn public_id_joins_parts_uppercased() {
        let id = generate_public_id(
            Some("iPhone"),
            Some("16"),
            Some("Pro Max"),
            "Apple iPhone 16 Pro Max",
        );
        assert_eq!(id, "IPHONE-16-PRO-MAX-APPLE-IPHONE-16-PRO-MAX");
    }

    #[test]
    fn public_id_is_deterministic() {
        let a = generate_public_id(Some("iPhone"), Some("16"), None, "Apple iPhone 16");
        let b = generate_public_id(Some("iPhone"), Some("16"), None, "Apple iPhone 16");
        assert_eq!(a, b);
    }

    #[test]
    fn public_id_skips_empty_parts() {
        let id = generate_public_id(None, Some("  "), None, "Galaxy S24");
        assert_eq!(id, "GALAXY-S24");
    }

    #[test]
    fn public_id_truncates_to_sixty_chars() {
        let long = "x".repeat(200);
        let id = generate_public_id(None, None, None, &long);
        assert_eq!(id.chars().count(), 60);
    }

    #[test]
    fn sku_code_uses_fixed_attribute_order() {
        // color is declared before storage in the map, but storage sorts
        // first in the code suffix.
        let code = generate_sku_code(
            "IPH16",
            Condition::New,
            &attrs(&[("color", "Black"), ("storage", "128GB")]),
        );
        assert_eq!(code, "IPH16-NEW-128GB-BLACK");
    }

    #[test]
    fn sku_code_second_hand_tag() {
        let code = generate_sku_code(
            "IPH16",
            Condition::SecondHand,
            &attrs(&[("color", "Teal")]),
        );
        assert_eq!(code, "IPH16-USED-TEAL");
    }

    #[test]
    fn sku_code_without_attributes_is_bare_base() {
        let code = generate_sku_code("IPH16", Condition::New, &AttributeMap::new());
        assert_eq!(code, "IPH16-NEW");
    }

    #[test]
    fn sku_code_ignores_unknown_attributes() {
        let code = generate_sku_code(
            "IPH16",
            Condition::New,
            &attrs(&[("warranty", "2y"), ("storage", "256GB")]),
        );
        assert_eq!(code, "IPH16-NEW-256GB");
    }

    #[test]
    fn sku_code_collapses_attribute_punctuation() {
        let code = generate_sku_code(
            "IPH16",
            Condition::New,
            &attrs(&[("color", "Desert Titanium")]),
        );
        assert_eq!(code, "IPH16-NEW-DESERT-TITANIUM");
    }

    #[test]
    fn sku_code_truncates_to_eighty_chars() {
        let code = generate_sku_code(
            &"P".repeat(70),
            Condition::New,
            &attrs(&[("storage", "1TB"), ("color", "Ultramarine")]),
        );
        assert_eq!(code.chars().count(), 80);
    }
}
