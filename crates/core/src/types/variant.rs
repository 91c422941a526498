//! Explicit identity key for cart lines.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Identity of a cart line: product plus the chosen size and color.
///
/// Two lines with the same key are the same purchasable configuration and
/// must be merged. An absent size or color (`None`) is its own stable value
/// and never equals `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantKey {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl VariantKey {
    /// Create a key from a product id and optional variant attributes.
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        size: Option<impl Into<String>>,
        color: Option<impl Into<String>>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.map(Into::into),
            color: color.map(Into::into),
        }
    }

    /// Key for a product bought without any size or color.
    #[must_use]
    pub fn plain(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
            size: None,
            color: None,
        }
    }

    /// Whether this key matches the given id and variant attributes exactly.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        self.product_id == *product_id && self.size.as_deref() == size && self.color.as_deref() == color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_variant_is_not_empty_string() {
        let none = VariantKey::plain("7");
        let empty = VariantKey::new("7", Some(""), None::<String>);
        assert_ne!(none, empty);
    }

    #[test]
    fn test_matches_exact_attributes() {
        let key = VariantKey::new("7", Some("38"), Some("Black"));
        let id = ProductId::new("7");
        assert!(key.matches(&id, Some("38"), Some("Black")));
        assert!(!key.matches(&id, Some("38"), None));
        assert!(!key.matches(&id, Some("37"), Some("Black")));
        assert!(!key.matches(&ProductId::new("8"), Some("38"), Some("Black")));
    }
}
