use crate::error::AnnotateError;
use crate::news::catalog::Catalog;
use crate::news::config::DESCRIPTION_CHAR_LIMIT;
use crate::news::record::UserId;
use crate::news::util::truncate_chars;
use sha2::{Digest, Sha256};

/// Hash key used when a record carries no identifier.
pub const MISSING_ID_SENTINEL: &str = "0";

/// Produces the description appended to a user's news.
pub trait MessageSource {
    fn describe(&self, id: Option<&UserId>, name: &str) -> Result<String, AnnotateError>;
}

/// SHA-256 of `key`, read as a big-endian unsigned integer, reduced mod `modulus`.
pub fn digest_index(key: &str, modulus: usize) -> Option<usize> {
    if modulus == 0 {
        return None;
    }
    let digest = Sha256::digest(key.as_bytes());
    let m = modulus as u128;
    let rem = digest
        .iter()
        .fold(0u128, |acc, byte| (acc * 256 + u128::from(*byte)) % m);
    usize::try_from(rem).ok()
}

pub fn hash_key(id: Option<&UserId>) -> String {
    id.map(UserId::canonical)
        .unwrap_or_else(|| MISSING_ID_SENTINEL.to_string())
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogSelector {
    catalog: Catalog,
    max_chars: usize,
}

impl Default for CatalogSelector {
    fn default() -> Self {
        Self::new(Catalog::default(), DESCRIPTION_CHAR_LIMIT)
    }
}

impl CatalogSelector {
    pub fn new(catalog: Catalog, max_chars: usize) -> Self {
        Self {
            catalog,
            max_chars: max_chars.min(DESCRIPTION_CHAR_LIMIT),
        }
    }

    pub fn index_for(&self, id: Option<&UserId>) -> Option<usize> {
        digest_index(&hash_key(id), self.catalog.len())
    }
}

impl MessageSource for CatalogSelector {
    fn describe(&self, id: Option<&UserId>, name: &str) -> Result<String, AnnotateError> {
        let index = self
            .index_for(id)
            .ok_or_else(|| AnnotateError::Selection("message catalog is empty".to_string()))?;
        let text = self.catalog.template(index, name).ok_or_else(|| {
            AnnotateError::Selection(format!("catalog index {index} out of range"))
        })?;
        Ok(truncate_chars(&text, self.max_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_index_is_pinned() {
        assert_eq!(digest_index("0", 8), Some(1));
        assert_eq!(digest_index("1", 8), Some(3));
        assert_eq!(digest_index("2", 8), Some(5));
        assert_eq!(digest_index("42", 8), Some(1));
        assert_eq!(digest_index("abc", 8), Some(5));
        // Non power-of-two moduli exercise the full fold.
        assert_eq!(digest_index("0", 7), Some(2));
        assert_eq!(digest_index("42", 7), Some(4));
        assert_eq!(digest_index("abc", 0), None);
    }

    #[test]
    fn missing_id_hashes_like_sentinel() {
        let selector = CatalogSelector::default();
        assert_eq!(
            selector.index_for(None),
            selector.index_for(Some(&UserId::Int(0)))
        );
        let text = selector.describe(None, "Nobody").expect("describe");
        assert_eq!(text, "Nobody, your financial future starts now. Invest!");
    }

    #[test]
    fn describe_is_deterministic() {
        let selector = CatalogSelector::default();
        let id = UserId::Int(1);
        let first = selector.describe(Some(&id), "User_1").expect("describe");
        for _ in 0..5 {
            assert_eq!(selector.describe(Some(&id), "User_1").expect("again"), first);
        }
        assert_eq!(first, "User_1, the journey to your financial freedom starts here.");
    }

    #[test]
    fn integer_and_text_ids_with_same_digits_select_the_same_template() {
        let selector = CatalogSelector::default();
        assert_eq!(
            selector.index_for(Some(&UserId::Int(42))),
            selector.index_for(Some(&UserId::Text("42".to_string())))
        );
    }

    #[test]
    fn long_names_are_hard_cut_at_the_limit() {
        let selector = CatalogSelector::default();
        let name = "N".repeat(250);
        for id in 0..32 {
            let text = selector
                .describe(Some(&UserId::Int(id)), &name)
                .expect("describe");
            assert!(text.chars().count() <= DESCRIPTION_CHAR_LIMIT);
            assert!(!text.ends_with('…'));
        }
    }

    #[test]
    fn lower_configured_limit_is_honoured() {
        let selector = CatalogSelector::new(Catalog::default(), 10);
        let text = selector
            .describe(Some(&UserId::Int(1)), "Alice")
            .expect("describe");
        assert_eq!(text, "Alice, the");
    }
}
