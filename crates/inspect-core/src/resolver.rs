//! Boundary to the external resolver for unmasked links.
//!
//! Unmasked links only reference an item; turning them into an [`Item`]
//! needs a live game-service session, which lives outside this crate. The
//! caller supplies one through the [`Resolver`] trait on every call, so
//! independent sessions can coexist and tests can swap in a fake.
//!
//! ```
//! use inspect_core::{AnalyzedUrl, InspectCodec, Item, Result};
//!
//! let resolver = |url: &AnalyzedUrl| -> Result<Item> {
//!     // A real resolver asks a game-service session about the asset here
//!     assert_eq!(url.asset_id(), Some("2"));
//!     Ok(Item::new(7, 44, 661, 0.15))
//! };
//!
//! let item = InspectCodec::new().inspect("M1A2D3", &resolver)?;
//! assert_eq!(item.defindex, 7);
//! # Ok::<(), inspect_core::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::item::Item;
use crate::url::AnalyzedUrl;
use std::collections::HashMap;

/// Resolves unmasked links into items
pub trait Resolver: Send + Sync {
    /// Resolve an analyzed unmasked link
    fn resolve(&self, url: &AnalyzedUrl) -> Result<Item>;
}

impl<F> Resolver for F
where
    F: Fn(&AnalyzedUrl) -> Result<Item> + Send + Sync,
{
    fn resolve(&self, url: &AnalyzedUrl) -> Result<Item> {
        self(url)
    }
}

/// A resolver backed by a fixed map from asset id to item
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    items: HashMap<String, Item>,
}

impl StaticResolver {
    /// Creates an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item for the given asset id
    pub fn with_item(mut self, asset_id: impl Into<String>, item: Item) -> Self {
        self.insert(asset_id, item);
        self
    }

    /// Adds or replaces an item for the given asset id
    pub fn insert(&mut self, asset_id: impl Into<String>, item: Item) {
        self.items.insert(asset_id.into(), item);
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, url: &AnalyzedUrl) -> Result<Item> {
        let asset_id = url
            .asset_id()
            .ok_or_else(|| Error::resolution("link has no asset id"))?;
        self.items
            .get(asset_id)
            .cloned()
            .ok_or_else(|| Error::resolution(format!("unknown asset {}", asset_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::url::analyze;

    #[test]
    fn test_static_resolver() {
        let resolver = StaticResolver::new().with_item("987654321", Item::new(1, 2, 3, 0.5));
        let found = analyze("M123456789A987654321D456789123", 2048).unwrap();
        assert_eq!(resolver.resolve(&found).unwrap().defindex, 1);

        let missing = analyze("S1A2D3", 2048).unwrap();
        let err = resolver.resolve(&missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(err.to_string().contains("unknown asset 2"));
    }

    #[test]
    fn test_masked_link_has_no_asset() {
        let masked = analyze("001807202C389AB3E6F003409505AD253230", 2048).unwrap();
        assert!(StaticResolver::new().resolve(&masked).is_err());
    }
}
