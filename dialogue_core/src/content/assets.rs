//! Asset lookup seam for the presentation layer.
//!
//! The engine itself never resolves assets; it only exposes the names a
//! node or side event refers to.

use std::collections::HashMap;
use std::path::PathBuf;

/// Opaque handle to a resolved asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub PathBuf);

/// Resolves an asset by name. A missing asset is never an engine error.
pub trait AssetResolver {
    fn resolve_asset(&self, name: &str) -> Option<AssetHandle>;
}

/// Name to handle map.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: HashMap<String, AssetHandle>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(name, path);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.assets.insert(name.into(), AssetHandle(path.into()));
    }

}

impl AssetResolver for AssetCatalog {
    fn resolve_asset(&self, name: &str) -> Option<AssetHandle> {
        self.assets.get(name).cloned()
    }
}
