//! Hotspot identifier shared by the catalog, snapshots and cache keys

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Catalog id of a hotspot; clones share one allocation.
///
/// ```
/// use contracts::HotspotId;
///
/// let id: HotspotId = "museum-gallery".into();
/// assert_eq!(id, "museum-gallery");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HotspotId(Arc<str>);

impl HotspotId {
    /// Id of the hotspot synthesized for an empty catalog
    pub const FALLBACK: &'static str = "fallback";

    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_fallback(&self) -> bool {
        self.as_str() == Self::FALLBACK
    }
}

impl Deref for HotspotId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// Hash is derived from the inner `str`, so map lookups by `&str` agree.
impl Borrow<str> for HotspotId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HotspotId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HotspotId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<HotspotId> for String {
    fn from(id: HotspotId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Display for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for HotspotId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for HotspotId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
