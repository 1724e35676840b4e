//! Hotspot catalog types
//!
//! A hotspot is a point of interest overlaid on the AR view. The catalog is
//! supplied by the hosting screen (the `Site` the visitor opened) and is
//! immutable for the lifetime of a session.

use serde::{Deserialize, Serialize};

use crate::HotspotId;

/// Icon category of a hotspot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    Landmark,
    History,
    Nature,
    Wildlife,
    Info,
    Sparkles,
    /// Generic map pin for unknown categories
    #[default]
    #[serde(other)]
    Pin,
}

impl IconKind {
    /// Short glyph name used by text renderers
    pub fn glyph(&self) -> &'static str {
        match self {
            IconKind::Landmark => "landmark",
            IconKind::History => "history",
            IconKind::Nature => "mountain",
            IconKind::Wildlife => "paw-print",
            IconKind::Info => "info",
            IconKind::Sparkles => "sparkles",
            IconKind::Pin => "map-pin",
        }
    }
}

/// Point in the normalized [0,100] x [0,100] plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub const CENTER: NormalizedPoint = NormalizedPoint { x: 50.0, y: 50.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in normalized units
    pub fn distance_to(&self, other: NormalizedPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Whether both coordinates lie within [0,100]
    pub fn is_normalized(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }
}

/// Static definition of one hotspot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotDefinition {
    /// Unique identifier within the catalog
    pub id: HotspotId,

    pub label: String,

    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Angular offset from the reference heading, normalized to [0,100]
    pub scene: NormalizedPoint,

    /// Position on the 2D site map, normalized to [0,100]
    pub map: NormalizedPoint,

    /// Human-readable distance label (e.g. "120m")
    #[serde(default = "default_distance")]
    pub distance: String,

    pub rating: f64,

    pub reviews: u32,

    /// Entry price; 0 means free
    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub icon: IconKind,
}

fn default_distance() -> String {
    "0m".to_string()
}

/// The entity (attraction) hosting the AR view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub reviews: u32,

    #[serde(default)]
    pub price: f64,

    /// Hotspots shown in the AR view; may be empty
    #[serde(default)]
    pub hotspots: Vec<HotspotDefinition>,
}

impl Site {
    /// Catalog the AR view operates on.
    ///
    /// Never empty: a site without hotspots yields a single synthesized
    /// hotspot centred in the scene that describes the site itself.
    pub fn catalog(&self) -> Vec<HotspotDefinition> {
        if self.hotspots.is_empty() {
            vec![self.fallback_hotspot()]
        } else {
            self.hotspots.clone()
        }
    }

    /// Hotspot representing the site itself
    pub fn fallback_hotspot(&self) -> HotspotDefinition {
        HotspotDefinition {
            id: HotspotId::new(HotspotId::FALLBACK),
            label: self.name.clone(),
            category: "SITE".to_string(),
            description: self.description.clone(),
            scene: NormalizedPoint::CENTER,
            map: NormalizedPoint::CENTER,
            distance: default_distance(),
            rating: self.rating,
            reviews: self.reviews,
            price: self.price,
            icon: IconKind::Landmark,
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            name: "Sabah Museum".to_string(),
            category: "History & Culture".to_string(),
            location: "Kota Kinabalu".to_string(),
            description: "The Sabah State Museum sits on 17 hectares of land at Bukit Istana Lama in Kota Kinabalu.".to_string(),
            rating: 4.5,
            reviews: 215,
            price: 15.0,
            hotspots: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_a() -> Site {
        Site {
            id: "x".to_string(),
            name: "Site A".to_string(),
            category: String::new(),
            location: String::new(),
            description: "d".to_string(),
            rating: 4.5,
            reviews: 10,
            price: 20.0,
            hotspots: Vec::new(),
        }
    }

    #[test]
    fn test_empty_catalog_synthesizes_fallback() {
        let catalog = site_a().catalog();
        assert_eq!(catalog.len(), 1);

        let spot = &catalog[0];
        assert_eq!(spot.id, "fallback");
        assert_eq!(spot.scene, NormalizedPoint::new(50.0, 50.0));
        assert_eq!(spot.label, "Site A");
        assert_eq!(spot.description, "d");
        assert_eq!(spot.rating, 4.5);
        assert_eq!(spot.reviews, 10);
        assert_eq!(spot.price, 20.0);
        assert_eq!(spot.icon, IconKind::Landmark);
    }

    #[test]
    fn test_non_empty_catalog_is_kept_in_order() {
        let mut site = site_a();
        let mut first = site.fallback_hotspot();
        first.id = "a".into();
        let mut second = site.fallback_hotspot();
        second.id = "b".into();
        site.hotspots = vec![first, second];

        let ids: Vec<_> = site.catalog().iter().map(|h| h.id.to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_icon_maps_to_pin() {
        let icon: IconKind = serde_json::from_str("\"volcano\"").unwrap();
        assert_eq!(icon, IconKind::Pin);
        let icon: IconKind = serde_json::from_str("\"wildlife\"").unwrap();
        assert_eq!(icon, IconKind::Wildlife);
    }

    #[test]
    fn test_distance() {
        let d = NormalizedPoint::new(53.0, 54.0).distance_to(NormalizedPoint::CENTER);
        assert!((d - 5.0).abs() < 1e-12);
    }
}
