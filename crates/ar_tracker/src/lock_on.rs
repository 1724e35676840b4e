//! Lock-on selection
//!
//! The hotspot whose nominal scene position is closest to the lock center
//! is locked, provided its distance is strictly below the threshold. Ties
//! keep the earliest catalog entry. Projection sway is deliberately not
//! taken into account.

use contracts::{HotspotDefinition, LockOnConfig};
use serde::Serialize;
use tracing::debug;

/// Lock-on state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "index")]
pub enum LockState {
    #[default]
    NoLock,
    Locked(usize),
}

impl LockState {
    pub fn index(&self) -> Option<usize> {
        match self {
            LockState::NoLock => None,
            LockState::Locked(i) => Some(*i),
        }
    }
}

impl From<Option<usize>> for LockState {
    fn from(index: Option<usize>) -> Self {
        index.map_or(LockState::NoLock, LockState::Locked)
    }
}

/// Emitted only when the locked hotspot changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTransition {
    pub from: LockState,
    pub to: LockState,
}

/// Index of the hotspot to lock, if any
pub fn nearest_within(catalog: &[HotspotDefinition], config: &LockOnConfig) -> Option<usize> {
    let center = config.center();
    let mut best: Option<(usize, f64)> = None;

    for (index, spot) in catalog.iter().enumerate() {
        let distance = spot.scene.distance_to(center);
        if distance >= config.threshold {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

#[derive(Debug, Clone)]
pub struct LockOnMachine {
    config: LockOnConfig,
    state: LockState,
}

impl LockOnMachine {
    pub fn new(config: LockOnConfig) -> Self {
        Self {
            config,
            state: LockState::NoLock,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn locked(&self) -> Option<usize> {
        self.state.index()
    }

    /// Recompute the lock for `catalog`
    pub fn evaluate(&mut self, catalog: &[HotspotDefinition]) -> Option<LockTransition> {
        let next = LockState::from(nearest_within(catalog, &self.config));
        self.transition_to(next)
    }

    /// Drop any lock
    pub fn clear(&mut self) -> Option<LockTransition> {
        self.transition_to(LockState::NoLock)
    }

    fn transition_to(&mut self, next: LockState) -> Option<LockTransition> {
        if next == self.state {
            return None;
        }
        let transition = LockTransition {
            from: self.state,
            to: next,
        };
        debug!(from = ?transition.from, to = ?transition.to, "lock-on changed");
        self.state = next;
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{IconKind, NormalizedPoint};

    fn spot(id: &str, x: f64, y: f64) -> HotspotDefinition {
        HotspotDefinition {
            id: id.into(),
            label: id.to_string(),
            category: "Test".to_string(),
            description: String::new(),
            scene: NormalizedPoint::new(x, y),
            map: NormalizedPoint::new(x, y),
            distance: "0m".to_string(),
            rating: 0.0,
            reviews: 0,
            price: 0.0,
            icon: IconKind::Pin,
        }
    }

    #[test]
    fn test_nearest_within_threshold() {
        // distances 5, 12 and 20 from the center
        let catalog = vec![spot("a", 55.0, 50.0), spot("b", 50.0, 62.0), spot("c", 30.0, 50.0)];
        assert_eq!(nearest_within(&catalog, &LockOnConfig::default()), Some(0));

        let reordered = vec![catalog[2].clone(), catalog[1].clone(), catalog[0].clone()];
        assert_eq!(nearest_within(&reordered, &LockOnConfig::default()), Some(2));
    }

    #[test]
    fn test_nothing_within_threshold() {
        let catalog = vec![spot("far", 30.0, 50.0), spot("farther", 0.0, 0.0)];
        assert_eq!(nearest_within(&catalog, &LockOnConfig::default()), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let catalog = vec![spot("edge", 65.0, 50.0)];
        assert_eq!(nearest_within(&catalog, &LockOnConfig::default()), None);
    }

    #[test]
    fn test_tie_keeps_first() {
        let catalog = vec![spot("left", 45.0, 50.0), spot("right", 55.0, 50.0)];
        assert_eq!(nearest_within(&catalog, &LockOnConfig::default()), Some(0));
    }

    #[test]
    fn test_transition_only_on_change() {
        let mut machine = LockOnMachine::new(LockOnConfig::default());
        let catalog = vec![spot("a", 52.0, 50.0)];

        let t = machine.evaluate(&catalog).unwrap();
        assert_eq!(t.from, LockState::NoLock);
        assert_eq!(t.to, LockState::Locked(0));
        assert!(machine.evaluate(&catalog).is_none());

        assert!(machine.clear().is_some());
        assert!(machine.clear().is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let mut machine = LockOnMachine::new(LockOnConfig::default());
        assert!(machine.evaluate(&[]).is_none());
        assert_eq!(machine.locked(), None);
    }
}
