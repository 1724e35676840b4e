//! Config validation
//!
//! Rules:
//! - hotspot ids unique
//! - scene/map coordinates within [0,100]
//! - lock threshold > 0
//! - floor <= warning_below <= ceiling, floor <= initial_score <= ceiling
//! - smoothing in (0, 1]
//! - depth base/factor > 0, depth step >= 0
//! - camera ideal dimensions > 0
//! - gateway ttl and capacity > 0

use std::collections::HashSet;

use contracts::{ArBlueprint, ContractError};

/// Validate an ArBlueprint
///
/// Returns the first error encountered.
pub fn validate(blueprint: &ArBlueprint) -> Result<(), ContractError> {
    validate_hotspots(blueprint)?;
    validate_projection(blueprint)?;
    validate_lock_on(blueprint)?;
    validate_stability(blueprint)?;
    validate_camera(blueprint)?;
    validate_gateway(blueprint)?;
    Ok(())
}

fn validate_hotspots(blueprint: &ArBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, spot) in blueprint.site.hotspots.iter().enumerate() {
        if spot.id.is_empty() {
            return Err(ContractError::config_validation(
                format!("site.hotspots[{idx}].id"),
                "hotspot id cannot be empty",
            ));
        }
        if !seen.insert(spot.id.as_str()) {
            return Err(ContractError::config_validation(
                format!("site.hotspots[id={}]", spot.id),
                "duplicate hotspot id",
            ));
        }
        if !spot.scene.is_normalized() {
            return Err(ContractError::config_validation(
                format!("site.hotspots[{}].scene", spot.id),
                format!(
                    "scene position ({}, {}) must lie within [0,100]",
                    spot.scene.x, spot.scene.y
                ),
            ));
        }
        if !spot.map.is_normalized() {
            return Err(ContractError::config_validation(
                format!("site.hotspots[{}].map", spot.id),
                format!(
                    "map position ({}, {}) must lie within [0,100]",
                    spot.map.x, spot.map.y
                ),
            ));
        }
    }
    Ok(())
}

fn validate_projection(blueprint: &ArBlueprint) -> Result<(), ContractError> {
    let projection = &blueprint.tracker.projection;
    if projection.depth_base <= 0.0 {
        return Err(ContractError::config_validation(
            "tracker.projection.depth_base",
            format!("depth_base must be > 0, got {}", projection.depth_base),
        ));
    }
    if projection.depth_factor <= 0.0 {
        return Err(ContractError::config_validation(
            "tracker.projection.depth_factor",
            format!("depth_factor must be > 0, got {}", projection.depth_factor),
        ));
    }
    if projection.depth_step < 0.0 {
        return Err(ContractError::config_validation(
            "tracker.projection.depth_step",
            format!("depth_step must be >= 0, got {}", projection.depth_step),
        ));
    }
    Ok(())
}

fn validate_lock_on(blueprint: &ArBlueprint) -> Result<(), ContractError> {
    let lock_on = &blueprint.tracker.lock_on;
    if lock_on.threshold <= 0.0 {
        return Err(ContractError::config_validation(
            "tracker.lock_on.threshold",
            format!("threshold must be > 0, got {}", lock_on.threshold),
        ));
    }
    if !lock_on.center().is_normalized() {
        return Err(ContractError::config_validation(
            "tracker.lock_on.center_x / center_y",
            "lock-on center must lie within [0,100]",
        ));
    }
    Ok(())
}

fn validate_stability(blueprint: &ArBlueprint) -> Result<(), ContractError> {
    let s = &blueprint.tracker.stability;
    if s.floor > s.ceiling {
        return Err(ContractError::config_validation(
            "tracker.stability.floor / tracker.stability.ceiling",
            format!("floor ({}) must be <= ceiling ({})", s.floor, s.ceiling),
        ));
    }
    if s.warning_below < s.floor || s.warning_below > s.ceiling {
        return Err(ContractError::config_validation(
            "tracker.stability.warning_below",
            format!(
                "warning_below ({}) must lie within [{}, {}]",
                s.warning_below, s.floor, s.ceiling
            ),
        ));
    }
    if s.initial_score < s.floor || s.initial_score > s.ceiling {
        return Err(ContractError::config_validation(
            "tracker.stability.initial_score",
            format!(
                "initial_score ({}) must lie within [{}, {}]",
                s.initial_score, s.floor, s.ceiling
            ),
        ));
    }
    if !(s.smoothing > 0.0 && s.smoothing <= 1.0) {
        return Err(ContractError::config_validation(
            "tracker.stability.smoothing",
            format!("smoothing must be in (0, 1], got {}", s.smoothing),
        ));
    }
    Ok(())
}

fn validate_camera(blueprint: &ArBlueprint) -> Result<(), ContractError> {
    let camera = &blueprint.camera;
    if camera.ideal_width == 0 || camera.ideal_height == 0 {
        return Err(ContractError::config_validation(
            "camera.ideal_width / camera.ideal_height",
            format!(
                "ideal resolution must be non-zero, got {}x{}",
                camera.ideal_width, camera.ideal_height
            ),
        ));
    }
    Ok(())
}

fn validate_gateway(blueprint: &ArBlueprint) -> Result<(), ContractError> {
    let gateway = &blueprint.gateway;
    if gateway.ttl_secs == 0 {
        return Err(ContractError::config_validation(
            "gateway.ttl_secs",
            "ttl_secs must be > 0",
        ));
    }
    if gateway.max_entries == 0 {
        return Err(ContractError::config_validation(
            "gateway.max_entries",
            "max_entries must be > 0",
        ));
    }
    if gateway.model.is_empty() {
        return Err(ContractError::config_validation(
            "gateway.model",
            "model cannot be empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{HotspotDefinition, IconKind, NormalizedPoint};

    fn hotspot(id: &str, x: f64, y: f64) -> HotspotDefinition {
        HotspotDefinition {
            id: id.into(),
            label: id.to_uppercase(),
            category: "Exhibit".into(),
            description: String::new(),
            scene: NormalizedPoint::new(x, y),
            map: NormalizedPoint::new(x, y),
            distance: "10m".into(),
            rating: 4.0,
            reviews: 1,
            price: 0.0,
            icon: IconKind::Info,
        }
    }

    fn minimal_blueprint() -> ArBlueprint {
        let mut bp = ArBlueprint::default();
        bp.site.hotspots = vec![hotspot("a", 50.0, 50.0), hotspot("b", 10.0, 90.0)];
        bp
    }

    fn error_of(bp: &ArBlueprint) -> String {
        validate(bp).unwrap_err().to_string()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_blueprint()).is_ok());
        assert!(validate(&ArBlueprint::default()).is_ok());
    }

    #[test]
    fn test_duplicate_hotspot_id() {
        let mut bp = minimal_blueprint();
        bp.site.hotspots.push(hotspot("a", 20.0, 20.0));
        let err = error_of(&bp);
        assert!(err.contains("duplicate hotspot id"), "got: {err}");
    }

    #[test]
    fn test_scene_out_of_range() {
        let mut bp = minimal_blueprint();
        bp.site.hotspots[1].scene.x = 140.0;
        let err = error_of(&bp);
        assert!(err.contains("site.hotspots[b].scene"), "got: {err}");
    }

    #[test]
    fn test_non_positive_threshold() {
        let mut bp = minimal_blueprint();
        bp.tracker.lock_on.threshold = 0.0;
        let err = error_of(&bp);
        assert!(err.contains("threshold must be > 0"), "got: {err}");
    }

    #[test]
    fn test_warning_outside_bounds() {
        let mut bp = minimal_blueprint();
        bp.tracker.stability.warning_below = 10;
        let err = error_of(&bp);
        assert!(err.contains("warning_below"), "got: {err}");
    }

    #[test]
    fn test_smoothing_range() {
        let mut bp = minimal_blueprint();
        bp.tracker.stability.smoothing = 0.0;
        let err = error_of(&bp);
        assert!(err.contains("smoothing"), "got: {err}");
    }

    #[test]
    fn test_zero_depth_factor() {
        let mut bp = minimal_blueprint();
        bp.tracker.projection.depth_factor = 0.0;
        let err = error_of(&bp);
        assert!(err.contains("depth_factor"), "got: {err}");
    }

    #[test]
    fn test_zero_resolution() {
        let mut bp = minimal_blueprint();
        bp.camera.ideal_width = 0;
        let err = error_of(&bp);
        assert!(err.contains("non-zero"), "got: {err}");
    }

    #[test]
    fn test_zero_ttl() {
        let mut bp = minimal_blueprint();
        bp.gateway.ttl_secs = 0;
        let err = error_of(&bp);
        assert!(err.contains("ttl_secs"), "got: {err}");
    }
}
