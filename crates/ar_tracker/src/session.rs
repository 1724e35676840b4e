//! AR session
//!
//! Single-threaded, event-driven owner of one AR view:
//! - orientation sampler and stability score
//! - lock-on machine (evaluated after the scan phase)
//! - tap-driven active selection, navigation target and map overlay
//! - camera capture
//!
//! Every update is an explicit method call; `snapshot()` renders the
//! current state into an immutable [`HudSnapshot`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::{
    CameraDevice, Clock, HotspotDefinition, HotspotId, OrientationCallback, OrientationSample,
    OrientationSource, PermissionDecision, PermissionGate, Site, TrackerConfig,
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::capture::{CameraStatus, CaptureManager, CaptureState};
use crate::lock_on::{LockOnMachine, LockTransition};
use crate::projector;
use crate::sampler::{OrientationSampler, SamplerState};
use crate::snapshot::{HotspotView, HudSnapshot, MapView};
use crate::stability::StabilityReading;

/// 会话挂载标志，teardown 时清除
///
/// 代表会话发起的异步任务（内容请求）在应用结果前检查该标志。
#[derive(Debug, Clone)]
pub struct MountGuard(Arc<AtomicBool>);

impl MountGuard {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle for one briefing request
///
/// A result is only applied if the session is still mounted and the same
/// hotspot detail is still open.
#[derive(Debug, Clone)]
pub struct ContentTicket {
    pub site: String,
    pub hotspot: HotspotDefinition,
    index: usize,
    generation: u64,
    guard: MountGuard,
}

/// 单个姿态样本的处理结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationUpdate {
    pub reading: StabilityReading,
    pub lock: Option<LockTransition>,
}

#[derive(Debug, Default)]
struct MapOverlay {
    open: bool,
    selected: Option<usize>,
}

pub struct ArSession<D> {
    config: TrackerConfig,
    site_name: String,
    catalog: Vec<HotspotDefinition>,
    clock: Arc<dyn Clock>,
    sampler: OrientationSampler,
    samples: mpsc::UnboundedReceiver<OrientationSample>,
    lock_on: LockOnMachine,
    capture: CaptureManager<D>,
    scan_started_at: i64,
    scanning: bool,
    active: Option<usize>,
    navigation: Option<usize>,
    map: MapOverlay,
    flash_until: Option<i64>,
    briefing: Option<String>,
    content_generation: u64,
    guard: MountGuard,
}

impl<D: CameraDevice> ArSession<D> {
    /// Open the camera (or retry after denial)
    pub async fn start_camera(&mut self) -> CameraStatus {
        CameraStatus::from(self.capture.acquire().await)
    }

    /// Ask `gate` for sensor access and start sampling accordingly
    #[instrument(name = "session_negotiate_sensors", skip(self, gate))]
    pub async fn negotiate_sensors<G: PermissionGate>(&mut self, gate: &G) -> SamplerState {
        if !gate.requires_consent() {
            return self.start_sensors(false);
        }

        self.start_sensors(true);
        let decision = gate.request().await;
        self.resolve_sensor_permission(decision)
    }
}

impl<D> ArSession<D> {
    /// Mount a session for `site`; the scan phase starts now
    pub fn new(
        config: TrackerConfig,
        site: &Site,
        source: Arc<dyn OrientationSource>,
        camera: D,
        constraints: contracts::CaptureConstraints,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (tx, samples) = mpsc::unbounded_channel();
        let sink: OrientationCallback = Arc::new(move |sample| {
            // receiver gone means the session is being dropped
            let _ = tx.send(sample);
        });

        let catalog = site.catalog();
        let now = clock.now_millis();
        info!(
            site = %site.name,
            hotspots = catalog.len(),
            source = source.name(),
            "AR session mounted"
        );

        Self {
            sampler: OrientationSampler::new(source, config.stability.clone(), sink),
            lock_on: LockOnMachine::new(config.lock_on.clone()),
            capture: CaptureManager::new(camera, constraints),
            config,
            site_name: site.name.clone(),
            catalog,
            clock,
            samples,
            scan_started_at: now,
            scanning: true,
            active: None,
            navigation: None,
            map: MapOverlay::default(),
            flash_until: None,
            briefing: None,
            content_generation: 0,
            guard: MountGuard::new(),
        }
    }

    pub fn catalog(&self) -> &[HotspotDefinition] {
        &self.catalog
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn mount_guard(&self) -> MountGuard {
        self.guard.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.guard.is_mounted()
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn sensor_state(&self) -> SamplerState {
        self.sampler.state()
    }

    pub fn capture_state(&self) -> &CaptureState {
        self.capture.state()
    }

    pub fn camera(&self) -> &D {
        self.capture.device()
    }

    pub fn locked(&self) -> Option<usize> {
        self.lock_on.locked()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn navigation(&self) -> Option<usize> {
        self.navigation
    }

    /// Start sensing; with `requires_consent` the sampler waits for
    /// `resolve_sensor_permission`
    pub fn start_sensors(&mut self, requires_consent: bool) -> SamplerState {
        if !self.is_mounted() {
            return self.sampler.state();
        }
        self.sampler.begin(requires_consent)
    }

    pub fn resolve_sensor_permission(&mut self, decision: PermissionDecision) -> SamplerState {
        self.sampler.resolve_permission(decision)
    }

    /// Advance time-based state: end of scan phase, capture flash, stream loss
    pub fn tick(&mut self) -> Option<LockTransition> {
        let now = self.clock.now_millis();

        if self.flash_until.is_some_and(|until| now >= until) {
            self.flash_until = None;
        }
        if self.capture.has_stream() {
            self.capture.check_stream();
        }

        if self.scanning && now - self.scan_started_at >= self.config.scan.duration_ms as i64 {
            self.scanning = false;
            info!(elapsed_ms = now - self.scan_started_at, "scan phase complete");
            return self.evaluate_lock();
        }
        None
    }

    /// Feed one orientation sample
    ///
    /// Returns `None` when the sampler is not active.
    pub fn on_orientation(&mut self, sample: OrientationSample) -> Option<OrientationUpdate> {
        if self.sampler.state() != SamplerState::Active {
            return None;
        }
        let scan_transition = self.tick();
        let reading = self.sampler.ingest(sample)?;

        let lock = if self.scanning {
            None
        } else {
            scan_transition.or_else(|| self.evaluate_lock())
        };
        Some(OrientationUpdate { reading, lock })
    }

    /// Process every sample delivered by the source so far, in order
    pub fn pump(&mut self) -> Vec<OrientationUpdate> {
        let mut updates = Vec::new();
        while let Ok(sample) = self.samples.try_recv() {
            if let Some(update) = self.on_orientation(sample) {
                updates.push(update);
            }
        }
        updates
    }

    /// Wait for the next sample from the source and process it
    ///
    /// Samples rejected by an inactive sampler are skipped. Returns `None`
    /// once the source queue is closed.
    pub async fn next_update(&mut self) -> Option<OrientationUpdate> {
        while let Some(sample) = self.samples.recv().await {
            if let Some(update) = self.on_orientation(sample) {
                return Some(update);
            }
        }
        None
    }

    /// Tap on a hotspot: toggles its detail overlay
    pub fn tap(&mut self, index: usize) -> bool {
        let accepted = self.interactive() && index < self.catalog.len();
        observability::record_interaction("tap", accepted);
        if !accepted {
            debug!(index, scanning = self.scanning, "tap ignored");
            return false;
        }

        let next = if self.active == Some(index) {
            None
        } else {
            Some(index)
        };
        self.set_active(next);
        true
    }

    /// Close the detail overlay
    pub fn dismiss(&mut self) -> bool {
        let accepted = self.active.is_some();
        observability::record_interaction("dismiss", accepted);
        if accepted {
            self.set_active(None);
        }
        accepted
    }

    /// Navigate to the active hotspot and close its detail overlay
    pub fn route_to_active(&mut self) -> Option<HotspotId> {
        let target = self.active;
        observability::record_interaction("route", target.is_some());
        let index = target?;

        self.navigation = Some(index);
        self.set_active(None);
        let id = self.catalog[index].id.clone();
        info!(hotspot = %id, "navigation target set");
        Some(id)
    }

    pub fn clear_navigation(&mut self) {
        self.navigation = None;
    }

    /// Show or hide the map overlay
    pub fn toggle_map(&mut self) -> bool {
        let accepted = self.interactive();
        observability::record_interaction("map_toggle", accepted);
        if accepted {
            self.map.open = !self.map.open;
            if !self.map.open {
                self.map.selected = None;
            }
        }
        accepted
    }

    /// Tap on a map marker: toggles the map selection
    pub fn select_map_marker(&mut self, index: usize) -> bool {
        let accepted = self.interactive() && self.map.open && index < self.catalog.len();
        observability::record_interaction("map_select", accepted);
        if accepted {
            self.map.selected = if self.map.selected == Some(index) {
                None
            } else {
                Some(index)
            };
        }
        accepted
    }

    /// Open the detail overlay of the map selection and close the map
    pub fn open_map_selection(&mut self) -> bool {
        let selected = self.map_selection();
        observability::record_interaction("map_open_detail", selected.is_some());
        let Some(index) = selected else {
            return false;
        };
        self.close_map();
        self.set_active(Some(index));
        true
    }

    /// Make the map selection the navigation target and close the map
    pub fn lock_map_waypoint(&mut self) -> Option<HotspotId> {
        let selected = self.map_selection();
        observability::record_interaction("map_waypoint", selected.is_some());
        let index = selected?;

        self.close_map();
        self.navigation = Some(index);
        let id = self.catalog[index].id.clone();
        info!(hotspot = %id, "waypoint locked from map");
        Some(id)
    }

    /// Trigger the capture flash
    pub fn capture_photo(&mut self) {
        let now = self.clock.now_millis();
        self.flash_until = Some(now + self.config.scan.capture_flash_ms as i64);
        observability::record_interaction("capture", true);
    }

    /// Ticket for the briefing of the active hotspot
    pub fn briefing_request(&self) -> Option<ContentTicket> {
        if !self.is_mounted() {
            return None;
        }
        let index = self.active?;
        Some(ContentTicket {
            site: self.site_name.clone(),
            hotspot: self.catalog[index].clone(),
            index,
            generation: self.content_generation,
            guard: self.guard.clone(),
        })
    }

    /// Apply a finished briefing; stale results are discarded
    pub fn apply_briefing(&mut self, ticket: &ContentTicket, text: String) -> bool {
        let current = ticket.guard.is_mounted()
            && ticket.generation == self.content_generation
            && self.active == Some(ticket.index);
        if !current {
            debug!(hotspot = %ticket.hotspot.id, "stale briefing discarded");
            return false;
        }
        self.briefing = Some(text);
        true
    }

    pub fn snapshot(&self) -> HudSnapshot {
        let now = self.clock.now_millis();
        let orientation = self.sampler.current();
        let projected = projector::project(&self.catalog, orientation, &self.config.projection);
        let locked = self.lock_on.locked();

        let hotspots = projected
            .into_iter()
            .zip(&self.catalog)
            .map(|(projection, spot)| {
                let index = projection.index;
                HotspotView {
                    id: spot.id.clone(),
                    label: spot.label.clone(),
                    icon: spot.icon,
                    locked: locked == Some(index),
                    active: self.active == Some(index),
                    dimmed: self.active.is_some_and(|a| a != index),
                    projection,
                }
            })
            .collect();

        let scan_ms = self.config.scan.duration_ms.max(1) as f64;
        let scan_progress = if self.scanning {
            ((now - self.scan_started_at) as f64 / scan_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };

        HudSnapshot {
            timestamp_ms: now,
            scanning: self.scanning,
            scan_progress,
            sensor: self.sampler.state(),
            orientation,
            stability: self.sampler.score(),
            low_stability: self.sampler.is_low_stability(),
            camera: CameraStatus::from(self.capture.state()),
            hotspots,
            locked: locked.map(|i| self.catalog[i].id.clone()),
            active: self.active.map(|i| self.catalog[i].id.clone()),
            navigation: self.navigation.map(|i| self.catalog[i].id.clone()),
            map: MapView {
                open: self.map.open,
                selected: self.map.selected.map(|i| self.catalog[i].id.clone()),
            },
            briefing: self.briefing.clone(),
            flash: self.flash_until.is_some_and(|until| now < until),
        }
    }

    /// Release sensor subscription and camera. Idempotent.
    #[instrument(name = "session_teardown", skip(self), fields(site = %self.site_name))]
    pub fn teardown(&mut self) {
        let was_mounted = self.guard.is_mounted();
        self.guard.unmount();
        self.sampler.teardown();
        self.capture.release();
        self.content_generation += 1;
        self.briefing = None;
        if was_mounted {
            info!("AR session torn down");
        }
    }

    fn interactive(&self) -> bool {
        self.is_mounted() && !self.scanning
    }

    fn evaluate_lock(&mut self) -> Option<LockTransition> {
        let transition = self.lock_on.evaluate(&self.catalog)?;
        let id = transition.to.index().map(|i| self.catalog[i].id.as_str());
        observability::record_lock_transition(id);
        Some(transition)
    }

    fn set_active(&mut self, next: Option<usize>) {
        if self.active != next {
            self.active = next;
            self.briefing = None;
            self.content_generation += 1;
        }
    }

    fn map_selection(&self) -> Option<usize> {
        if !self.interactive() || !self.map.open {
            return None;
        }
        self.map.selected
    }

    fn close_map(&mut self) {
        self.map.open = false;
        self.map.selected = None;
    }
}

impl<D> Drop for ArSession<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{CaptureConstraints, IconKind, ManualClock, NormalizedPoint};
    use device::{ConsentPermission, ManualSource, MockCamera};
    use std::time::Duration;

    fn spot(id: &str, x: f64, y: f64) -> HotspotDefinition {
        HotspotDefinition {
            id: id.into(),
            label: id.to_uppercase(),
            category: "Exhibit".to_string(),
            description: String::new(),
            scene: NormalizedPoint::new(x, y),
            map: NormalizedPoint::new(100.0 - x, y),
            distance: "50m".to_string(),
            rating: 4.0,
            reviews: 3,
            price: 0.0,
            icon: IconKind::Info,
        }
    }

    fn site() -> Site {
        Site {
            hotspots: vec![spot("center", 50.0, 50.0), spot("nw", 10.0, 10.0), spot("se", 90.0, 90.0)],
            ..Site::default()
        }
    }

    struct Harness {
        session: ArSession<MockCamera>,
        source: Arc<ManualSource>,
        camera: MockCamera,
        clock: Arc<ManualClock>,
    }

    fn harness(site: &Site) -> Harness {
        let source = Arc::new(ManualSource::new("manual"));
        let camera = MockCamera::new();
        let clock = Arc::new(ManualClock::new(10_000));
        let session = ArSession::new(
            TrackerConfig::default(),
            site,
            source.clone(),
            camera.clone(),
            CaptureConstraints::default(),
            clock.clone(),
        );
        Harness {
            session,
            source,
            camera,
            clock,
        }
    }

    fn still() -> OrientationSample {
        OrientationSample::new(0.0, 45.0, 0.0)
    }

    fn finish_scan(h: &mut Harness) {
        h.clock.advance(Duration::from_millis(3_500));
        h.session.tick();
    }

    #[test]
    fn test_no_lock_during_scan() {
        let mut h = harness(&site());
        h.session.start_sensors(false);

        let update = h.session.on_orientation(still()).unwrap();
        assert!(update.lock.is_none());
        assert_eq!(h.session.locked(), None);
        assert!(h.session.snapshot().scanning);
    }

    #[test]
    fn test_lock_after_scan() {
        let mut h = harness(&site());
        h.session.start_sensors(false);
        h.session.on_orientation(still());

        h.clock.advance(Duration::from_millis(3_499));
        assert!(h.session.tick().is_none());
        h.clock.advance(Duration::from_millis(1));
        let transition = h.session.tick().unwrap();
        assert_eq!(transition.to.index(), Some(0));

        // later samples do not re-announce the same lock
        let update = h.session.on_orientation(still()).unwrap();
        assert!(update.lock.is_none());
        assert_eq!(h.session.locked(), Some(0));
    }

    #[test]
    fn test_taps_ignored_while_scanning() {
        let mut h = harness(&site());
        assert!(!h.session.tap(1));
        assert!(!h.session.toggle_map());
        assert_eq!(h.session.active(), None);
    }

    #[test]
    fn test_tap_toggles_active_without_touching_lock() {
        let mut h = harness(&site());
        h.session.start_sensors(false);
        finish_scan(&mut h);
        h.session.on_orientation(still());
        assert_eq!(h.session.locked(), Some(0));

        assert!(h.session.tap(2));
        assert_eq!(h.session.active(), Some(2));
        assert_eq!(h.session.locked(), Some(0));

        assert!(h.session.tap(2));
        assert_eq!(h.session.active(), None);

        assert!(!h.session.tap(7));
    }

    #[test]
    fn test_lock_ignores_projection_sway() {
        let mut h = harness(&site());
        h.session.start_sensors(false);
        finish_scan(&mut h);

        // strong tilt moves every projected hotspot far off center
        h.session.on_orientation(OrientationSample::new(0.0, 90.0, 60.0));
        let snap = h.session.snapshot();
        let center = snap.hotspot("center").unwrap();
        assert!(center.projection.shift_x_px.abs() > 100.0);
        assert_eq!(snap.locked.as_deref(), Some("center"));
    }

    #[test]
    fn test_dimming_while_detail_open() {
        let mut h = harness(&site());
        finish_scan(&mut h);
        h.session.tap(1);

        let snap = h.session.snapshot();
        assert!(snap.detail_open());
        assert!(!snap.hotspot("nw").unwrap().dimmed);
        assert!(snap.hotspot("nw").unwrap().active);
        assert!(snap.hotspot("center").unwrap().dimmed);

        h.session.dismiss();
        assert!(h.session.snapshot().hotspots.iter().all(|v| !v.dimmed));
    }

    #[test]
    fn test_route_sets_navigation_and_closes_detail() {
        let mut h = harness(&site());
        finish_scan(&mut h);
        assert!(h.session.route_to_active().is_none());

        h.session.tap(2);
        assert_eq!(h.session.route_to_active().as_deref(), Some("se"));
        assert_eq!(h.session.active(), None);
        assert_eq!(h.session.snapshot().navigation.as_deref(), Some("se"));
    }

    #[test]
    fn test_map_flow() {
        let mut h = harness(&site());
        finish_scan(&mut h);

        assert!(!h.session.select_map_marker(1));
        assert!(h.session.toggle_map());
        assert!(h.session.select_map_marker(1));
        assert_eq!(h.session.snapshot().map.selected.as_deref(), Some("nw"));

        assert!(h.session.open_map_selection());
        assert_eq!(h.session.active(), Some(1));
        assert!(!h.session.snapshot().map.open);

        h.session.toggle_map();
        h.session.select_map_marker(2);
        assert_eq!(h.session.lock_map_waypoint().as_deref(), Some("se"));
        assert_eq!(h.session.navigation(), Some(2));
        assert!(!h.session.snapshot().map.open);
    }

    #[test]
    fn test_map_marker_toggle() {
        let mut h = harness(&site());
        finish_scan(&mut h);
        h.session.toggle_map();
        h.session.select_map_marker(0);
        h.session.select_map_marker(0);
        assert!(h.session.snapshot().map.selected.is_none());
        assert!(!h.session.open_map_selection());
    }

    #[test]
    fn test_capture_flash_expires() {
        let mut h = harness(&site());
        h.session.capture_photo();
        assert!(h.session.snapshot().flash);

        h.clock.advance(Duration::from_millis(150));
        h.session.tick();
        assert!(!h.session.snapshot().flash);
    }

    #[test]
    fn test_static_placement_without_sensor() {
        let mut h = harness(&site());
        h.session.start_sensors(true);
        h.session.resolve_sensor_permission(PermissionDecision::Denied);

        assert!(h.session.on_orientation(still()).is_none());
        let snap = h.session.snapshot();
        assert_eq!(snap.sensor, SamplerState::Denied);
        assert!(snap.hotspots.iter().all(|v| v.projection.shift_x_px == 0.0 && v.projection.shift_y_px == 0.0));
        assert_eq!(snap.stability, 100);
    }

    #[test]
    fn test_pump_processes_source_samples_in_order() {
        let mut h = harness(&site());
        h.session.start_sensors(false);
        h.source.emit(OrientationSample::new(0.0, 45.0, 0.0));
        h.source.emit(OrientationSample::new(0.0, 45.0, 10.0));

        let updates = h.session.pump();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].reading.delta, 10.0);
        assert_eq!(h.session.snapshot().orientation.unwrap().gamma, 10.0);
    }

    #[tokio::test]
    async fn test_next_update_feeds_stability() {
        let mut h = harness(&site());
        h.session.start_sensors(false);
        h.source.emit(OrientationSample::new(0.0, 45.0, 0.0));
        h.source.emit(OrientationSample::new(0.0, 45.0, 30.0));

        let first = h.session.next_update().await.unwrap();
        assert_eq!(first.reading.delta, 0.0);

        let updates = h.session.pump();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].reading.delta, 30.0);
    }

    #[test]
    fn test_tap_locked_hotspot_keeps_lock() {
        let mut h = harness(&site());
        h.session.start_sensors(false);
        finish_scan(&mut h);
        for gamma in [0.4, -0.3, 0.1, 0.0] {
            h.source.emit(OrientationSample::new(0.0, 45.0, gamma));
        }

        let updates = h.session.pump();
        assert_eq!(updates.len(), 4);
        assert_eq!(h.session.locked(), Some(0));

        assert!(h.session.tap(0));
        assert_eq!(h.session.active(), Some(0));
        assert_eq!(h.session.locked(), Some(0));
    }

    #[test]
    fn test_fallback_catalog() {
        let h = harness(&Site::default());
        assert_eq!(h.session.catalog().len(), 1);
        assert!(h.session.catalog()[0].id.is_fallback());
    }

    #[test]
    fn test_stale_briefing_discarded() {
        let mut h = harness(&site());
        finish_scan(&mut h);
        h.session.tap(1);
        let ticket = h.session.briefing_request().unwrap();

        h.session.tap(2);
        assert!(!h.session.apply_briefing(&ticket, "late".to_string()));

        let ticket = h.session.briefing_request().unwrap();
        assert!(h.session.apply_briefing(&ticket, "fresh".to_string()));
        assert_eq!(h.session.snapshot().briefing.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_briefing_after_teardown_discarded() {
        let mut h = harness(&site());
        finish_scan(&mut h);
        h.session.tap(0);
        let ticket = h.session.briefing_request().unwrap();
        let guard = h.session.mount_guard();

        h.session.teardown();
        assert!(!guard.is_mounted());
        assert!(!h.session.apply_briefing(&ticket, "late".to_string()));
        assert!(h.session.briefing_request().is_none());
    }

    #[tokio::test]
    async fn test_teardown_releases_everything() {
        let mut h = harness(&site());
        h.session.start_sensors(false);
        h.session.start_camera().await;
        assert!(h.source.is_listening());
        assert_eq!(h.camera.live_tracks(), 1);

        h.session.teardown();
        assert!(!h.source.is_listening());
        assert_eq!(h.camera.live_tracks(), 0);

        h.session.teardown();
        assert_eq!(h.camera.stop_calls(), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_everything() {
        let h = harness(&site());
        let (mut session, source, camera) = (h.session, h.source, h.camera);
        session.start_sensors(false);
        session.start_camera().await;

        drop(session);
        assert!(!source.is_listening());
        assert_eq!(camera.live_tracks(), 0);
    }

    #[tokio::test]
    async fn test_consent_gate_denied_keeps_static_placement() {
        let mut h = harness(&site());
        let state = h.session.negotiate_sensors(&ConsentPermission::deny()).await;
        assert_eq!(state, SamplerState::Denied);
        assert!(!h.source.is_listening());
    }

    #[tokio::test]
    async fn test_camera_denied_then_retry() {
        let mut h = harness(&site());
        h.camera.fail_next(contracts::CaptureError::Busy("in use".to_string()));
        assert!(matches!(h.session.start_camera().await, CameraStatus::Denied { .. }));
        assert_eq!(h.session.start_camera().await, CameraStatus::Active);
    }
}
