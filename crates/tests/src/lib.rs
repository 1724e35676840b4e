//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> 会话 -> 内容网关 e2e 测试（无需真实设备与网络）

#[cfg(test)]
mod contract_tests {
    use contracts::{ArBlueprint, ConfigVersion, HotspotId};

    #[test]
    fn test_contracts_compile() {
        let blueprint = ArBlueprint::default();
        assert_eq!(blueprint.version, ConfigVersion::V1);
        assert_eq!(blueprint.site.catalog()[0].id, HotspotId::FALLBACK);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ar_tracker::{ArSession, CameraStatus, SamplerState};
    use config_loader::{ConfigFormat, ConfigLoader};
    use content_gateway::{ContentGateway, GatewayError, MockBackend};
    use contracts::{ArBlueprint, ManualClock, OrientationSample, OrientationSource};
    use device::{AmbientPermission, ManualSource, MockCamera, MockOrientationConfig, MockOrientationSource};

    const MUSEUM_TOML: &str = r#"
[tracker.scan]
duration_ms = 3500

[site]
id = "1"
name = "Sabah Museum"
location = "Kota Kinabalu"

[[site.hotspots]]
id = "nw-gallery"
label = "Ceramics Gallery"
category = "Gallery"
rating = 4.1
reviews = 12
icon = "history"
scene = { x = 10.0, y = 10.0 }
map = { x = 15.0, y = 20.0 }

[[site.hotspots]]
id = "atrium"
label = "Main Atrium"
category = "Hall"
rating = 4.6
reviews = 80
icon = "landmark"
scene = { x = 50.0, y = 50.0 }
map = { x = 50.0, y = 50.0 }

[[site.hotspots]]
id = "garden"
label = "Ethnobotanic Garden"
category = "Nature"
rating = 4.3
reviews = 41
icon = "nature"
scene = { x = 90.0, y = 90.0 }
map = { x = 85.0, y = 80.0 }
"#;

    struct Harness {
        session: ArSession<MockCamera>,
        source: Arc<ManualSource>,
        camera: MockCamera,
        clock: Arc<ManualClock>,
    }

    fn mount(blueprint: &ArBlueprint) -> Harness {
        let source = Arc::new(ManualSource::new("manual"));
        let camera = MockCamera::new();
        let clock = Arc::new(ManualClock::new(0));
        let session = ArSession::new(
            blueprint.tracker.clone(),
            &blueprint.site,
            source.clone(),
            camera.clone(),
            blueprint.camera,
            clock.clone(),
        );
        Harness {
            session,
            source,
            camera,
            clock,
        }
    }

    fn museum() -> ArBlueprint {
        ConfigLoader::load_from_str(MUSEUM_TOML, ConfigFormat::Toml).unwrap()
    }

    fn level() -> OrientationSample {
        OrientationSample::new(0.0, 45.0, 0.0)
    }

    /// Config -> session: scan, lock on the centred hotspot, tap another one
    #[tokio::test]
    async fn test_e2e_lock_and_tap() {
        let mut h = mount(&museum());
        assert_eq!(h.session.start_camera().await, CameraStatus::Active);
        assert_eq!(
            h.session.negotiate_sensors(&AmbientPermission).await,
            SamplerState::Active
        );

        // scanning: samples score but nothing locks and taps are ignored
        assert!(h.source.emit(level()));
        let updates = h.session.pump();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].lock.is_none());
        assert!(!h.session.tap(0));

        h.clock.advance(Duration::from_millis(3500));
        let transition = h.session.tick().expect("lock after scan");
        assert_eq!(transition.to.index(), Some(1));

        assert!(h.session.tap(2));
        let snapshot = h.session.snapshot();
        assert_eq!(snapshot.locked.as_deref(), Some("atrium"));
        assert_eq!(snapshot.active.as_deref(), Some("garden"));
        assert!(snapshot.hotspot("atrium").unwrap().dimmed);
        assert!(!snapshot.hotspot("garden").unwrap().dimmed);
        assert_eq!(h.camera.live_tracks(), 1);
    }

    /// Near-zero orientation stream after the scan locks the centre; tapping it keeps the lock
    #[tokio::test]
    async fn test_e2e_tap_locked_hotspot() {
        let mut h = mount(&museum());
        h.session.negotiate_sensors(&AmbientPermission).await;
        h.clock.advance(Duration::from_millis(3500));
        h.session.tick();

        for gamma in [0.2, -0.1, 0.0, 0.1, 0.0] {
            assert!(h.source.emit(OrientationSample::new(0.0, 45.0, gamma)));
        }
        let updates = h.session.pump();
        assert_eq!(updates.len(), 5);
        assert!(updates.iter().all(|u| u.reading.delta < 1.0));
        assert_eq!(h.session.locked(), Some(1));

        assert!(h.session.tap(1));
        assert_eq!(h.session.active(), Some(1));
        assert_eq!(h.session.locked(), Some(1));
        let snapshot = h.session.snapshot();
        assert_eq!(snapshot.locked.as_deref(), Some("atrium"));
        assert_eq!(snapshot.active.as_deref(), Some("atrium"));
    }

    /// Session ticket -> gateway (backend down) -> fallback briefing shown
    #[tokio::test]
    async fn test_e2e_briefing_falls_back_when_backend_down() {
        let blueprint = museum();
        let mut h = mount(&blueprint);
        h.session.start_sensors(false);
        h.clock.advance(Duration::from_millis(3500));
        h.session.tick();
        assert!(h.session.tap(1));

        let backend = MockBackend::offline();
        let gateway =
            ContentGateway::from_config(backend.clone(), &blueprint.gateway, h.clock.clone());

        let ticket = h.session.briefing_request().unwrap();
        let text = gateway.hotspot_briefing(&ticket.site, &ticket.hotspot).await;
        assert!(text.contains("Main Atrium"));
        assert!(h.session.apply_briefing(&ticket, text.clone()));
        assert_eq!(h.session.snapshot().briefing, Some(text));

        // failures are not cached: a second request calls the backend again
        let _ = gateway.hotspot_briefing(&ticket.site, &ticket.hotspot).await;
        assert_eq!(backend.calls(), 2);
        assert!(gateway.cache().is_empty());
    }

    /// Live text is cached and served without another backend call
    #[tokio::test]
    async fn test_e2e_briefing_cached_within_ttl() {
        let blueprint = museum();
        let mut h = mount(&blueprint);
        h.session.start_sensors(false);
        h.clock.advance(Duration::from_millis(3500));
        h.session.tick();
        h.session.tap(1);

        let backend = MockBackend::scripted([
            Ok("The atrium roof mirrors a Rungus longhouse.".to_string()),
            Err(GatewayError::Transport("should not be called".to_string())),
        ]);
        let gateway =
            ContentGateway::from_config(backend.clone(), &blueprint.gateway, h.clock.clone());

        let ticket = h.session.briefing_request().unwrap();
        let first = gateway.hotspot_briefing(&ticket.site, &ticket.hotspot).await;
        h.clock.advance(Duration::from_secs(blueprint.gateway.ttl_secs - 1));
        let second = gateway.hotspot_briefing(&ticket.site, &ticket.hotspot).await;

        assert_eq!(first, "The atrium roof mirrors a Rungus longhouse.");
        assert_eq!(second, first);
        assert_eq!(backend.calls(), 1);
    }

    /// A briefing that arrives after the view closed is dropped
    #[tokio::test]
    async fn test_e2e_briefing_after_teardown_is_discarded() {
        let blueprint = museum();
        let mut h = mount(&blueprint);
        h.session.start_camera().await;
        h.session.start_sensors(false);
        h.clock.advance(Duration::from_millis(3500));
        h.session.tick();
        h.session.tap(1);

        let gateway = Arc::new(ContentGateway::from_config(
            MockBackend::always("late").with_latency(Duration::from_millis(30)),
            &blueprint.gateway,
            h.clock.clone(),
        ));
        let ticket = h.session.briefing_request().unwrap();
        let pending = {
            let gateway = gateway.clone();
            let ticket = ticket.clone();
            tokio::spawn(async move { gateway.hotspot_briefing(&ticket.site, &ticket.hotspot).await })
        };

        h.session.teardown();
        let text = pending.await.unwrap();

        assert!(!h.session.apply_briefing(&ticket, text));
        assert!(h.session.snapshot().briefing.is_none());
        assert!(!h.source.is_listening());
        assert_eq!(h.camera.live_tracks(), 0);
        assert_eq!(h.session.sensor_state(), SamplerState::Stopped);
    }

    /// Synthetic sensor thread -> session queue -> stability score
    #[tokio::test]
    async fn test_e2e_mock_source_feeds_stability() {
        let blueprint = museum();
        let source = Arc::new(MockOrientationSource::new(
            "mock",
            MockOrientationConfig {
                rate_hz: 200.0,
                seed: Some(42),
                ..Default::default()
            },
        ));
        let clock = Arc::new(ManualClock::new(0));
        let mut session = ArSession::new(
            blueprint.tracker.clone(),
            &blueprint.site,
            source.clone(),
            MockCamera::new(),
            blueprint.camera,
            clock,
        );
        session.negotiate_sensors(&AmbientPermission).await;

        let first = tokio::time::timeout(Duration::from_secs(2), session.next_update())
            .await
            .expect("sample within timeout")
            .expect("queue open");
        assert!((session.snapshot().orientation.unwrap().beta - 45.0).abs() < 5.0);
        assert!(first.reading.delta.abs() < f64::EPSILON);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let updates = session.pump();
        assert!(!updates.is_empty());
        let floor = blueprint.tracker.stability.floor;
        let ceiling = blueprint.tracker.stability.ceiling;
        assert!(updates
            .iter()
            .all(|u| (floor..=ceiling).contains(&u.reading.score)));

        drop(session);
        assert!(!source.is_listening());
    }

    /// Empty catalog: the site itself is the only hotspot and locks at center
    #[tokio::test]
    async fn test_e2e_empty_catalog_locks_site() {
        let blueprint = ArBlueprint::default();
        let mut h = mount(&blueprint);
        h.clock.advance(Duration::from_millis(3500));
        let transition = h.session.tick().unwrap();
        assert_eq!(transition.to.index(), Some(0));

        let snapshot = h.session.snapshot();
        assert_eq!(snapshot.hotspots.len(), 1);
        assert_eq!(snapshot.hotspots[0].label, "Sabah Museum");
        assert!(snapshot.hotspots[0].locked);
    }
}
