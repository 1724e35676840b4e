//! Session orchestrator - drives one headless AR session.
//!
//! Owns the session, feeds it HUD ticks on a fixed interval, drains the
//! orientation queue, optionally opens the detail overlay of whatever gets
//! locked and fetches its briefing in the background.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ar_tracker::{ArSession, ContentTicket, LockState, LockTransition, OrientationUpdate};
use content_gateway::ContentGateway;
use contracts::{ArBlueprint, Clock, OrientationSource, SystemClock};
use device::{
    AmbientPermission, ConsentPermission, MockCamera, MockOrientationConfig,
    MockOrientationSource, ReplayConfig, ReplayOrientationSource,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::sink::{JsonlSink, LogSink, SnapshotSink};
use super::SessionStats;
use crate::backend::AnyBackend;
use crate::cli::ConsentMode;

type Gateway = Arc<ContentGateway<AnyBackend>>;

/// Where orientation samples come from
#[derive(Debug, Clone)]
pub enum SourceSetup {
    Mock { seed: Option<u64> },
    Replay { path: PathBuf, config: ReplayConfig },
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub blueprint: ArBlueprint,
    pub source: SourceSetup,
    pub consent: ConsentMode,

    /// Run length (None = until interrupted)
    pub duration: Option<Duration>,

    /// HUD tick interval
    pub tick: Duration,

    /// JSONL snapshot output
    pub snapshots: Option<PathBuf>,

    /// Open the detail overlay of every newly locked hotspot
    pub auto_tap: bool,

    /// Use the live completion backend when configured
    pub online: bool,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main session orchestrator
pub struct SessionRunner {
    config: SessionConfig,
    clock: Arc<dyn Clock>,
}

impl SessionRunner {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Run until the configured duration elapses or `shutdown` resolves
    pub async fn run(self, shutdown: impl std::future::Future<Output = ()>) -> Result<SessionStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let source = self.build_source()?;
        info!(source = source.name(), "Orientation source ready");

        let mut session = ArSession::new(
            blueprint.tracker.clone(),
            &blueprint.site,
            source,
            MockCamera::new(),
            blueprint.camera,
            self.clock.clone(),
        );

        let camera = session.start_camera().await;
        let sensor = match self.config.consent {
            ConsentMode::Ambient => session.negotiate_sensors(&AmbientPermission).await,
            ConsentMode::Grant => session.negotiate_sensors(&ConsentPermission::grant()).await,
            ConsentMode::Deny => session.negotiate_sensors(&ConsentPermission::deny()).await,
        };
        info!(camera = ?camera, sensor = sensor.as_str(), "Session started");

        let mut stats = SessionStats::new(camera, sensor);
        let mut sinks = self.build_sinks()?;
        let gateway = self.build_gateway();
        let (briefing_tx, mut briefing_rx) = mpsc::unbounded_channel::<(ContentTicket, String)>();

        let mut interval = tokio::time::interval(self.config.tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let duration = self.config.duration;
        let deadline = async move {
            match duration {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut deadline => {
                    info!("Session duration reached");
                    break;
                }
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping session...");
                    break;
                }
            }

            stats.ticks += 1;

            for update in session.pump() {
                self.observe(&session, &update, &mut stats);
                if let Some(transition) = update.lock {
                    self.on_lock(&mut session, transition, &gateway, &briefing_tx, &mut stats);
                }
            }
            if let Some(transition) = session.tick() {
                self.on_lock(&mut session, transition, &gateway, &briefing_tx, &mut stats);
            }

            while let Ok((ticket, text)) = briefing_rx.try_recv() {
                if session.apply_briefing(&ticket, text) {
                    stats.briefings_applied += 1;
                } else {
                    stats.briefings_discarded += 1;
                }
            }

            let snapshot = session.snapshot();
            for sink in sinks.iter_mut() {
                sink.write(&snapshot)?;
            }
            stats.snapshots_written += 1;
        }

        info!("Shutting down session...");
        session.teardown();
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                warn!(sink = sink.name(), error = %e, "Failed to flush sink");
            }
        }

        stats.duration = start_time.elapsed();
        info!(
            duration_secs = stats.duration.as_secs_f64(),
            samples = stats.session_metrics.total_samples,
            "Session shutdown complete"
        );

        Ok(stats)
    }

    fn build_source(&self) -> Result<Arc<dyn OrientationSource>> {
        let source: Arc<dyn OrientationSource> = match &self.config.source {
            SourceSetup::Mock { seed } => {
                info!(seed = ?seed, "Running with MOCK orientation");
                Arc::new(MockOrientationSource::new(
                    "mock",
                    MockOrientationConfig {
                        seed: *seed,
                        ..Default::default()
                    },
                ))
            }
            SourceSetup::Replay { path, config } => {
                info!(path = %path.display(), "Running in REPLAY mode");
                Arc::new(
                    ReplayOrientationSource::load(path, config.clone())
                        .with_context(|| format!("Failed to load recording {}", path.display()))?,
                )
            }
        };
        Ok(source)
    }

    fn build_sinks(&self) -> Result<Vec<Box<dyn SnapshotSink>>> {
        let mut sinks: Vec<Box<dyn SnapshotSink>> = vec![Box::new(LogSink::new("log"))];
        if let Some(path) = &self.config.snapshots {
            sinks.push(Box::new(JsonlSink::create("jsonl", path)?));
        }
        Ok(sinks)
    }

    fn build_gateway(&self) -> Gateway {
        let config = &self.config.blueprint.gateway;
        let backend = if self.config.online {
            AnyBackend::live_or_offline(config)
        } else {
            AnyBackend::offline()
        };
        Arc::new(ContentGateway::from_config(backend, config, self.clock.clone()))
    }

    fn observe(&self, session: &ArSession<MockCamera>, update: &OrientationUpdate, stats: &mut SessionStats) {
        let locked = session.locked().map(|i| session.catalog()[i].id.as_str());
        stats.session_metrics.observe(
            self.clock.now_millis(),
            update.reading.score,
            update.reading.low_stability,
            locked,
        );
    }

    fn on_lock(
        &self,
        session: &mut ArSession<MockCamera>,
        transition: LockTransition,
        gateway: &Gateway,
        briefings: &mpsc::UnboundedSender<(ContentTicket, String)>,
        stats: &mut SessionStats,
    ) {
        let LockState::Locked(index) = transition.to else {
            info!("Lock released");
            return;
        };
        info!(hotspot = %session.catalog()[index].id, "Hotspot locked");

        if !self.config.auto_tap || session.active() == Some(index) || !session.tap(index) {
            return;
        }
        let Some(ticket) = session.briefing_request() else {
            return;
        };

        stats.briefings_requested += 1;
        let gateway = gateway.clone();
        let tx = briefings.clone();
        tokio::spawn(async move {
            let text = gateway.hotspot_briefing(&ticket.site, &ticket.hotspot).await;
            // receiver gone means the session already ended
            let _ = tx.send((ticket, text));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{HotspotDefinition, IconKind, NormalizedPoint};
    use std::io::Write;

    fn blueprint() -> ArBlueprint {
        let mut blueprint = ArBlueprint::default();
        blueprint.tracker.scan.duration_ms = 20;
        blueprint.site.hotspots = vec![HotspotDefinition {
            id: "atrium".into(),
            label: "Main Atrium".to_string(),
            category: "Hall".to_string(),
            description: String::new(),
            scene: NormalizedPoint::new(52.0, 48.0),
            map: NormalizedPoint::new(40.0, 40.0),
            distance: "15m".to_string(),
            rating: 4.6,
            reviews: 30,
            price: 0.0,
            icon: IconKind::Landmark,
        }];
        blueprint
    }

    fn config(source: SourceSetup) -> SessionConfig {
        SessionConfig {
            blueprint: blueprint(),
            source,
            consent: ConsentMode::Ambient,
            duration: Some(Duration::from_millis(300)),
            tick: Duration::from_millis(10),
            snapshots: None,
            auto_tap: true,
            online: false,
            metrics_port: None,
        }
    }

    #[tokio::test]
    async fn test_mock_session_locks_and_briefs() {
        let runner = SessionRunner::new(config(SourceSetup::Mock { seed: Some(7) }));
        let stats = runner.run(std::future::pending()).await.unwrap();

        assert!(stats.ticks > 0);
        assert_eq!(stats.snapshots_written, stats.ticks);
        assert!(stats.session_metrics.total_samples > 0);
        assert_eq!(stats.briefings_requested, 1);
        assert_eq!(
            stats.briefings_applied + stats.briefings_discarded,
            stats.briefings_requested
        );
    }

    #[tokio::test]
    async fn test_denied_consent_still_runs() {
        let mut config = config(SourceSetup::Mock { seed: Some(7) });
        config.consent = ConsentMode::Deny;
        config.duration = Some(Duration::from_millis(50));

        let stats = SessionRunner::new(config).run(std::future::pending()).await.unwrap();
        assert_eq!(stats.sensor, ar_tracker::SamplerState::Denied);
        assert_eq!(stats.session_metrics.total_samples, 0);
    }

    #[tokio::test]
    async fn test_replay_session_writes_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let recording = dir.path().join("walk.jsonl");
        let mut file = std::fs::File::create(&recording).unwrap();
        for t in 0..5 {
            writeln!(file, r#"{{"t_ms": {}, "alpha": 0.0, "beta": 45.0, "gamma": 0.0}}"#, t * 10).unwrap();
        }
        drop(file);

        let mut config = config(SourceSetup::Replay {
            path: recording,
            config: ReplayConfig::default(),
        });
        let snapshots = dir.path().join("snapshots.jsonl");
        config.snapshots = Some(snapshots.clone());
        config.duration = Some(Duration::from_millis(150));

        let stats = SessionRunner::new(config).run(std::future::pending()).await.unwrap();
        assert_eq!(stats.session_metrics.total_samples, 5);

        let lines = std::fs::read_to_string(&snapshots).unwrap().lines().count() as u64;
        assert_eq!(lines, stats.snapshots_written);
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_run() {
        let mut config = config(SourceSetup::Mock { seed: Some(1) });
        config.duration = None;

        let started = Instant::now();
        let stats = SessionRunner::new(config)
            .run(tokio::time::sleep(Duration::from_millis(40)))
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(stats.ticks > 0);
    }
}
