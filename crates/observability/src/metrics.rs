//! AR HUD 指标收集模块
//!
//! 记录姿态采样、锁定切换、内容网关与摄像头的运行指标，
//! 并提供会话级的内存聚合统计。

use std::collections::HashMap;

use metrics::{counter, gauge, histogram};

/// 记录一次姿态采样
///
/// 每处理一个 `OrientationSample` 调用一次。
pub fn record_orientation_sample(stability: u32, low_stability: bool) {
    counter!("ar_hud_orientation_samples_total").increment(1);
    gauge!("ar_hud_stability_score").set(stability as f64);
    histogram!("ar_hud_stability_score_hist").record(stability as f64);

    if low_stability {
        counter!("ar_hud_low_stability_samples_total").increment(1);
    }
}

/// 记录锁定目标切换 (`None` = 解除锁定)
pub fn record_lock_transition(hotspot: Option<&str>) {
    counter!(
        "ar_hud_lock_transitions_total",
        "hotspot" => hotspot.unwrap_or("none").to_string()
    )
    .increment(1);
}

/// 记录用户交互 (tap / dismiss / route / map / capture)
pub fn record_interaction(kind: &str, accepted: bool) {
    let status = if accepted { "accepted" } else { "ignored" };
    counter!(
        "ar_hud_interactions_total",
        "kind" => kind.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录缓存查询
pub fn record_cache_lookup(operation: &str, hit: bool) {
    let name = if hit {
        "ar_hud_cache_hits_total"
    } else {
        "ar_hud_cache_misses_total"
    };
    counter!(name, "operation" => operation.to_string()).increment(1);
}

/// 记录后端请求结果 (`success` 或错误类别)
pub fn record_backend_outcome(operation: &str, outcome: &str) {
    counter!(
        "ar_hud_backend_requests_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// 记录摄像头获取结果
pub fn record_capture_acquire(outcome: &str) {
    counter!("ar_hud_capture_acquire_total", "outcome" => outcome.to_string()).increment(1);
}

/// 记录摄像头释放 (实际停止了轨道时)
pub fn record_capture_release(tracks_stopped: usize) {
    counter!("ar_hud_capture_release_total").increment(1);
    counter!("ar_hud_capture_tracks_stopped_total").increment(tracks_stopped as u64);
}

/// 会话指标聚合器
///
/// 在内存中聚合一次 AR 会话的指标，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct SessionMetricsAggregator {
    /// 姿态采样总数
    pub total_samples: u64,

    /// 低稳定度采样数
    pub low_stability_samples: u64,

    /// 锁定切换次数
    pub lock_transitions: u64,

    /// 稳定度统计
    pub stability_stats: RunningStats,

    /// 各热点累计锁定时长 (毫秒)
    pub locked_millis: HashMap<String, i64>,

    last_observed_at: Option<i64>,
    current_lock: Option<String>,
}

impl SessionMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次采样后的会话状态
    ///
    /// 上一次观测到本次之间的时长计入上一次的锁定目标。
    pub fn observe(&mut self, now_ms: i64, stability: u32, low_stability: bool, locked: Option<&str>) {
        self.total_samples += 1;
        self.stability_stats.push(stability as f64);
        if low_stability {
            self.low_stability_samples += 1;
        }

        if let (Some(prev_at), Some(prev_lock)) = (self.last_observed_at, &self.current_lock) {
            let elapsed = (now_ms - prev_at).max(0);
            *self.locked_millis.entry(prev_lock.clone()).or_insert(0) += elapsed;
        }

        if self.current_lock.as_deref() != locked {
            self.lock_transitions += 1;
            self.current_lock = locked.map(str::to_string);
        }
        self.last_observed_at = Some(now_ms);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_samples: self.total_samples,
            low_stability_samples: self.low_stability_samples,
            low_stability_rate: if self.total_samples > 0 {
                self.low_stability_samples as f64 / self.total_samples as f64 * 100.0
            } else {
                0.0
            },
            lock_transitions: self.lock_transitions,
            stability: StatsSummary::from(&self.stability_stats),
            locked_millis: self.locked_millis.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 会话指标摘要
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub total_samples: u64,
    pub low_stability_samples: u64,
    pub low_stability_rate: f64,
    pub lock_transitions: u64,
    pub stability: StatsSummary,
    pub locked_millis: HashMap<String, i64>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== AR Session Summary ===")?;
        writeln!(f, "Orientation samples: {}", self.total_samples)?;
        writeln!(
            f,
            "Low-stability samples: {} ({:.2}%)",
            self.low_stability_samples, self.low_stability_rate
        )?;
        writeln!(f, "Stability score: {}", self.stability)?;
        writeln!(f, "Lock transitions: {}", self.lock_transitions)?;

        if !self.locked_millis.is_empty() {
            writeln!(f, "Time locked per hotspot:")?;
            let mut entries: Vec<_> = self.locked_millis.iter().collect();
            entries.sort();
            for (hotspot, millis) in entries {
                writeln!(f, "  {}: {:.1}s", hotspot, *millis as f64 / 1000.0)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
