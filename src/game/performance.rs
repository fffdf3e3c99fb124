//! Tick performance monitoring
//!
//! Tracks how much of the tick budget each simulation step consumes. The
//! status feeds the debug overlay and a warning log when the loop is falling
//! behind its cadence.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Samples kept in the rolling window (~6 seconds at 20 Hz)
const MAX_SAMPLES: usize = 120;
/// Samples required before the status is reclassified
const MIN_SAMPLES: usize = 10;

/// Performance status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceStatus {
    /// Well under budget
    Excellent,
    /// Normal operation
    Good,
    /// Most of the budget is used
    Warning,
    /// At or near the budget, ticks may start to slip
    Critical,
    /// Sustained overrun, ticks are being skipped
    Overloaded,
}

impl PerformanceStatus {
    /// Whether the loop is at risk of missing ticks
    pub fn is_degraded(&self) -> bool {
        matches!(self, PerformanceStatus::Critical | PerformanceStatus::Overloaded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceStatus::Excellent => "excellent",
            PerformanceStatus::Good => "good",
            PerformanceStatus::Warning => "warning",
            PerformanceStatus::Critical => "critical",
            PerformanceStatus::Overloaded => "overloaded",
        }
    }
}

impl fmt::Display for PerformanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Timing figures shown in the debug overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickTiming {
    pub average: Duration,
    pub p95: Duration,
    pub budget_percent: f32,
    pub status: PerformanceStatus,
}

/// Rolling window of tick durations measured against the tick budget
pub struct PerformanceMonitor {
    tick_durations: VecDeque<Duration>,
    budget: Duration,
    /// Thresholds as fractions of the budget
    excellent_threshold: f32,
    warning_threshold: f32,
    critical_threshold: f32,
    overload_threshold: f32,
    status: PerformanceStatus,
    tick_start: Option<Instant>,
}

impl PerformanceMonitor {
    pub fn new(budget: Duration) -> Self {
        Self {
            tick_durations: VecDeque::with_capacity(MAX_SAMPLES),
            budget: budget.max(Duration::from_micros(1)),
            excellent_threshold: 0.3,
            warning_threshold: 0.7,
            critical_threshold: 0.9,
            overload_threshold: 1.5,
            status: PerformanceStatus::Excellent,
            tick_start: None,
        }
    }

    pub fn tick_start(&mut self) {
        self.tick_start = Some(Instant::now());
    }

    /// Stop timing the current tick. Returns the status if it changed.
    pub fn tick_end(&mut self) -> Option<PerformanceStatus> {
        let start = self.tick_start.take()?;
        self.record_tick(start.elapsed())
    }

    /// Record a tick duration. Returns the new status if it changed.
    pub fn record_tick(&mut self, duration: Duration) -> Option<PerformanceStatus> {
        self.tick_durations.push_back(duration);
        while self.tick_durations.len() > MAX_SAMPLES {
            self.tick_durations.pop_front();
        }

        let previous = self.status;
        self.update_status();
        (self.status != previous).then_some(self.status)
    }

    fn update_status(&mut self) {
        if self.tick_durations.len() < MIN_SAMPLES {
            return;
        }

        let ratio = self.budget_usage_percent() / 100.0;

        self.status = if ratio < self.excellent_threshold {
            PerformanceStatus::Excellent
        } else if ratio < self.warning_threshold {
            PerformanceStatus::Good
        } else if ratio < self.critical_threshold {
            PerformanceStatus::Warning
        } else if ratio < self.overload_threshold {
            PerformanceStatus::Critical
        } else {
            PerformanceStatus::Overloaded
        };
    }

    pub fn average_tick_duration(&self) -> Duration {
        if self.tick_durations.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.tick_durations.iter().sum();
        sum / self.tick_durations.len() as u32
    }

    /// 95th percentile tick duration
    pub fn p95_tick_duration(&self) -> Duration {
        if self.tick_durations.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<_> = self.tick_durations.iter().copied().collect();
        sorted.sort();
        let idx = (sorted.len() as f32 * 0.95) as usize;
        sorted.get(idx.min(sorted.len() - 1)).copied().unwrap_or(Duration::ZERO)
    }

    pub fn status(&self) -> PerformanceStatus {
        self.status
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Average tick time as a percentage of the budget (0-100+)
    pub fn budget_usage_percent(&self) -> f32 {
        let avg = self.average_tick_duration();
        (avg.as_secs_f32() / self.budget.as_secs_f32()) * 100.0
    }

    pub fn sample_count(&self) -> usize {
        self.tick_durations.len()
    }

    pub fn reset(&mut self) {
        self.tick_durations.clear();
        self.status = PerformanceStatus::Excellent;
        self.tick_start = None;
    }

    pub fn timing(&self) -> TickTiming {
        TickTiming {
            average: self.average_tick_duration(),
            p95: self.p95_tick_duration(),
            budget_percent: self.budget_usage_percent(),
            status: self.status,
        }
    }

    pub fn status_message(&self) -> String {
        format!(
            "{} - {:.1}% of {}ms budget",
            self.status,
            self.budget_usage_percent(),
            self.budget.as_millis()
        )
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::game::constants::timing::TICK_DURATION_MS))
    }
}
