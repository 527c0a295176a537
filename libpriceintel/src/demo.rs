//! Interactive dashboard demo data
//!
//! The demo panel shows a revenue counter and a model-accuracy gauge that
//! drift as a random walk. `MetricsTicker` runs that walk as a background
//! tokio task publishing on a watch channel; it can be stopped and started
//! again, resuming from the last published snapshot.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const INITIAL_REVENUE: u64 = 125_000;
pub const INITIAL_ACCURACY: f64 = 98.2;
pub const MAX_ACCURACY: f64 = 99.9;

/// Shortest period a ticker runs at; shorter periods are raised to this
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub tick: u64,
    pub revenue: u64,
    /// Percent
    pub accuracy: f64,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            revenue: INITIAL_REVENUE,
            accuracy: INITIAL_ACCURACY,
        }
    }
}

impl MetricsSnapshot {
    /// One step of the walk
    ///
    /// Revenue grows by an integer in `[0, 100)`. Accuracy moves by at most
    /// 0.05 in either direction and is capped at `MAX_ACCURACY`.
    pub fn step<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let revenue = self.revenue + rng.gen_range(0..100u64);
        let drift = (rng.gen::<f64>() - 0.5) * 0.1;
        Self {
            tick: self.tick + 1,
            revenue,
            accuracy: (self.accuracy + drift).min(MAX_ACCURACY),
        }
    }
}

/// Restartable periodic metrics task
pub struct MetricsTicker {
    period: Duration,
    seed: Option<u64>,
    sender: Arc<watch::Sender<MetricsSnapshot>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MetricsTicker {
    pub fn new(period: Duration) -> Self {
        let (sender, _) = watch::channel(MetricsSnapshot::default());
        Self {
            period: period.max(MIN_TICK_PERIOD),
            seed: None,
            sender: Arc::new(sender),
            task: Mutex::new(None),
        }
    }

    /// Deterministic walk for tests and reproducible output
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> MetricsSnapshot {
        *self.sender.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Spawn the walk; returns false if it is already running
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let sender = Arc::clone(&self.sender);
        let period = self.period;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                sender.send_modify(|snapshot| *snapshot = snapshot.step(&mut rng));
            }
        }));
        tracing::debug!(period_ms = period.as_millis() as u64, "Metrics ticker started");
        true
    }

    /// Cancel the walk; returns false if it was not running
    pub fn stop(&self) -> bool {
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => {
                handle.abort();
                tracing::debug!(tick = self.current().tick, "Metrics ticker stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for MetricsTicker {
    fn drop(&mut self) {
        if let Some(handle) = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoTab {
    Monitoring,
    Analytics,
    Recommendations,
    Forecasting,
}

impl DemoTab {
    pub const ALL: [DemoTab; 4] = [
        DemoTab::Monitoring,
        DemoTab::Analytics,
        DemoTab::Recommendations,
        DemoTab::Forecasting,
    ];

    fn slug(&self) -> &'static str {
        match self {
            DemoTab::Monitoring => "monitoring",
            DemoTab::Analytics => "analytics",
            DemoTab::Recommendations => "recommendations",
            DemoTab::Forecasting => "forecasting",
        }
    }

    pub fn title_key(&self) -> String {
        format!("demo.{}.title", self.slug())
    }

    pub fn subtitle_key(&self) -> String {
        format!("demo.{}.subtitle", self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompetitorPrice {
    pub competitor: &'static str,
    pub price: u32,
    pub change: &'static str,
    pub trend: Trend,
}

/// Sample rows for the monitoring tab
pub const COMPETITORS: [CompetitorPrice; 4] = [
    CompetitorPrice {
        competitor: "TechCorp",
        price: 299,
        change: "+5%",
        trend: Trend::Up,
    },
    CompetitorPrice {
        competitor: "DataSystems",
        price: 275,
        change: "-2%",
        trend: Trend::Down,
    },
    CompetitorPrice {
        competitor: "SmartTech",
        price: 312,
        change: "0%",
        trend: Trend::Stable,
    },
    CompetitorPrice {
        competitor: "InnovateCorp",
        price: 289,
        change: "+3%",
        trend: Trend::Up,
    },
];
