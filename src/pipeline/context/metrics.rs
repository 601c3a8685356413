use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Quality,
    WhiteBalance,
    Lighting,
    Detection,
    Measurement,
    Classification,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Quality => "quality",
            Stage::WhiteBalance => "white_balance",
            Stage::Lighting => "lighting",
            Stage::Detection => "detection",
            Stage::Measurement => "measurement",
            Stage::Classification => "classification",
        }
    }
}

/// Wall-clock time spent in each stage of one run, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageMetrics {
    durations: IndexMap<Stage, Duration>,
    fallbacks: Vec<Stage>,
}

impl StageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, duration: Duration) {
        self.durations.insert(stage, duration);
    }

    /// Marks a stage whose output was replaced by its default or mock.
    pub fn record_fallback(&mut self, stage: Stage) {
        if !self.fallbacks.contains(&stage) {
            self.fallbacks.push(stage);
        }
    }

    pub fn duration(&self, stage: Stage) -> Option<Duration> {
        self.durations.get(&stage).copied()
    }

    pub fn fell_back(&self, stage: Stage) -> bool {
        self.fallbacks.contains(&stage)
    }

    pub fn total(&self) -> Duration {
        self.durations.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_durations_and_fallbacks() {
        let mut metrics = StageMetrics::new();
        metrics.record(Stage::Quality, Duration::from_millis(3));
        metrics.record(Stage::Detection, Duration::from_millis(7));
        metrics.record_fallback(Stage::Detection);
        metrics.record_fallback(Stage::Detection);

        assert_eq!(metrics.duration(Stage::Detection), Some(Duration::from_millis(7)));
        assert_eq!(metrics.duration(Stage::Lighting), None);
        assert_eq!(metrics.total(), Duration::from_millis(10));
        assert!(metrics.fell_back(Stage::Detection));
        assert!(!metrics.fell_back(Stage::Quality));
    }
}
