//! Display-ready form of a classification result.

use crate::service::config::{AppConfig, ConfidenceThresholds};
use crate::util::types::{Category, ClassificationResult};
use std::time::{Duration, Instant};

/// Badge styling. Unknown categories are styled as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTone {
    Productive,
    Unproductive,
    Error,
}

impl From<&Category> for CategoryTone {
    fn from(category: &Category) -> Self {
        match category {
            Category::Productive => CategoryTone::Productive,
            Category::Unproductive => CategoryTone::Unproductive,
            Category::Error | Category::Other(_) => CategoryTone::Error,
        }
    }
}

/// Colour band of the confidence bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_value(confidence: u8, thresholds: &ConfidenceThresholds) -> Self {
        if confidence >= thresholds.high {
            ConfidenceLevel::High
        } else if confidence >= thresholds.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub result: ClassificationResult,
    pub tone: CategoryTone,
    pub level: ConfidenceLevel,
    /// `87%`
    pub confidence_label: String,
    bar_revealed_at: Instant,
}

impl ResultView {
    pub fn new(result: ClassificationResult, config: &AppConfig, now: Instant) -> Self {
        Self::with_bar_delay(
            result,
            &config.confidence,
            config.timing.progress_bar_animation(),
            now,
        )
    }

    pub fn with_bar_delay(
        result: ClassificationResult,
        thresholds: &ConfidenceThresholds,
        bar_delay: Duration,
        now: Instant,
    ) -> Self {
        Self {
            tone: CategoryTone::from(&result.category),
            level: ConfidenceLevel::from_value(result.confidence, thresholds),
            confidence_label: format!("{}%", result.confidence),
            bar_revealed_at: now + bar_delay,
            result,
        }
    }

    /// Bar fill in percent; empty until the reveal delay has elapsed.
    pub fn bar_fill(&self, now: Instant) -> u8 {
        if self.is_bar_revealed(now) {
            self.result.confidence
        } else {
            0
        }
    }

    pub fn is_bar_revealed(&self, now: Instant) -> bool {
        now >= self.bar_revealed_at
    }

    pub fn category_label(&self) -> &str {
        self.result.category.label()
    }
}
