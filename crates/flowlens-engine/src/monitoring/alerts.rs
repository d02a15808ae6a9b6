use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ThresholdExceeded,
    AnomalyDetected,
    Degradation,
    Failure,
}

/// One alert in the global log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceAlert {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: AlertSeverity,
    pub alert_type: AlertType,
    pub message: String,
    pub workflow_id: String,
    pub node_id: Option<String>,
    /// The offending metric value(s) by metric name.
    pub metric_values: HashMap<String, f64>,
    pub recommendations: Vec<String>,
}

impl PerformanceAlert {
    pub(crate) fn new(
        severity: AlertSeverity,
        alert_type: AlertType,
        message: String,
        workflow_id: &str,
        node_id: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            severity,
            alert_type,
            message,
            workflow_id: workflow_id.to_string(),
            node_id: node_id.map(str::to_string),
            metric_values: HashMap::new(),
            recommendations: Vec::new(),
        }
    }

    pub(crate) fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metric_values.insert(name.to_string(), value);
        self
    }

    pub(crate) fn with_recommendation(mut self, recommendation: &str) -> Self {
        self.recommendations.push(recommendation.to_string());
        self
    }
}

/// Bounded FIFO log of alerts. Eviction of the oldest entry is silent.
#[derive(Debug)]
pub(crate) struct AlertLog {
    entries: VecDeque<PerformanceAlert>,
    cap: usize,
}

impl AlertLog {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap.min(1024)),
            cap,
        }
    }

    pub(crate) fn push(&mut self, alert: PerformanceAlert) {
        self.entries.push_back(alert);
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PerformanceAlert> {
        self.entries.iter()
    }

    /// Alerts within the lookback window, optionally filtered by workflow,
    /// newest first.
    pub(crate) fn active(
        &self,
        window: Duration,
        workflow_id: Option<&str>,
    ) -> Vec<PerformanceAlert> {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(window).unwrap_or_else(|_| ChronoDuration::hours(24));
        let mut matches: Vec<PerformanceAlert> = self
            .entries
            .iter()
            .filter(|a| a.timestamp >= cutoff)
            .filter(|a| workflow_id.map_or(true, |wf| a.workflow_id == wf))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches
    }
}
