use super::alerts::{AlertLog, AlertSeverity, AlertType, PerformanceAlert};
use super::anomaly::{detect_anomalies, AnomalyFinding};
use super::baseline::PerformanceBaseline;
use super::report::{build_recommendations, PerformanceReport, ReportSummary};
use super::snapshot::{PerformanceSnapshot, SnapshotMetadata};
use super::source::{MetricsSource, SimulatedMetricsSource};
use super::trend;
use super::TimeRange;
use anyhow::{Context, Result};
use chrono::Utc;
use flowlens_core::{EngineConfig, MetricSample};
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Owner of all observation-side state: per-key snapshot histories, the
/// baseline cache, the global alert log, and the set of active monitors.
///
/// Cloning is cheap (the state is shared behind `Arc`s), which is what the
/// periodic monitoring tasks rely on. Construct one tracker per engine
/// instance; nothing here is process-global.
#[derive(Clone)]
pub struct PerformanceTracker {
    config: EngineConfig,
    source: Arc<dyn MetricsSource>,
    histories: Arc<RwLock<HashMap<String, VecDeque<PerformanceSnapshot>>>>,
    baselines: Arc<RwLock<HashMap<String, PerformanceBaseline>>>,
    alerts: Arc<RwLock<AlertLog>>,
    active_monitors: Arc<RwLock<HashSet<String>>>,
}

impl PerformanceTracker {
    pub fn new(config: EngineConfig, source: Arc<dyn MetricsSource>) -> Self {
        let alert_cap = config.alert_cap;
        Self {
            config,
            source,
            histories: Arc::new(RwLock::new(HashMap::new())),
            baselines: Arc::new(RwLock::new(HashMap::new())),
            alerts: Arc::new(RwLock::new(AlertLog::new(alert_cap))),
            active_monitors: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Tracker backed by the jittered development source.
    pub fn with_simulated_source(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(SimulatedMetricsSource))
    }

    /// Capture one snapshot for a workflow (or one of its nodes), append it
    /// to the bounded history and evaluate threshold and anomaly alerts.
    ///
    /// `overrides` bypasses the metrics source entirely; callers use it to
    /// feed in readings they already hold.
    pub async fn capture_snapshot(
        &self,
        workflow_id: &str,
        node_id: Option<&str>,
        overrides: Option<MetricSample>,
    ) -> Result<PerformanceSnapshot> {
        let metrics = match overrides {
            Some(sample) => sample,
            None => self
                .source
                .read(workflow_id, node_id)
                .await
                .with_context(|| format!("metrics read failed for workflow '{workflow_id}'"))?,
        };

        let snapshot = PerformanceSnapshot {
            timestamp: Utc::now(),
            workflow_id: workflow_id.to_string(),
            node_id: node_id.map(str::to_string),
            metrics,
            metadata: SnapshotMetadata::default(),
        };
        let key = snapshot.key();

        {
            let mut histories = self.histories.write().await;
            let history = histories.entry(key.clone()).or_default();
            history.push_back(snapshot.clone());
            while history.len() > self.config.history_cap {
                history.pop_front();
            }
        }

        self.evaluate_threshold_alerts(&snapshot).await;
        self.evaluate_anomaly_alerts(&snapshot, &key).await;
        Ok(snapshot)
    }

    /// Snapshot history for a key, oldest first.
    pub async fn history(&self, key: &str) -> Vec<PerformanceSnapshot> {
        self.histories
            .read()
            .await
            .get(key)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn history_len(&self, key: &str) -> usize {
        self.histories
            .read()
            .await
            .get(key)
            .map_or(0, VecDeque::len)
    }

    /// Cached baseline for a key when fresh; otherwise recomputed from the
    /// most recent window once enough snapshots exist, or the fixed default
    /// (never cached) until then.
    pub async fn baseline_for(&self, key: &str) -> PerformanceBaseline {
        {
            let baselines = self.baselines.read().await;
            if let Some(baseline) = baselines.get(key) {
                if !baseline.is_expired(self.config.baseline_ttl) {
                    return baseline.clone();
                }
            }
        }

        let samples: Vec<MetricSample> = {
            let histories = self.histories.read().await;
            histories
                .get(key)
                .map(|h| {
                    let skip = h.len().saturating_sub(self.config.baseline_window);
                    h.iter().skip(skip).map(|s| s.metrics).collect()
                })
                .unwrap_or_default()
        };

        if samples.len() >= self.config.baseline_min_samples {
            let baseline = PerformanceBaseline::compute(key, &samples);
            debug!(
                "baseline for key '{key}' recomputed over {} samples",
                baseline.sample_size
            );
            self.baselines
                .write()
                .await
                .insert(key.to_string(), baseline.clone());
            baseline
        } else {
            PerformanceBaseline::default_for(key)
        }
    }

    /// Drop the cached baseline so the next access recomputes it.
    pub async fn invalidate_baseline(&self, key: &str) {
        self.baselines.write().await.remove(key);
    }

    /// Alerts from the lookback window, newest first, optionally scoped to
    /// one workflow.
    pub async fn active_alerts(&self, workflow_id: Option<&str>) -> Vec<PerformanceAlert> {
        self.alerts
            .read()
            .await
            .active(self.config.active_alert_window, workflow_id)
    }

    pub async fn alert_count(&self) -> usize {
        self.alerts.read().await.len()
    }

    /// Begin periodic snapshot capture for a workflow. Idempotent: a second
    /// call while monitoring is active is a no-op. The loop re-checks the
    /// active set on every tick, so a tick already in flight when
    /// [`stop_monitoring`](Self::stop_monitoring) runs may capture once
    /// more before the loop exits.
    pub async fn start_monitoring(&self, workflow_id: &str, interval: Duration) {
        {
            let mut monitors = self.active_monitors.write().await;
            if !monitors.insert(workflow_id.to_string()) {
                debug!("monitoring already active for workflow '{workflow_id}'");
                return;
            }
        }

        let tracker = self.clone();
        let id = workflow_id.to_string();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if !tracker.is_monitoring(&id).await {
                    break;
                }
                if let Err(err) = tracker.capture_snapshot(&id, None, None).await {
                    warn!("snapshot capture failed for workflow '{id}': {err:#}");
                }
            }
            debug!("monitoring loop for workflow '{id}' exited");
        });
    }

    /// Cooperatively cancel periodic capture for a workflow.
    pub async fn stop_monitoring(&self, workflow_id: &str) {
        self.active_monitors.write().await.remove(workflow_id);
    }

    pub async fn is_monitoring(&self, workflow_id: &str) -> bool {
        self.active_monitors.read().await.contains(workflow_id)
    }

    /// Assemble the summary report for one workflow over a time range.
    pub async fn generate_report(
        &self,
        workflow_id: &str,
        range: TimeRange,
    ) -> Result<PerformanceReport> {
        let snapshots = self.history(workflow_id).await;
        let in_range: Vec<&PerformanceSnapshot> = snapshots
            .iter()
            .filter(|s| range.contains(s.timestamp))
            .collect();

        let alert_count = self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| a.workflow_id == workflow_id && range.contains(a.timestamp))
            .count();

        let summary = ReportSummary::from_snapshots(&in_range, alert_count);
        let trends = trend::analyze_trends(
            &snapshots,
            &range,
            self.config.trend_min_samples,
            self.config.stable_slope_epsilon,
        );
        let anomalies: Vec<AnomalyFinding> = match in_range.last() {
            Some(latest) => {
                let baseline = self.baseline_for(workflow_id).await;
                detect_anomalies(&latest.metrics, &baseline)
            }
            None => Vec::new(),
        };
        let recommendations = build_recommendations(&summary, &trends, &anomalies);

        Ok(PerformanceReport {
            workflow_id: workflow_id.to_string(),
            generated_at: Utc::now(),
            range,
            summary,
            trends,
            anomalies,
            recommendations,
        })
    }

    /// Recommendations for the last 24 hours. Unlike the other entry
    /// points this helper never fails the caller: internal errors are
    /// logged and an empty list is returned.
    pub async fn performance_suggestions(&self, workflow_id: &str) -> Vec<String> {
        match self.generate_report(workflow_id, TimeRange::last_hours(24)).await {
            Ok(report) => report.recommendations,
            Err(err) => {
                warn!("suggestion generation failed for workflow '{workflow_id}': {err:#}");
                Vec::new()
            }
        }
    }

    /// Fixed-threshold evaluation of a single snapshot, independent of any
    /// baseline.
    async fn evaluate_threshold_alerts(&self, snapshot: &PerformanceSnapshot) {
        let mut fired = Vec::new();
        let metrics = &snapshot.metrics;
        let node = snapshot.node_id.as_deref();

        if metrics.cpu_usage > self.config.cpu_alert_threshold {
            fired.push(
                PerformanceAlert::new(
                    AlertSeverity::High,
                    AlertType::ThresholdExceeded,
                    format!(
                        "CPU usage {:.1}% exceeds {:.0}%",
                        metrics.cpu_usage, self.config.cpu_alert_threshold
                    ),
                    &snapshot.workflow_id,
                    node,
                )
                .with_metric("cpu_usage", metrics.cpu_usage)
                .with_recommendation("check for runaway nodes or scale CPU allocation"),
            );
        }
        if metrics.memory_usage > self.config.memory_alert_threshold {
            fired.push(
                PerformanceAlert::new(
                    AlertSeverity::High,
                    AlertType::ThresholdExceeded,
                    format!(
                        "memory usage {:.1}% exceeds {:.0}%",
                        metrics.memory_usage, self.config.memory_alert_threshold
                    ),
                    &snapshot.workflow_id,
                    node,
                )
                .with_metric("memory_usage", metrics.memory_usage)
                .with_recommendation("check for leaks or scale memory allocation"),
            );
        }
        if metrics.error_rate > self.config.error_rate_alert_threshold {
            warn!(
                "error rate {:.1}% for workflow '{}' exceeds {:.0}%",
                metrics.error_rate, snapshot.workflow_id, self.config.error_rate_alert_threshold
            );
            fired.push(
                PerformanceAlert::new(
                    AlertSeverity::Critical,
                    AlertType::Failure,
                    format!(
                        "error rate {:.1}% exceeds {:.0}%",
                        metrics.error_rate, self.config.error_rate_alert_threshold
                    ),
                    &snapshot.workflow_id,
                    node,
                )
                .with_metric("error_rate", metrics.error_rate)
                .with_recommendation("inspect recent failures and add error handling"),
            );
        }

        if !fired.is_empty() {
            let mut alerts = self.alerts.write().await;
            for alert in fired {
                alerts.push(alert);
            }
        }
    }

    /// Baseline-relative evaluation; a no-op until a baseline has been
    /// established for the key.
    async fn evaluate_anomaly_alerts(&self, snapshot: &PerformanceSnapshot, key: &str) {
        let baseline = self.baseline_for(key).await;
        let findings = detect_anomalies(&snapshot.metrics, &baseline);
        if findings.is_empty() {
            return;
        }

        let mut alerts = self.alerts.write().await;
        for finding in findings {
            let alert = PerformanceAlert::new(
                finding.severity,
                AlertType::AnomalyDetected,
                format!(
                    "{} at {:.1} deviates from baseline {:.1} by more than {:.1}",
                    finding.metric, finding.value, finding.baseline_mean, finding.band
                ),
                &snapshot.workflow_id,
                snapshot.node_id.as_deref(),
            )
            .with_metric(finding.metric.name(), finding.value)
            .with_recommendation("compare against recent deploys and load changes");
            alerts.push(alert);
        }
    }
}
