//! Batch recommendations with structured reasoning.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cadence_core::config::BatchConfiguration;
use cadence_core::models::{BatchStrategy, PerformanceMetrics, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    CircuitBreakerActive,
    HighErrorRate,
    SlowResponse,
    RateLimited,
    HighCpu,
    ExcellentPerformance,
    BalancingReliability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub code: ReasonCode,
    pub detail: String,
}

impl Reason {
    fn new(code: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceImpact {
    pub cpu: ImpactLevel,
    pub memory: ImpactLevel,
    pub network: ImpactLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecommendation {
    pub batch_size: usize,
    /// Committed size before this recommendation was computed.
    pub previous_batch_size: usize,
    pub confidence: f64,
    pub recommended_strategy: BatchStrategy,
    pub reasoning: Vec<Reason>,
    pub circuit_breaker_active: bool,
    pub performance_score: f64,
    /// `None` when completion is unbounded: no throughput, or longer than
    /// a `Duration` can hold.
    pub estimated_completion: Option<Duration>,
    pub resource_impact: ResourceImpact,
    pub priority: Priority,
}

impl BatchRecommendation {
    pub fn reasoning_text(&self) -> String {
        self.reasoning
            .iter()
            .map(|r| r.detail.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

pub fn reasons(
    config: &BatchConfiguration,
    breaker_active: bool,
    metrics: &PerformanceMetrics,
    score: f64,
) -> Vec<Reason> {
    let mut reasons = Vec::new();
    if breaker_active {
        reasons.push(Reason::new(
            ReasonCode::CircuitBreakerActive,
            "Circuit breaker active - using minimal batch size",
        ));
    }
    if metrics.error_rate > config.max_error_rate {
        reasons.push(Reason::new(
            ReasonCode::HighErrorRate,
            format!("High error rate ({:.1}%) - reducing batch size", metrics.error_rate * 100.0),
        ));
    }
    if metrics.avg_response_time_ms > config.target_response_time_ms {
        reasons.push(Reason::new(
            ReasonCode::SlowResponse,
            format!(
                "Slow response time ({:.0}ms) - optimizing batch size",
                metrics.avg_response_time_ms
            ),
        ));
    }
    if metrics.rate_limit_hits > 0 {
        reasons.push(Reason::new(
            ReasonCode::RateLimited,
            "Rate limiting detected - using conservative batching",
        ));
    }
    if metrics.cpu_pct > config.cpu_threshold_pct {
        reasons.push(Reason::new(
            ReasonCode::HighCpu,
            format!("High CPU usage ({:.1}%) - reducing batch size", metrics.cpu_pct),
        ));
    }
    if reasons.is_empty() {
        if score > 0.8 {
            reasons.push(Reason::new(
                ReasonCode::ExcellentPerformance,
                "Excellent performance - optimizing for throughput",
            ));
        } else {
            reasons.push(Reason::new(
                ReasonCode::BalancingReliability,
                "Balancing performance and reliability",
            ));
        }
    }
    reasons
}

/// Consistency of recent scores. Fewer than `min_samples` scores yields 0.5.
pub fn confidence(recent_scores: &[f64], min_samples: usize) -> f64 {
    if recent_scores.len() < min_samples {
        return 0.5;
    }
    let consistency = (1.0 - sample_variance(recent_scores)).max(0.0);
    (consistency + 0.2).min(1.0)
}

fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

/// Current conditions first, then the best smoothed score. Ties go to the
/// earliest strategy in declaration order.
pub fn recommend_strategy(
    config: &BatchConfiguration,
    metrics: &PerformanceMetrics,
    scores: impl Iterator<Item = (BatchStrategy, f64)>,
) -> BatchStrategy {
    if metrics.cpu_pct > 80.0 || metrics.memory_pct > 80.0 || metrics.rate_limit_hits > 0 {
        return BatchStrategy::Conservative;
    }
    if metrics.success_rate > 0.95 && metrics.avg_response_time_ms < config.target_response_time_ms {
        return BatchStrategy::Aggressive;
    }
    let mut best: Option<(BatchStrategy, f64)> = None;
    for (strategy, score) in scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((strategy, score)),
        }
    }
    best.map(|(s, _)| s).unwrap_or_default()
}

pub fn estimate_completion(batch_size: usize, pending: usize, throughput: f64) -> Option<Duration> {
    if throughput <= 0.0 || !throughput.is_finite() {
        return None;
    }
    let batch_size = batch_size.max(1);
    let batches = pending.div_ceil(batch_size);
    let per_batch = batch_size as f64 / throughput;
    // Beyond what a Duration can hold counts as unbounded.
    Duration::try_from_secs_f64(batches as f64 * per_batch).ok()
}

/// Impact of moving from `previous_size` to `batch_size`.
pub fn resource_impact(batch_size: usize, previous_size: usize) -> ResourceImpact {
    let ratio = batch_size as f64 / previous_size.max(1) as f64;
    let cpu = if ratio < 1.2 {
        ImpactLevel::Low
    } else if ratio < 2.0 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::High
    };
    let memory = if ratio < 1.5 {
        ImpactLevel::Low
    } else if ratio < 2.5 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::High
    };
    let network = if batch_size > 100 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    };
    ResourceImpact { cpu, memory, network }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calm_metrics_with_high_score_are_excellent() {
        let config = BatchConfiguration::default();
        let reasons = reasons(&config, false, &PerformanceMetrics::default(), 0.9);
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].code, ReasonCode::ExcellentPerformance);
    }

    #[test]
    fn every_triggered_reason_is_listed() {
        let config = BatchConfiguration::default();
        let bad = PerformanceMetrics {
            error_rate: 0.2,
            avg_response_time_ms: 900.0,
            rate_limit_hits: 2,
            cpu_pct: 91.0,
            ..PerformanceMetrics::default()
        };
        let codes: Vec<_> = reasons(&config, true, &bad, 0.2).into_iter().map(|r| r.code).collect();
        assert_eq!(
            codes,
            vec![
                ReasonCode::CircuitBreakerActive,
                ReasonCode::HighErrorRate,
                ReasonCode::SlowResponse,
                ReasonCode::RateLimited,
                ReasonCode::HighCpu,
            ]
        );
    }

    #[test]
    fn confidence_uses_sample_variance() {
        assert_eq!(confidence(&[0.9; 5], 10), 0.5);
        assert_eq!(confidence(&[0.9; 10], 10), 1.0);
        let spread = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        // variance = 2.5 / 9
        let expected = 1.0 - 2.5 / 9.0 + 0.2;
        assert!((confidence(&spread, 10) - expected).abs() < 1e-9);
    }

    #[test]
    fn strategy_ties_go_to_declaration_order() {
        let config = BatchConfiguration::default();
        let middling = PerformanceMetrics {
            success_rate: 0.9,
            ..PerformanceMetrics::default()
        };
        let tied = BatchStrategy::ALL.iter().map(|s| (*s, 0.0));
        assert_eq!(recommend_strategy(&config, &middling, tied), BatchStrategy::Conservative);

        let ranked = [
            (BatchStrategy::Conservative, 0.2),
            (BatchStrategy::Aggressive, 0.4),
            (BatchStrategy::Adaptive, 0.7),
            (BatchStrategy::Balanced, 0.7),
        ];
        assert_eq!(
            recommend_strategy(&config, &middling, ranked.into_iter()),
            BatchStrategy::Adaptive
        );
    }

    #[test]
    fn zero_throughput_has_no_estimate() {
        assert_eq!(estimate_completion(10, 100, 0.0), None);
        assert_eq!(estimate_completion(10, 100, 10.0), Some(Duration::from_secs(10)));
        assert_eq!(estimate_completion(12, 105, 12.0), Some(Duration::from_secs(9)));
    }

    #[test]
    fn impact_scales_with_growth() {
        let impact = resource_impact(25, 10);
        assert_eq!(impact.cpu, ImpactLevel::High);
        assert_eq!(impact.memory, ImpactLevel::High);
        assert_eq!(impact.network, ImpactLevel::Low);
        assert_eq!(resource_impact(12, 10).cpu, ImpactLevel::Medium);
        assert_eq!(resource_impact(12, 10).memory, ImpactLevel::Low);
        assert_eq!(resource_impact(150, 150).network, ImpactLevel::Medium);
    }
}
