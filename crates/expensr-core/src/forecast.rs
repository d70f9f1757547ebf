//! Trend-adjusted moving-average cash-flow forecasting.
//!
//! A deliberately lightweight heuristic, not a statistical time-series
//! model: a sliding moving average supplies the level, the difference
//! between early and late averages supplies a coarse trend slope, and a
//! per-step dampening factor decays the trend's influence over the
//! projection horizon.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use expensr_store::{ForecastCache, StoredForecast};

use crate::aggregate::WeeklyCashFlowPoint;
use crate::error::Result;
use crate::models::config::ForecastConfig;

/// One point of a forecast series: either an observed historical week or a
/// projected future week, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub week: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_net: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_net: Option<Decimal>,
    pub is_forecast: bool,
}

/// Why a forecast series looks the way it does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ForecastStatus {
    Ok,
    /// Trend extrapolation is meaningless on too few samples; the series
    /// is empty and this is not an error.
    InsufficientData { required: usize, available: usize },
}

/// A forecast series with its status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub series: Vec<ForecastPoint>,
    pub status: ForecastStatus,
}

impl Forecast {
    pub fn is_insufficient(&self) -> bool {
        matches!(self.status, ForecastStatus::InsufficientData { .. })
    }
}

/// Project future weekly net cash flow from historical weekly aggregates.
///
/// `history` must be in chronological order. Fewer than the configured
/// minimum of points yields an empty series with an explanatory status.
pub fn project(history: &[WeeklyCashFlowPoint], config: &ForecastConfig) -> Forecast {
    if history.len() < config.min_history_weeks {
        return Forecast {
            series: Vec::new(),
            status: ForecastStatus::InsufficientData {
                required: config.min_history_weeks,
                available: history.len(),
            },
        };
    }

    let nets: Vec<f64> = history
        .iter()
        .map(|p| p.net.to_f64().unwrap_or(0.0))
        .collect();

    // Sliding moving average over the nets.
    let window = nets.len().min(4);
    let moving_averages: Vec<f64> = (0..=nets.len() - window)
        .map(|i| mean(&nets[i..i + window]))
        .collect();

    // Coarse linear-slope proxy: late averages vs early averages, spread
    // over the number of averages. Not a regression.
    let trend = if moving_averages.len() >= 2 {
        let recent = mean(&moving_averages[moving_averages.len() - 2..]);
        let older = mean(&moving_averages[..2]);
        (recent - older) / moving_averages.len() as f64
    } else {
        0.0
    };

    let base_value = mean(&nets[nets.len() - window..]);
    debug!(window, trend, base_value, "projecting cash flow");

    let mut series: Vec<ForecastPoint> = history
        .iter()
        .map(|p| ForecastPoint {
            week: p.week_start,
            observed_net: Some(p.net),
            forecast_net: None,
            is_forecast: false,
        })
        .collect();

    let last_week = history[history.len() - 1].week_start;
    for step in 0..config.horizon_weeks {
        // The dampening factor decays the trend's influence the further
        // out the projection extends.
        let dampening = config.trend_dampening.powi(step as i32);
        let value = base_value + trend * (step as f64 + 1.0) * dampening;
        series.push(ForecastPoint {
            week: last_week + Duration::weeks(step as i64 + 1),
            observed_net: None,
            forecast_net: Some(quantize(value)),
            is_forecast: true,
        });
    }

    Forecast {
        series,
        status: ForecastStatus::Ok,
    }
}

/// Return a fresh cached forecast for the organization, or recompute from
/// `history` and cache the result.
pub fn project_with_cache<C: ForecastCache>(
    cache: &C,
    org: Uuid,
    history: &[WeeklyCashFlowPoint],
    config: &ForecastConfig,
    now: DateTime<Utc>,
) -> Result<Forecast> {
    let max_age = Duration::hours(config.cache_max_age_hours);
    if let Some(stored) = cache.latest(org, max_age, now)? {
        match serde_json::from_value::<Vec<ForecastPoint>>(stored.series) {
            Ok(series) => {
                debug!(%org, computed_at = %stored.computed_at, "returning cached forecast");
                return Ok(Forecast {
                    series,
                    status: ForecastStatus::Ok,
                });
            }
            Err(e) => warn!(error = %e, "cached forecast series failed to decode, recomputing"),
        }
    }

    let forecast = project(history, config);
    if !forecast.is_insufficient() {
        cache.put(StoredForecast {
            id: Uuid::new_v4(),
            organization_id: org,
            horizon: config.horizon_weeks as u32,
            granularity: "week".to_string(),
            series: serde_json::to_value(&forecast.series)
                .map_err(expensr_store::StoreError::Snapshot)?,
            computed_at: now,
        })?;
    }
    Ok(forecast)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn quantize(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default().round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expensr_store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn point(week: &str, net: &str) -> WeeklyCashFlowPoint {
        let net = dec(net);
        WeeklyCashFlowPoint {
            week_start: week.parse().unwrap(),
            inflow: if net >= Decimal::ZERO { net } else { Decimal::ZERO },
            outflow: if net < Decimal::ZERO { -net } else { Decimal::ZERO },
            net,
        }
    }

    fn weekly(nets: &[&str]) -> Vec<WeeklyCashFlowPoint> {
        // Mondays from 2024-01-01.
        nets.iter()
            .enumerate()
            .map(|(i, net)| {
                let week = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + Duration::weeks(i as i64);
                point(&week.to_string(), net)
            })
            .collect()
    }

    #[test]
    fn test_insufficient_history() {
        let history = weekly(&["100.00", "110.00", "90.00"]);
        let forecast = project(&history, &ForecastConfig::default());

        assert!(forecast.series.is_empty());
        assert_eq!(
            forecast.status,
            ForecastStatus::InsufficientData {
                required: 4,
                available: 3,
            }
        );
    }

    #[test]
    fn test_flat_history_projects_flat() {
        let history = weekly(&["100.00", "100.00", "100.00", "100.00"]);
        let forecast = project(&history, &ForecastConfig::default());

        assert_eq!(forecast.status, ForecastStatus::Ok);
        assert_eq!(forecast.series.len(), 12);

        let projected: Vec<&ForecastPoint> =
            forecast.series.iter().filter(|p| p.is_forecast).collect();
        assert_eq!(projected.len(), 8);
        for p in &projected {
            assert_eq!(p.forecast_net, Some(dec("100.00")));
            assert_eq!(p.observed_net, None);
        }

        // Projected weeks continue weekly from the last observed week.
        assert_eq!(projected[0].week, "2024-01-29".parse().unwrap());
        assert_eq!(projected[7].week, "2024-03-18".parse().unwrap());
    }

    #[test]
    fn test_historical_points_carry_observations_only() {
        let history = weekly(&["10.00", "20.00", "30.00", "40.00"]);
        let forecast = project(&history, &ForecastConfig::default());

        let observed: Vec<&ForecastPoint> =
            forecast.series.iter().filter(|p| !p.is_forecast).collect();
        assert_eq!(observed.len(), 4);
        assert_eq!(observed[0].observed_net, Some(dec("10.00")));
        assert_eq!(observed[0].forecast_net, None);
    }

    #[test]
    fn test_trend_dampening_decays() {
        // Rising nets: six points, window capped at 4, three moving
        // averages, positive trend.
        let history = weekly(&["0.00", "20.00", "40.00", "60.00", "80.00", "100.00"]);
        let forecast = project(&history, &ForecastConfig::default());

        let projected: Vec<Decimal> = forecast
            .series
            .iter()
            .filter_map(|p| p.forecast_net)
            .collect();
        assert_eq!(projected.len(), 8);

        // base = mean(40,60,80,100) = 70; MAs = [30,50,70]; trend =
        // (mean(50,70) - mean(30,50)) / 3 = 20/3. Step increments grow but
        // dampening shrinks each step's trend multiplier.
        assert_eq!(projected[0], dec("76.67"));
        assert!(projected.iter().all(|v| *v > dec("70.00")));
        // Per-step trend contribution shrinks: differences decrease.
        let diffs: Vec<Decimal> = projected.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(diffs.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_cache_returns_fresh_result() {
        let cache = MemoryStore::new();
        let org = Uuid::new_v4();
        let config = ForecastConfig::default();
        let now = Utc::now();
        let history = weekly(&["100.00", "100.00", "100.00", "100.00"]);

        let first = project_with_cache(&cache, org, &history, &config, now).unwrap();
        assert_eq!(first.series.len(), 12);

        // Different history, but the cached series is still fresh and wins.
        let other = weekly(&["1.00", "1.00", "1.00", "1.00"]);
        let second = project_with_cache(&cache, org, &other, &config, now).unwrap();
        assert_eq!(second.series, first.series);

        // Past the freshness window the forecast is recomputed.
        let later = now + Duration::hours(25);
        let third = project_with_cache(&cache, org, &other, &config, later).unwrap();
        assert_eq!(
            third.series.iter().filter(|p| p.is_forecast).next().unwrap().forecast_net,
            Some(dec("1.00"))
        );
    }

    #[test]
    fn test_insufficient_data_is_not_cached() {
        let cache = MemoryStore::new();
        let org = Uuid::new_v4();
        let now = Utc::now();

        let forecast =
            project_with_cache(&cache, org, &[], &ForecastConfig::default(), now).unwrap();
        assert!(forecast.is_insufficient());
        assert!(cache
            .latest(org, Duration::hours(24), now)
            .unwrap()
            .is_none());
    }
}
