//! Vendor performance arithmetic.
//!
//! Everything here is a pure function over already-fetched purchase orders.
//! "No data" always degrades to `0.0`; nothing in this module fails.

use chrono::Duration;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::purchase_order;

/// Decimal places kept for the rate and response-time metrics.
pub const RATE_DECIMALS: u32 = 2;

/// Decimal places kept for the average quality rating.
pub const QUALITY_DECIMALS: u32 = 0;

/// The four vendor metrics, either freshly computed or read back from a
/// vendor's cached fields or a historical snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl PerformanceMetrics {
    /// Computes all four metrics from every order of one vendor.
    pub fn from_orders(orders: &[purchase_order::Model]) -> Self {
        let completed: Vec<purchase_order::Model> =
            orders.iter().filter(|o| o.is_completed()).cloned().collect();

        Self {
            on_time_delivery_rate: on_time_delivery_rate(&completed),
            quality_rating_avg: avg_quality_rating(&completed),
            average_response_time: avg_response_time_secs(orders),
            fulfillment_rate: fulfillment_rate(orders),
        }
    }
}

/// Rounds half to even at `dp` decimal places.
///
/// The decimal keeps the exact binary value of `value`, so `2.675` (stored as
/// `2.67499999...`) rounds down and `33.0 / 200.0` (stored as `0.16500000...08`)
/// rounds up.
pub fn round_to(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round_to(numerator as f64 / denominator as f64, RATE_DECIMALS)
}

/// On-time share of `completed` orders. Callers pass only completed orders.
pub fn on_time_delivery_rate(completed: &[purchase_order::Model]) -> f64 {
    let on_time = completed.iter().filter(|o| o.acknowledged_on_time()).count();
    ratio(on_time, completed.len())
}

/// Mean of the present quality ratings of `completed` orders.
pub fn avg_quality_rating(completed: &[purchase_order::Model]) -> f64 {
    let ratings: Vec<f64> = completed.iter().filter_map(|o| o.quality_rating).collect();
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    round_to(mean, QUALITY_DECIMALS)
}

/// Completed share of `orders`.
pub fn fulfillment_rate(orders: &[purchase_order::Model]) -> f64 {
    let completed = orders.iter().filter(|o| o.is_completed()).count();
    ratio(completed, orders.len())
}

/// Mean of `acknowledgment_date - issue_date`, in seconds, over orders that
/// carry both dates.
pub fn avg_response_time_secs(orders: &[purchase_order::Model]) -> f64 {
    let deltas: Vec<Duration> = orders.iter().filter_map(|o| o.response_time()).collect();
    if deltas.is_empty() {
        return 0.0;
    }

    // Summed in microseconds to keep sub-second precision without overflow
    // for any realistic order count.
    let total_micros: i128 = deltas
        .iter()
        .map(|d| d.num_microseconds().unwrap_or(i64::MAX) as i128)
        .sum();
    let mean_secs = total_micros as f64 / deltas.len() as f64 / 1_000_000.0;
    round_to(mean_secs, RATE_DECIMALS)
}
