//! Statistics service
//!
//! Loads a user's history once per request and hands it to the aggregation
//! engine. Every report is derived on demand; nothing here is stored.

use crate::error::ApiError;
use crate::repositories::Store;
use crate::services::ProfileService;
use habit_tracker_shared::sleep::{
    format_sleep_duration, minutes_to_hours, sleep_quality, sleep_stats, SleepQuality,
};
use habit_tracker_shared::stats::{
    absolute_stats, all_time_stats, last_7_days, monthly_binary_stats, monthly_stats,
    nutrition_average, water_average, weekly_binary_stats, weekly_numeric_stats,
    weekly_nutrition_stats, weekly_water_stats,
};
use habit_tracker_shared::{
    AbsoluteStats, AllTimeStats, BinaryBucket, BinaryMetric, DateKey, History, Metric,
    NumericBucket, NutritionAverage, NutritionBucket, SeriesPoint, SleepStats, WaterAverage,
    WaterBucket,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How many weekly and monthly buckets to return
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PeriodQuery {
    #[validate(range(min = 1, max = 52, message = "Weeks must be between 1 and 52"))]
    pub weeks: Option<usize>,
    #[validate(range(min = 1, max = 24, message = "Months must be between 1 and 24"))]
    pub months: Option<usize>,
    /// Numeric metric for the steps report, `totalSteps` when absent
    pub metric: Option<String>,
}

/// Bucket counts after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periods {
    pub weeks: usize,
    pub months: usize,
}

impl PeriodQuery {
    pub fn resolve(&self, default_weeks: usize, default_months: usize) -> Result<Periods, ApiError> {
        self.validate()?;
        Ok(Periods {
            weeks: self.weeks.unwrap_or(default_weeks),
            months: self.months.unwrap_or(default_months),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericReport {
    pub metric: Metric,
    pub last_7_days: Vec<SeriesPoint>,
    pub weekly: Vec<NumericBucket>,
    pub monthly: Vec<NumericBucket>,
    pub all_time: AbsoluteStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryReport {
    pub metric: BinaryMetric,
    pub last_7_days: Vec<SeriesPoint>,
    pub weekly: Vec<BinaryBucket>,
    pub monthly: Vec<BinaryBucket>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterReport {
    pub last_7_days: Vec<SeriesPoint>,
    pub weekly: Vec<WaterBucket>,
    pub average: WaterAverage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReport {
    pub last_7_days: Vec<SeriesPoint>,
    pub weekly: Vec<NutritionBucket>,
    pub average: NutritionAverage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepReport {
    pub last_7_days: Vec<SeriesPoint>,
    pub weekly: Vec<NumericBucket>,
    pub stats: SleepStats,
    /// `7h 30m` style average
    pub avg_duration_label: String,
    /// Average night in hours, absent without sleep data
    pub avg_duration_hours: Option<f64>,
    /// Band of the average night, absent without sleep data
    pub avg_quality: Option<SleepQuality>,
}

pub struct StatsService;

impl StatsService {
    async fn history(store: &dyn Store, user_id: &str) -> Result<History, ApiError> {
        ProfileService::require(store, user_id).await?;
        Ok(store.get_history(user_id).await?)
    }

    /// Series, weekly and monthly buckets, and all-time figures of a numeric metric
    pub async fn numeric(
        store: &dyn Store,
        user_id: &str,
        metric: Metric,
        periods: Periods,
        today: DateKey,
    ) -> Result<NumericReport, ApiError> {
        let history = Self::history(store, user_id).await?;
        Ok(NumericReport {
            metric,
            last_7_days: last_7_days(&history, metric, today),
            weekly: weekly_numeric_stats(&history, metric, periods.weeks, today),
            monthly: monthly_stats(&history, metric, periods.months, today),
            all_time: absolute_stats(&history, metric),
        })
    }

    pub async fn binary(
        store: &dyn Store,
        user_id: &str,
        metric: BinaryMetric,
        periods: Periods,
        today: DateKey,
    ) -> Result<BinaryReport, ApiError> {
        let history = Self::history(store, user_id).await?;
        Ok(BinaryReport {
            metric,
            last_7_days: last_7_days(&history, Metric::from(metric), today),
            weekly: weekly_binary_stats(&history, metric, periods.weeks, today),
            monthly: monthly_binary_stats(&history, metric, periods.months, today),
        })
    }

    pub async fn water(
        store: &dyn Store,
        user_id: &str,
        periods: Periods,
        today: DateKey,
    ) -> Result<WaterReport, ApiError> {
        let history = Self::history(store, user_id).await?;
        Ok(WaterReport {
            last_7_days: last_7_days(&history, Metric::Water, today),
            weekly: weekly_water_stats(&history, periods.weeks, today),
            average: water_average(&history),
        })
    }

    pub async fn nutrition(
        store: &dyn Store,
        user_id: &str,
        periods: Periods,
        today: DateKey,
    ) -> Result<NutritionReport, ApiError> {
        let history = Self::history(store, user_id).await?;
        Ok(NutritionReport {
            last_7_days: last_7_days(&history, Metric::Nutrition, today),
            weekly: weekly_nutrition_stats(&history, periods.weeks, today),
            average: nutrition_average(&history),
        })
    }

    pub async fn sleep(
        store: &dyn Store,
        user_id: &str,
        periods: Periods,
        today: DateKey,
    ) -> Result<SleepReport, ApiError> {
        let history = Self::history(store, user_id).await?;
        let stats = sleep_stats(&history);
        let has_sleep = stats.total_days > 0;
        let avg_quality = has_sleep.then(|| sleep_quality(stats.avg_duration));
        Ok(SleepReport {
            last_7_days: last_7_days(&history, Metric::SleepDuration, today),
            weekly: weekly_numeric_stats(&history, Metric::SleepDuration, periods.weeks, today),
            avg_duration_label: format_sleep_duration(stats.avg_duration),
            avg_duration_hours: has_sleep.then(|| minutes_to_hours(stats.avg_duration)),
            avg_quality,
            stats,
        })
    }

    pub async fn all_time(store: &dyn Store, user_id: &str) -> Result<AllTimeStats, ApiError> {
        let profile = ProfileService::require(store, user_id).await?;
        let history = store.get_history(user_id).await?;
        let measurements = store.get_measurements(user_id).await?;
        Ok(all_time_stats(&history, &profile, &measurements))
    }
}
