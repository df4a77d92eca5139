//! The four statistic groups computed over a filtered trip subset.
//!
//! Every function here is a pure read of the same immutable subset, so the
//! groups may run in any order and repeated runs yield identical results.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::Serialize;

use crate::derive::Trip;
use crate::error::PipelineError;
use crate::filter::FilterSpec;
use crate::schema::CitySchema;

/// A value together with how many trips produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counted<T> {
    pub value: T,
    pub count: usize,
}

/// Most frequent value in `values`, with its count. Ties go to the value
/// seen earliest in iteration order.
fn mode<K>(
    values: impl IntoIterator<Item = K>,
    stat: &'static str,
) -> Result<(K, usize), PipelineError>
where
    K: Eq + Hash,
{
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();

    for (idx, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }

    counts
        .into_iter()
        // Higher count wins; on a tie the smaller first-seen index does.
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(value, (count, _))| (value, count))
        .ok_or(PipelineError::EmptyAggregation(stat))
}

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Absent when a month restriction is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular_month: Option<Counted<String>>,
    /// Absent when a day restriction is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular_day: Option<Counted<String>>,
    pub popular_hour: Counted<u32>,
}

pub fn time_stats(subset: &[&Trip], spec: &FilterSpec) -> Result<TimeStats, PipelineError> {
    let popular_month = if spec.reports_month_stat() {
        let (name, count) = mode(subset.iter().map(|t| t.month_name.as_str()), "popular month")?;
        Some(Counted {
            value: name.to_string(),
            count,
        })
    } else {
        None
    };

    let popular_day = if spec.reports_day_stat() {
        let (name, count) = mode(subset.iter().map(|t| t.weekday_name.as_str()), "popular day")?;
        Some(Counted {
            value: name.to_string(),
            count,
        })
    } else {
        None
    };

    let (hour, count) = mode(subset.iter().map(|t| t.hour), "popular hour")?;

    Ok(TimeStats {
        popular_month,
        popular_day,
        popular_hour: Counted { value: hour, count },
    })
}

/// The most travelled start/end combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCount {
    pub start: String,
    pub end: String,
    pub count: usize,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub popular_start: Counted<String>,
    pub popular_end: Counted<String>,
    pub popular_route: RouteCount,
}

pub fn station_stats(subset: &[&Trip]) -> Result<StationStats, PipelineError> {
    let (start, start_count) = mode(
        subset.iter().map(|t| t.start_station.as_str()),
        "popular start station",
    )?;
    let (end, end_count) = mode(
        subset.iter().map(|t| t.end_station.as_str()),
        "popular end station",
    )?;
    let ((route_start, route_end), route_count) =
        mode(subset.iter().map(|t| t.route()), "popular trip")?;

    Ok(StationStats {
        popular_start: Counted {
            value: start.to_string(),
            count: start_count,
        },
        popular_end: Counted {
            value: end.to_string(),
            count: end_count,
        },
        popular_route: RouteCount {
            start: route_start.to_string(),
            end: route_end.to_string(),
            count: route_count,
        },
    })
}

/// Total and average trip duration, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
}

pub fn duration_stats(subset: &[&Trip]) -> Result<DurationStats, PipelineError> {
    if subset.is_empty() {
        return Err(PipelineError::EmptyAggregation("trip duration"));
    }

    let total: f64 = subset.iter().map(|t| t.duration_secs).sum();

    Ok(DurationStats {
        total_seconds: total,
        mean_seconds: total / subset.len() as f64,
    })
}

/// Earliest, most recent, and most common rider birth year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider demographics. Gender and birth-year fields exist only for cities
/// whose schema declares those columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genders: Option<BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_years: Option<BirthYearStats>,
}

pub fn user_stats(subset: &[&Trip], schema: &CitySchema) -> Result<UserStats, PipelineError> {
    let mut user_types: BTreeMap<String, usize> = BTreeMap::new();
    for trip in subset {
        if let Some(user_type) = &trip.user_type {
            *user_types.entry(user_type.clone()).or_insert(0) += 1;
        }
    }

    let genders = if schema.has_gender {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for trip in subset {
            if let Some(gender) = &trip.gender {
                *counts.entry(gender.clone()).or_insert(0) += 1;
            }
        }
        Some(counts)
    } else {
        None
    };

    let birth_years = if schema.has_birth_year {
        let years: Vec<i32> = subset.iter().filter_map(|t| t.birth_year).collect();
        let (most_common, _) = mode(years.iter().copied(), "birth year")?;

        Some(BirthYearStats {
            earliest: years.iter().copied().fold(most_common, i32::min),
            most_recent: years.iter().copied().fold(most_common, i32::max),
            most_common,
        })
    } else {
        None
    };

    Ok(UserStats {
        user_types,
        genders,
        birth_years,
    })
}

/// Every statistic group for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub city: String,
    pub filter: String,
    pub trip_count: usize,
    pub times: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl Report {
    /// Computes all four groups over the same immutable subset.
    pub fn compute(
        subset: &[&Trip],
        spec: &FilterSpec,
        schema: &CitySchema,
    ) -> Result<Report, PipelineError> {
        Ok(Report {
            city: schema.city.to_string(),
            filter: spec.to_string(),
            trip_count: subset.len(),
            times: time_stats(subset, spec)?,
            stations: station_stats(subset)?,
            durations: duration_stats(subset)?,
            users: user_stats(subset, schema)?,
        })
    }
}
