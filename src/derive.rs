//! Time features derived from each trip's start timestamp.

use chrono::{NaiveDateTime, Timelike};

use crate::error::PipelineError;
use crate::loader::RawTrip;

const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A trip after feature derivation. Month and weekday names are full
/// English names; hour is the 0-23 component of the start time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub duration_secs: f64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    pub month_name: String,
    pub weekday_name: String,
    pub hour: u32,
}

impl Trip {
    /// The start/end pair used as the group-by key for route popularity.
    /// A structured pair, so station names may contain any characters.
    pub fn route(&self) -> (&str, &str) {
        (self.start_station.as_str(), self.end_station.as_str())
    }
}

/// Attaches derived fields to every row, consuming the raw rows.
///
/// # Errors
///
/// A row with an unparseable start timestamp fails the whole load with
/// [`PipelineError::MalformedRecord`] carrying the 1-based record number.
pub fn derive(raws: Vec<RawTrip>) -> Result<Vec<Trip>, PipelineError> {
    let mut trips = Vec::with_capacity(raws.len());

    for (idx, raw) in raws.into_iter().enumerate() {
        let start_time = NaiveDateTime::parse_from_str(&raw.start_time, START_TIME_FORMAT)
            .map_err(|_| PipelineError::MalformedRecord {
                record: idx + 1,
                value: raw.start_time.clone(),
            })?;

        trips.push(Trip {
            month_name: start_time.format("%B").to_string(),
            weekday_name: start_time.format("%A").to_string(),
            hour: start_time.hour(),
            start_time,
            start_station: raw.start_station,
            end_station: raw.end_station,
            duration_secs: raw.trip_duration,
            user_type: raw.user_type,
            gender: raw.gender,
            birth_year: raw.birth_year.map(|y| y as i32),
        });
    }

    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start_time: &str) -> RawTrip {
        RawTrip {
            start_time: start_time.to_string(),
            start_station: "State St".to_string(),
            end_station: "Lake Ave".to_string(),
            trip_duration: 321.0,
            user_type: Some("Subscriber".to_string()),
            gender: Some("Female".to_string()),
            birth_year: Some(1992.0),
        }
    }

    #[test]
    fn test_derive_time_features() {
        // 2017-01-02 was a Monday
        let trips = derive(vec![raw("2017-01-02 08:05:36")]).unwrap();

        assert_eq!(trips[0].month_name, "January");
        assert_eq!(trips[0].weekday_name, "Monday");
        assert_eq!(trips[0].hour, 8);
        assert_eq!(trips[0].birth_year, Some(1992));
    }

    #[test]
    fn test_derive_late_evening_hour() {
        let trips = derive(vec![raw("2017-06-15 23:59:59")]).unwrap();

        assert_eq!(trips[0].month_name, "June");
        assert_eq!(trips[0].weekday_name, "Thursday");
        assert_eq!(trips[0].hour, 23);
    }

    #[test]
    fn test_malformed_timestamp_aborts_load() {
        let rows = vec![raw("2017-01-02 08:05:36"), raw("not a timestamp")];
        let err = derive(rows).unwrap_err();

        match err {
            PipelineError::MalformedRecord { record, value } => {
                assert_eq!(record, 2);
                assert_eq!(value, "not a timestamp");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_route_is_a_structured_pair() {
        // A station name containing the old "--" join separator must not
        // confuse the pair key.
        let mut row = raw("2017-03-01 12:00:00");
        row.start_station = "Canal--North".to_string();
        let trips = derive(vec![row]).unwrap();

        assert_eq!(trips[0].route(), ("Canal--North", "Lake Ave"));
    }
}
