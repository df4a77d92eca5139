//! Filter selection and application.
//!
//! A [`FilterSpec`] is built once from validated input and passed by
//! reference to every component that needs it. Each variant carries exactly
//! the values its mode uses, so an inconsistent combination (a day filter
//! with a month value, a `Both` filter missing either value) cannot be
//! constructed.

use std::fmt;

use crate::derive::Trip;

/// The six months covered by the source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }

    /// Case-insensitive match against the full month name.
    pub fn parse(s: &str) -> Option<Month> {
        let s = s.trim();
        Self::ALL.into_iter().find(|m| m.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Case-insensitive match against the full weekday name.
    pub fn parse(s: &str) -> Option<Weekday> {
        let s = s.trim();
        Self::ALL.into_iter().find(|d| d.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A month selection for the single-month filter: a concrete month, or the
/// "all" sentinel which keeps the filter mode active but matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthChoice {
    All,
    Only(Month),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayChoice {
    All,
    Only(Weekday),
}

/// The active filter mode. `Both` takes concrete values only: there is no
/// "all" sentinel for the combined filter, so it always restricts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSpec {
    None,
    Month(MonthChoice),
    Day(DayChoice),
    Both { month: Month, day: Weekday },
}

impl FilterSpec {
    /// The month popularity stat is only reported when no month restriction
    /// is in play; under a month filter it would be trivially uniform.
    pub fn reports_month_stat(&self) -> bool {
        matches!(self, FilterSpec::None)
    }

    /// The weekday popularity stat is suppressed once a day restriction is
    /// active.
    pub fn reports_day_stat(&self) -> bool {
        matches!(self, FilterSpec::None | FilterSpec::Month(_))
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::None => f.write_str("no filter"),
            FilterSpec::Month(MonthChoice::All) => f.write_str("month = all"),
            FilterSpec::Month(MonthChoice::Only(m)) => write!(f, "month = {m}"),
            FilterSpec::Day(DayChoice::All) => f.write_str("day = all"),
            FilterSpec::Day(DayChoice::Only(d)) => write!(f, "day = {d}"),
            FilterSpec::Both { month, day } => write!(f, "month = {month}, day = {day}"),
        }
    }
}

/// Applies `spec` to `trips`, returning the matching subset as borrows in
/// original order. An empty result is valid.
pub fn apply<'a>(trips: &'a [Trip], spec: &FilterSpec) -> Vec<&'a Trip> {
    trips.iter().filter(|t| matches_spec(t, spec)).collect()
}

fn matches_spec(trip: &Trip, spec: &FilterSpec) -> bool {
    match spec {
        FilterSpec::None => true,
        FilterSpec::Month(MonthChoice::All) => true,
        FilterSpec::Month(MonthChoice::Only(month)) => month_matches(trip, *month),
        FilterSpec::Day(DayChoice::All) => true,
        FilterSpec::Day(DayChoice::Only(day)) => day_matches(trip, *day),
        FilterSpec::Both { month, day } => {
            month_matches(trip, *month) && day_matches(trip, *day)
        }
    }
}

fn month_matches(trip: &Trip, month: Month) -> bool {
    trip.month_name.eq_ignore_ascii_case(month.name())
}

fn day_matches(trip: &Trip, day: Weekday) -> bool {
    trip.weekday_name.eq_ignore_ascii_case(day.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::loader::RawTrip;

    fn raw(start_time: &str) -> RawTrip {
        RawTrip {
            start_time: start_time.to_string(),
            start_station: "A".to_string(),
            end_station: "B".to_string(),
            trip_duration: 60.0,
            user_type: Some("Subscriber".to_string()),
            gender: None,
            birth_year: None,
        }
    }

    // Jan 2 2017 = Monday, Jan 3 = Tuesday, Feb 6 = Monday, Jun 5 = Monday
    fn fixture() -> Vec<Trip> {
        derive(vec![
            raw("2017-01-02 08:00:00"),
            raw("2017-01-03 09:00:00"),
            raw("2017-02-06 10:00:00"),
            raw("2017-06-05 11:00:00"),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_filter_is_identity() {
        let trips = fixture();
        let subset = apply(&trips, &FilterSpec::None);

        assert_eq!(subset.len(), trips.len());
        for (kept, original) in subset.iter().zip(trips.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn test_all_sentinel_matches_everything() {
        let trips = fixture();

        assert_eq!(apply(&trips, &FilterSpec::Month(MonthChoice::All)).len(), 4);
        assert_eq!(apply(&trips, &FilterSpec::Day(DayChoice::All)).len(), 4);
    }

    #[test]
    fn test_month_filter_soundness_and_completeness() {
        let trips = fixture();
        let spec = FilterSpec::Month(MonthChoice::Only(Month::January));
        let subset = apply(&trips, &spec);

        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|t| t.month_name == "January"));

        let excluded = trips.len() - subset.len();
        let non_january = trips.iter().filter(|t| t.month_name != "January").count();
        assert_eq!(excluded, non_january);
    }

    #[test]
    fn test_day_filter() {
        let trips = fixture();
        let spec = FilterSpec::Day(DayChoice::Only(Weekday::Monday));
        let subset = apply(&trips, &spec);

        assert_eq!(subset.len(), 3);
        assert!(subset.iter().all(|t| t.weekday_name == "Monday"));
    }

    #[test]
    fn test_both_is_the_intersection_of_single_filters() {
        let trips = fixture();
        let both = apply(
            &trips,
            &FilterSpec::Both {
                month: Month::January,
                day: Weekday::Monday,
            },
        );

        let by_month = apply(&trips, &FilterSpec::Month(MonthChoice::Only(Month::January)));
        let by_day = apply(&trips, &FilterSpec::Day(DayChoice::Only(Weekday::Monday)));
        let intersection: Vec<_> = by_month
            .iter()
            .filter(|t| by_day.iter().any(|d| std::ptr::eq(**t, *d)))
            .collect();

        assert_eq!(both.len(), 1);
        assert_eq!(both.len(), intersection.len());
        assert_eq!(both[0].start_time, trips[0].start_time);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let trips = fixture();
        let spec = FilterSpec::Month(MonthChoice::Only(Month::April));

        assert!(apply(&trips, &spec).is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let trips = fixture();
        let spec = FilterSpec::Day(DayChoice::Only(Weekday::Monday));
        let subset = apply(&trips, &spec);

        let mut times: Vec<_> = subset.iter().map(|t| t.start_time).collect();
        times.sort();
        assert_eq!(times, subset.iter().map(|t| t.start_time).collect::<Vec<_>>());
    }

    #[test]
    fn test_month_parse_rejects_unsupported_names() {
        assert_eq!(Month::parse("july"), None);
        assert_eq!(Month::parse("jan"), None);
        assert_eq!(Month::parse("JUNE"), Some(Month::June));
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!(Weekday::parse(" monday "), Some(Weekday::Monday));
        assert_eq!(Weekday::parse("mon"), None);
    }

    #[test]
    fn test_stat_reporting_conditionals() {
        assert!(FilterSpec::None.reports_month_stat());
        assert!(FilterSpec::None.reports_day_stat());

        let month_all = FilterSpec::Month(MonthChoice::All);
        assert!(!month_all.reports_month_stat());
        assert!(month_all.reports_day_stat());

        let day = FilterSpec::Day(DayChoice::Only(Weekday::Friday));
        assert!(!day.reports_month_stat());
        assert!(!day.reports_day_stat());

        let both = FilterSpec::Both {
            month: Month::May,
            day: Weekday::Friday,
        };
        assert!(!both.reports_month_stat());
        assert!(!both.reports_day_stat());
    }
}
