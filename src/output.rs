//! Rendering of computed statistics.
//!
//! The human-readable report implements [`std::fmt::Display`]; JSON output
//! goes through serde. Both write the same [`Report`].

use std::fmt;

use anyhow::Result;

use crate::stats::Report;

const RULE: &str = "----------------------------------------";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "{} trips for {} ({})",
            self.trip_count, self.city, self.filter
        )?;

        writeln!(f, "{RULE}")?;
        writeln!(f, "Most Frequent Times of Travel")?;
        if let Some(month) = &self.times.popular_month {
            writeln!(
                f,
                "  Most common month is: {} ({} trips)",
                month.value, month.count
            )?;
        }
        if let Some(day) = &self.times.popular_day {
            writeln!(
                f,
                "  Most common day is: {} ({} trips)",
                day.value, day.count
            )?;
        }
        writeln!(
            f,
            "  Most common hour is: {} ({} trips)",
            self.times.popular_hour.value, self.times.popular_hour.count
        )?;

        writeln!(f, "{RULE}")?;
        writeln!(f, "Most Popular Stations and Trip")?;
        writeln!(
            f,
            "  Most common start station is: {} ({} trips)",
            self.stations.popular_start.value, self.stations.popular_start.count
        )?;
        writeln!(
            f,
            "  Most common end station is: {} ({} trips)",
            self.stations.popular_end.value, self.stations.popular_end.count
        )?;
        let route = &self.stations.popular_route;
        writeln!(
            f,
            "  Most common trip is {} to {}; taken {} times",
            route.start, route.end, route.count
        )?;

        writeln!(f, "{RULE}")?;
        writeln!(f, "Trip Duration")?;
        writeln!(
            f,
            "  Total travel time: {:.0} seconds",
            self.durations.total_seconds
        )?;
        writeln!(
            f,
            "  Mean travel time: {:.1} seconds",
            self.durations.mean_seconds
        )?;

        writeln!(f, "{RULE}")?;
        writeln!(f, "User Stats")?;
        writeln!(f, "  User counts:")?;
        for (user_type, count) in &self.users.user_types {
            writeln!(f, "    {user_type} - {count}")?;
        }
        if let Some(genders) = &self.users.genders {
            writeln!(f, "  Gender counts:")?;
            for (gender, count) in genders {
                writeln!(f, "    {gender} - {count}")?;
            }
        }
        if let Some(years) = &self.users.birth_years {
            writeln!(f, "  Earliest birth year: {}", years.earliest)?;
            writeln!(f, "  Most recent birth year: {}", years.most_recent)?;
            writeln!(f, "  Most common birth year: {}", years.most_common)?;
        }
        write!(f, "{RULE}")
    }
}

/// Prints the report as pretty JSON to stdout.
pub fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
