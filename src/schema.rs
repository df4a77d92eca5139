//! City schemas: which data file backs each city and which optional
//! demographic columns that file provides.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum City {
    Chicago,
    #[value(alias = "nyc")]
    NewYorkCity,
    Washington,
}

impl City {
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new-york-city" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(PipelineError::UnknownCity(s.trim().to_string())),
        }
    }
}

/// Declares where a city's trips live and which optional columns exist.
///
/// Downstream code keys demographic reporting off these flags rather than
/// probing the data for the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitySchema {
    pub city: City,
    pub data_file: &'static str,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// Returns the schema for a known city. Washington's dataset carries no
/// gender or birth-year columns.
pub fn resolve(city: City) -> CitySchema {
    match city {
        City::Chicago => CitySchema {
            city,
            data_file: "chicago.csv",
            has_gender: true,
            has_birth_year: true,
        },
        City::NewYorkCity => CitySchema {
            city,
            data_file: "new_york_city.csv",
            has_gender: true,
            has_birth_year: true,
        },
        City::Washington => CitySchema {
            city,
            data_file: "washington.csv",
            has_gender: false,
            has_birth_year: false,
        },
    }
}

/// Schema lookup for a free-text city name.
pub fn resolve_name(name: &str) -> Result<CitySchema, PipelineError> {
    Ok(resolve(name.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_washington_lacks_demographics() {
        let schema = resolve(City::Washington);
        assert!(!schema.has_gender);
        assert!(!schema.has_birth_year);
    }

    #[test]
    fn test_other_cities_have_demographics() {
        for city in [City::Chicago, City::NewYorkCity] {
            let schema = resolve(city);
            assert!(schema.has_gender);
            assert!(schema.has_birth_year);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("NEW YORK CITY".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("  washington ".parse::<City>().unwrap(), City::Washington);
    }

    #[test]
    fn test_unknown_city_is_rejected() {
        let err = resolve_name("boston").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCity(name) if name == "boston"));
    }

    #[test]
    fn test_data_files_match_city_names() {
        assert_eq!(resolve(City::Chicago).data_file, "chicago.csv");
        assert_eq!(resolve(City::NewYorkCity).data_file, "new_york_city.csv");
        assert_eq!(resolve(City::Washington).data_file, "washington.csv");
    }
}
