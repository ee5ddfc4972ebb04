//! Names for the table columns and the weather variables plotted against latitude.

use std::fmt;

pub const COL_CITY_ID: &str = "City_ID";
pub const COL_CITY: &str = "City";
pub const COL_LAT: &str = "Lat";
pub const COL_LNG: &str = "Lng";
pub const COL_MAX_TEMP: &str = "Max Temp";
pub const COL_HUMIDITY: &str = "Humidity";
pub const COL_CLOUDINESS: &str = "Cloudiness";
pub const COL_WIND_SPEED: &str = "Wind Speed";
pub const COL_COUNTRY: &str = "Country";
pub const COL_DATE: &str = "Date";

/// Column order of the persisted table, identifier first.
pub const TABLE_COLUMNS: [&str; 10] = [
    COL_CITY_ID,
    COL_CITY,
    COL_LAT,
    COL_LNG,
    COL_MAX_TEMP,
    COL_HUMIDITY,
    COL_CLOUDINESS,
    COL_WIND_SPEED,
    COL_COUNTRY,
    COL_DATE,
];

/// A weather variable that gets plotted and regressed against latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeatherVariable {
    /// Daily maximum temperature, degrees Celsius.
    MaxTemp,
    /// Relative humidity, percent.
    Humidity,
    /// Cloud cover, percent.
    Cloudiness,
    /// Wind speed, metres per second.
    WindSpeed,
}

impl WeatherVariable {
    /// Every variable, in the order the figures are numbered.
    pub const ALL: [WeatherVariable; 4] = [
        WeatherVariable::MaxTemp,
        WeatherVariable::Humidity,
        WeatherVariable::Cloudiness,
        WeatherVariable::WindSpeed,
    ];

    /// Name of the table column holding this variable.
    pub fn column(&self) -> &'static str {
        match self {
            WeatherVariable::MaxTemp => COL_MAX_TEMP,
            WeatherVariable::Humidity => COL_HUMIDITY,
            WeatherVariable::Cloudiness => COL_CLOUDINESS,
            WeatherVariable::WindSpeed => COL_WIND_SPEED,
        }
    }

    /// Axis label including the unit.
    pub fn axis_label(&self) -> &'static str {
        match self {
            WeatherVariable::MaxTemp => "Max Temperature (C)",
            WeatherVariable::Humidity => "Humidity (%)",
            WeatherVariable::Cloudiness => "Cloudiness (%)",
            WeatherVariable::WindSpeed => "Wind Speed (m/s)",
        }
    }

    /// Short identifier used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            WeatherVariable::MaxTemp => "max_temp",
            WeatherVariable::Humidity => "humidity",
            WeatherVariable::Cloudiness => "cloudiness",
            WeatherVariable::WindSpeed => "wind_speed",
        }
    }

    /// One-based figure number of the latitude scatter plot.
    pub fn figure_number(&self) -> usize {
        match self {
            WeatherVariable::MaxTemp => 1,
            WeatherVariable::Humidity => 2,
            WeatherVariable::Cloudiness => 3,
            WeatherVariable::WindSpeed => 4,
        }
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_map_to_distinct_table_columns() {
        let columns: Vec<_> = WeatherVariable::ALL.iter().map(|v| v.column()).collect();
        for column in &columns {
            assert!(TABLE_COLUMNS.contains(column));
        }
        let numbers: Vec<_> = WeatherVariable::ALL
            .iter()
            .map(|v| v.figure_number())
            .collect();
        assert_eq!(numbers, [1, 2, 3, 4]);
    }
}
