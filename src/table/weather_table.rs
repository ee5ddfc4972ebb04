//! The row-oriented table of collected observations and its CSV persistence.

use crate::table::error::TableError;
use crate::types::hemisphere::Hemisphere;
use crate::types::observation::WeatherObservation;
use crate::types::weather_variable::*;
use log::info;
use polars::prelude::*;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// File name of the persisted table inside the output directory.
pub const TABLE_FILE_NAME: &str = "cities.csv";

/// Collected observations backed by a Polars `DataFrame`.
///
/// Column order and names follow [`TABLE_COLUMNS`]; the first column,
/// `City_ID`, is the zero-based row position assigned when the table was
/// built. Filtering (see [`WeatherTable::hemisphere`]) keeps the original ids.
#[derive(Debug, Clone)]
pub struct WeatherTable {
    frame: DataFrame,
}

impl WeatherTable {
    /// Builds a table from observations, numbering rows by position.
    pub fn from_observations(observations: &[WeatherObservation]) -> Result<Self, TableError> {
        let ids: Vec<i64> = (0..observations.len() as i64).collect();
        let frame = df!(
            COL_CITY_ID => ids,
            COL_CITY => observations.iter().map(|o| o.city.clone()).collect::<Vec<_>>(),
            COL_LAT => observations.iter().map(|o| o.latitude).collect::<Vec<_>>(),
            COL_LNG => observations.iter().map(|o| o.longitude).collect::<Vec<_>>(),
            COL_MAX_TEMP => observations.iter().map(|o| o.max_temp).collect::<Vec<_>>(),
            COL_HUMIDITY => observations.iter().map(|o| o.humidity).collect::<Vec<_>>(),
            COL_CLOUDINESS => observations.iter().map(|o| o.cloudiness).collect::<Vec<_>>(),
            COL_WIND_SPEED => observations.iter().map(|o| o.wind_speed).collect::<Vec<_>>(),
            COL_COUNTRY => observations.iter().map(|o| o.country.clone()).collect::<Vec<_>>(),
            COL_DATE => observations.iter().map(|o| o.date).collect::<Vec<_>>(),
        )?;
        Ok(Self { frame })
    }

    /// Wraps an existing frame, checking for the expected columns and casting
    /// them to their canonical types. A null country becomes an empty string;
    /// a value that does not parse as its column's type is an error.
    pub fn from_frame(frame: DataFrame) -> Result<Self, TableError> {
        for name in TABLE_COLUMNS {
            frame
                .column(name)
                .map_err(|e| TableError::ColumnNotFound(name.to_string(), e))?;
        }

        let frame = frame
            .lazy()
            .select([
                col(COL_CITY_ID).strict_cast(DataType::Int64),
                col(COL_CITY).cast(DataType::String),
                col(COL_LAT).strict_cast(DataType::Float64),
                col(COL_LNG).strict_cast(DataType::Float64),
                col(COL_MAX_TEMP).strict_cast(DataType::Float64),
                col(COL_HUMIDITY).strict_cast(DataType::Int64),
                col(COL_CLOUDINESS).strict_cast(DataType::Int64),
                col(COL_WIND_SPEED).strict_cast(DataType::Float64),
                col(COL_COUNTRY).cast(DataType::String).fill_null(lit("")),
                col(COL_DATE).strict_cast(DataType::Int64),
            ])
            .collect()?;
        Ok(Self { frame })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Writes the table as CSV with a header row, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| TableError::OutputDirCreation(parent.to_path_buf(), e))?;
        }
        let mut file =
            File::create(path).map_err(|e| TableError::CsvWriteIo(path.to_path_buf(), e))?;
        let mut frame = self.frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .map_err(|e| TableError::CsvWritePolars(path.to_path_buf(), e))?;
        info!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads a table previously written by [`WeatherTable::save`].
    ///
    /// Every field is read as text and then cast per column, so names such
    /// as `007` or `1e3` keep their exact spelling.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let csv_error = |e| TableError::CsvRead(path.to_path_buf(), e);
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(csv_error)?
            .finish()
            .map_err(csv_error)?;
        let table = Self::from_frame(frame)?;
        info!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Rows of one hemisphere, in table order and with their original ids.
    pub fn hemisphere(&self, hemisphere: Hemisphere) -> Result<WeatherTable, TableError> {
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(hemisphere.predicate())
            .collect()?;
        Ok(Self { frame })
    }

    pub fn ids(&self) -> Result<Vec<i64>, TableError> {
        let ids = self.column(COL_CITY_ID)?.i64()?;
        ids.into_iter()
            .enumerate()
            .map(|(row, id)| required(id, COL_CITY_ID, row))
            .collect()
    }

    /// Latitude and `variable` for every row where both are present.
    pub fn latitude_pairs(
        &self,
        variable: WeatherVariable,
    ) -> Result<(Vec<f64>, Vec<f64>), TableError> {
        let latitudes = self.column(COL_LAT)?.cast(&DataType::Float64)?;
        let values = self.column(variable.column())?.cast(&DataType::Float64)?;

        Ok(latitudes
            .f64()?
            .into_iter()
            .zip(values.f64()?)
            .filter_map(|(lat, value)| Some((lat?, value?)))
            .unzip())
    }

    /// Converts the table back into observations, in row order.
    pub fn rows(&self) -> Result<Vec<WeatherObservation>, TableError> {
        let cities = self.column(COL_CITY)?.str()?;
        let latitudes = self.column(COL_LAT)?.f64()?;
        let longitudes = self.column(COL_LNG)?.f64()?;
        let max_temps = self.column(COL_MAX_TEMP)?.f64()?;
        let humidities = self.column(COL_HUMIDITY)?.i64()?;
        let cloudiness = self.column(COL_CLOUDINESS)?.i64()?;
        let wind_speeds = self.column(COL_WIND_SPEED)?.f64()?;
        let countries = self.column(COL_COUNTRY)?.str()?;
        let dates = self.column(COL_DATE)?.i64()?;

        (0..self.len())
            .map(|row| {
                Ok(WeatherObservation {
                    city: required(cities.get(row), COL_CITY, row)?.to_string(),
                    latitude: required(latitudes.get(row), COL_LAT, row)?,
                    longitude: required(longitudes.get(row), COL_LNG, row)?,
                    max_temp: required(max_temps.get(row), COL_MAX_TEMP, row)?,
                    humidity: required(humidities.get(row), COL_HUMIDITY, row)?,
                    cloudiness: required(cloudiness.get(row), COL_CLOUDINESS, row)?,
                    wind_speed: required(wind_speeds.get(row), COL_WIND_SPEED, row)?,
                    country: countries.get(row).unwrap_or_default().to_string(),
                    date: required(dates.get(row), COL_DATE, row)?,
                })
            })
            .collect()
    }

    fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.frame
            .column(name)
            .map_err(|e| TableError::ColumnNotFound(name.to_string(), e))
    }
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T, TableError> {
    value.ok_or_else(|| TableError::UnexpectedNull {
        column: column.to_string(),
        row,
    })
}

impl fmt::Display for WeatherTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}
