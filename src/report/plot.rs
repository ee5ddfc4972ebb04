use crate::report::regression::LinearFit;
use crate::types::hemisphere::Hemisphere;
use crate::types::weather_variable::{WeatherVariable, COL_LAT};
use chrono::NaiveDate;
use plotlars::{Axis, Legend, Plot, Rgb, ScatterPlot, Shape, Text};
use polars::prelude::*;
use std::path::Path;

const SERIES_COLUMN: &str = "Series";
const OBSERVED_SERIES: &str = "Observed";
// Points used to draw the fitted line.
const FIT_LINE_POINTS: usize = 100;

/// Writes a scatter plot of `values` against latitude as a standalone HTML page.
pub fn write_latitude_scatter(
    path: &Path,
    variable: WeatherVariable,
    latitudes: &[f64],
    values: &[f64],
    run_date: NaiveDate,
) -> PolarsResult<()> {
    let data = df!(
        COL_LAT => latitudes,
        variable.column() => values,
    )?;

    ScatterPlot::builder()
        .data(&data)
        .x(COL_LAT)
        .y(variable.column())
        .opacity(0.8)
        .size(8)
        .colors(vec![Rgb(31, 119, 180)])
        .shapes(vec![Shape::Circle])
        .plot_title(
            Text::from(format!(
                "City Latitude vs {} ({})",
                variable.column(),
                run_date.format("%Y-%m-%d")
            ))
            .size(18),
        )
        .x_title("Latitude")
        .y_title(variable.axis_label())
        .x_axis(&Axis::new().show_grid(true))
        .y_axis(&Axis::new().show_grid(true))
        .build()
        .write_html(path.to_string_lossy().into_owned());

    Ok(())
}

/// Writes the hemisphere scatter plot with its fitted line. The line's legend
/// entry is the fitted equation, the title carries r².
pub fn write_regression_plot(
    path: &Path,
    hemisphere: Hemisphere,
    variable: WeatherVariable,
    latitudes: &[f64],
    values: &[f64],
    fit: &LinearFit,
) -> PolarsResult<()> {
    let equation = fit.equation();
    let line_x = line_points(latitudes);
    let line_y = fit.fitted(&line_x);

    let mut x = latitudes.to_vec();
    x.extend_from_slice(&line_x);
    let mut y = values.to_vec();
    y.extend_from_slice(&line_y);
    let series: Vec<&str> = std::iter::repeat(OBSERVED_SERIES)
        .take(latitudes.len())
        .chain(std::iter::repeat(equation.as_str()).take(line_x.len()))
        .collect();

    let data = df!(
        COL_LAT => x,
        variable.column() => y,
        SERIES_COLUMN => series,
    )?;

    ScatterPlot::builder()
        .data(&data)
        .x(COL_LAT)
        .y(variable.column())
        .group(SERIES_COLUMN)
        .opacity(0.8)
        .size(8)
        .colors(vec![Rgb(31, 119, 180), Rgb(220, 20, 60)])
        .shapes(vec![Shape::Circle, Shape::Circle])
        .plot_title(
            Text::from(format!(
                "{}: {} vs Latitude (r² = {:.3})",
                hemisphere.title(),
                variable.column(),
                fit.r_squared()
            ))
            .size(18),
        )
        .x_title("Latitude")
        .y_title(variable.axis_label())
        .legend(&Legend::new().x(0.05).y(0.95))
        .build()
        .write_html(path.to_string_lossy().into_owned());

    Ok(())
}

/// Evenly spaced x values spanning the data, for drawing a fitted line.
fn line_points(xs: &[f64]) -> Vec<f64> {
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let step = (max - min) / (FIT_LINE_POINTS - 1) as f64;
    (0..FIT_LINE_POINTS)
        .map(|i| min + step * i as f64)
        .collect()
}
