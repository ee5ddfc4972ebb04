use crate::report::error::ReportError;
use crate::report::plot::{write_latitude_scatter, write_regression_plot};
use crate::report::regression::{linear_regression, LinearFit, RegressionError};
use crate::table::error::TableError;
use crate::table::weather_table::WeatherTable;
use crate::types::hemisphere::Hemisphere;
use crate::types::weather_variable::WeatherVariable;
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const REGRESSION_SUMMARY_FILE_NAME: &str = "regressions.csv";

/// A regression of one variable against latitude within one hemisphere.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereRegression {
    pub hemisphere: Hemisphere,
    pub variable: WeatherVariable,
    pub outcome: Result<LinearFit, RegressionError>,
}

/// Everything one reporting pass produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    /// Files written, in the order they were written.
    pub files: Vec<PathBuf>,
    pub regressions: Vec<HemisphereRegression>,
}

impl ReportSummary {
    pub fn fits(&self) -> impl Iterator<Item = (Hemisphere, WeatherVariable, &LinearFit)> {
        self.regressions
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok().map(|fit| (r.hemisphere, r.variable, fit)))
    }

    pub fn skipped(&self) -> impl Iterator<Item = (Hemisphere, WeatherVariable, &RegressionError)> {
        self.regressions
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.hemisphere, r.variable, e)))
    }
}

/// Fits every weather variable against latitude, separately per hemisphere.
///
/// Subsets that cannot be fitted (fewer than two rows, or a single latitude)
/// yield an `Err` outcome instead of failing the whole pass.
pub fn hemisphere_regressions(
    table: &WeatherTable,
) -> Result<Vec<HemisphereRegression>, TableError> {
    let mut regressions = Vec::with_capacity(Hemisphere::ALL.len() * WeatherVariable::ALL.len());
    for hemisphere in Hemisphere::ALL {
        let subset = table.hemisphere(hemisphere)?;
        for variable in WeatherVariable::ALL {
            let (latitudes, values) = subset.latitude_pairs(variable)?;
            regressions.push(HemisphereRegression {
                hemisphere,
                variable,
                outcome: linear_regression(&latitudes, &values),
            });
        }
    }
    Ok(regressions)
}

/// Renders latitude scatter plots and hemisphere regressions into a directory.
#[derive(Debug, Clone)]
pub struct Reporter {
    output_dir: PathBuf,
    run_date: NaiveDate,
    render_plots: bool,
}

impl Reporter {
    pub fn new(output_dir: impl Into<PathBuf>, run_date: NaiveDate) -> Self {
        Self {
            output_dir: output_dir.into(),
            run_date,
            render_plots: true,
        }
    }

    /// Skips the HTML plots and only computes and writes the regression summary.
    pub fn without_plots(mut self) -> Self {
        self.render_plots = false;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Runs the full reporting pass. An empty table is a no-op.
    pub fn report(&self, table: &WeatherTable) -> Result<ReportSummary, ReportError> {
        if table.is_empty() {
            info!("Table is empty, nothing to plot or regress");
            return Ok(ReportSummary::default());
        }

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ReportError::OutputDirCreation(self.output_dir.clone(), e))?;

        let mut summary = ReportSummary::default();

        if self.render_plots {
            for variable in WeatherVariable::ALL {
                let (latitudes, values) = table.latitude_pairs(variable)?;
                let path = self
                    .output_dir
                    .join(format!("Fig{}.html", variable.figure_number()));
                write_latitude_scatter(&path, variable, &latitudes, &values, self.run_date)
                    .map_err(|e| ReportError::PlotRender(path.clone(), e))?;
                summary.files.push(path);
            }
        }

        summary.regressions = hemisphere_regressions(table)?;

        for regression in &summary.regressions {
            match &regression.outcome {
                Ok(fit) => {
                    info!(
                        "{} {}: {} (n = {}), r² = {:.4}, p = {:.3e}",
                        regression.hemisphere.title(),
                        regression.variable,
                        fit.equation(),
                        fit.n,
                        fit.r_squared(),
                        fit.p_value
                    );
                    println!(
                        "{} {} vs Latitude, the r-squared is: {}",
                        regression.hemisphere.title(),
                        regression.variable,
                        fit.r_squared()
                    );
                    if self.render_plots {
                        let path = self.render_regression(table, regression, fit)?;
                        summary.files.push(path);
                    }
                }
                Err(e) => warn!(
                    "Skipping {} {} regression: {}",
                    regression.hemisphere.title(),
                    regression.variable,
                    e
                ),
            }
        }

        let summary_path = self.output_dir.join(REGRESSION_SUMMARY_FILE_NAME);
        write_regression_summary(&summary_path, &summary.regressions)?;
        summary.files.push(summary_path);

        Ok(summary)
    }

    fn render_regression(
        &self,
        table: &WeatherTable,
        regression: &HemisphereRegression,
        fit: &LinearFit,
    ) -> Result<PathBuf, ReportError> {
        let (latitudes, values) = table
            .hemisphere(regression.hemisphere)?
            .latitude_pairs(regression.variable)?;
        let path = self.output_dir.join(format!(
            "{}_{}_regression.html",
            regression.hemisphere.slug(),
            regression.variable.slug()
        ));
        write_regression_plot(
            &path,
            regression.hemisphere,
            regression.variable,
            &latitudes,
            &values,
            fit,
        )
        .map_err(|e| ReportError::PlotRender(path.clone(), e))?;
        Ok(path)
    }
}

/// Writes one CSV row per successful fit.
pub fn write_regression_summary(
    path: &Path,
    regressions: &[HemisphereRegression],
) -> Result<(), ReportError> {
    let fits: Vec<_> = regressions
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|fit| (r, fit)))
        .collect();

    let mut frame = df!(
        "Hemisphere" => fits.iter().map(|(r, _)| r.hemisphere.slug()).collect::<Vec<_>>(),
        "Variable" => fits.iter().map(|(r, _)| r.variable.column()).collect::<Vec<_>>(),
        "N" => fits.iter().map(|(_, f)| f.n as i64).collect::<Vec<_>>(),
        "Slope" => fits.iter().map(|(_, f)| f.slope).collect::<Vec<_>>(),
        "Intercept" => fits.iter().map(|(_, f)| f.intercept).collect::<Vec<_>>(),
        "R" => fits.iter().map(|(_, f)| f.r_value).collect::<Vec<_>>(),
        "R Squared" => fits.iter().map(|(_, f)| f.r_squared()).collect::<Vec<_>>(),
        "P Value" => fits.iter().map(|(_, f)| f.p_value).collect::<Vec<_>>(),
        "Std Err" => fits.iter().map(|(_, f)| f.std_err).collect::<Vec<_>>(),
        "Intercept Std Err" => fits.iter().map(|(_, f)| f.intercept_std_err).collect::<Vec<_>>(),
        "Equation" => fits.iter().map(|(_, f)| f.equation()).collect::<Vec<_>>(),
    )?;

    let mut file = File::create(path).map_err(|e| ReportError::WriteIo(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| ReportError::WritePolars(path.to_path_buf(), e))?;
    Ok(())
}
