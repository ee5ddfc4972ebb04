use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use weather_survey::{DEFAULT_GAZETTEER_URL, DEFAULT_OUTPUT_DIR, DEFAULT_SAMPLE_COUNT, TABLE_FILE_NAME};

#[derive(Debug, Parser)]
#[command(about = "Survey the current weather of random cities and regress it against latitude.")]
pub struct Cli {
    /// Directory for the city table, plots and regression summary
    #[arg(env = "WEATHER_SURVEY_OUTPUT_DIR", short, long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
    /// Date shown in plot titles (defaults to today, UTC)
    #[arg(long, global = true)]
    pub run_date: Option<NaiveDate>,
    /// Only write the regression summary, skip the HTML plots
    #[arg(long, global = true)]
    pub no_plots: bool,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sample coordinates, collect weather for the nearest cities, then report
    Collect(CollectArgs),
    /// Re-run the reporter on a previously saved table
    Report {
        /// Table to load (defaults to <output-dir>/cities.csv)
        #[arg(long)]
        table: Option<PathBuf>,
    },
}

#[derive(Debug, Parser)]
pub struct CollectArgs {
    #[arg(env = "OPENWEATHER_API_KEY", long, hide_env_values = true)]
    pub api_key: Option<String>,
    /// Number of random coordinates to draw
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub samples: usize,
    /// Seed for reproducible coordinates
    #[arg(long)]
    pub seed: Option<u64>,
    /// Local world-cities CSV (country, city, lat, lng); skips the download
    #[arg(long)]
    pub gazetteer: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_GAZETTEER_URL)]
    pub gazetteer_url: String,
}

impl Cli {
    pub fn table_path(&self, table: Option<PathBuf>) -> PathBuf {
        table.unwrap_or_else(|| self.output_dir.join(TABLE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "weather_survey",
            "collect",
            "--no-plots",
            "--run-date",
            "2022-10-18",
            "--samples",
            "20",
        ])
        .unwrap();

        assert!(cli.no_plots);
        assert_eq!(cli.run_date, NaiveDate::from_ymd_opt(2022, 10, 18));
        assert!(matches!(cli.cmd, Command::Collect(CollectArgs { samples: 20, .. })));
    }

    #[test]
    fn test_shared_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["weather_survey", "--no-plots", "report"]).unwrap();
        assert!(cli.no_plots);
        assert!(matches!(cli.cmd, Command::Report { table: None }));
    }

    #[test]
    fn test_report_table_path() {
        let cli = Cli::try_parse_from([
            "weather_survey",
            "report",
            "--output-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.table_path(None), PathBuf::from("out").join(TABLE_FILE_NAME));
        assert_eq!(
            cli.table_path(Some(PathBuf::from("old.csv"))),
            PathBuf::from("old.csv")
        );
    }
}
