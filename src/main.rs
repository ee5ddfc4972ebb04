use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use log::info;
use weather_survey::{
    load_city_locator, report_saved_table, OpenWeatherClient, SurveyError, WeatherSurvey,
};

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let run_date = args.run_date.unwrap_or_else(|| Utc::now().date_naive());

    match args.cmd {
        Command::Collect(ref collect) => {
            let api_key = collect
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or(SurveyError::MissingApiKey)?;

            let locator = load_city_locator(collect.gazetteer.as_deref(), &collect.gazetteer_url)
                .await
                .context("Failed to load the city gazetteer")?;
            info!("Gazetteer has {} cities", locator.len());

            let survey = WeatherSurvey::builder()
                .resolver(locator)
                .source(OpenWeatherClient::new(api_key))
                .output_dir(args.output_dir.clone())
                .build();
            let outcome = survey
                .run()
                .samples(collect.samples)
                .maybe_seed(collect.seed)
                .run_date(run_date)
                .render_plots(!args.no_plots)
                .call()
                .await?;

            info!(
                "{} of {} cities collected, table at {}",
                outcome.collection.observations.len(),
                outcome.cities.len(),
                outcome.table_path.display()
            );
            info!("Wrote {} report files", outcome.report.files.len());
        }
        Command::Report { ref table } => {
            let table_path = args.table_path(table.clone());
            let summary =
                report_saved_table(&table_path, &args.output_dir, run_date, !args.no_plots)
                    .with_context(|| format!("Failed to report on {}", table_path.display()))?;
            info!("Wrote {} report files", summary.files.len());
        }
    }

    Ok(())
}
