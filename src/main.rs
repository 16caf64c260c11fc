use anyhow::Context;
use early_warning::utils::{console, progress};
use early_warning::{
    BaselineComparisonPipeline, EventType, EventWindowPipeline, RunConfig, build_overview, loader,
    write_overview, write_results,
};
use log::info;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .context("usage: early-warning <run_config.json>")?;
    let run = RunConfig::from_file(Path::new(&config_path))
        .with_context(|| format!("reading run configuration {config_path}"))?;
    std::fs::create_dir_all(&run.output_dir)?;

    // Load the day-level observation table
    let spinner = progress::create_spinner(Some("loading observation table"));
    let observations = loader::load_observations(&run.observations_csv)?;
    spinner.finish_and_clear();
    console::print_table_head(&observations.table, 5);

    let transplant_dates = match &run.demographics_csv {
        Some(path) => Some(loader::load_transplant_dates(path)?),
        None => None,
    };

    // Event-centered comparisons, one run per configured event table
    let event_tables: [(&Option<PathBuf>, EventType); 2] = [
        (&run.infection_events_csv, EventType::Infection),
        (&run.outcome_events_csv, EventType::Outcome),
    ];
    for (path, event_type) in event_tables {
        let Some(path) = path else { continue };
        let loaded = loader::load_events(path, event_type, transplant_dates.as_ref())?;
        let pipeline = EventWindowPipeline::new(run.event.clone())?;
        let report = pipeline.run(&observations.table, &loaded.events)?;

        console::print_report(&format!("{event_type} events"), &report);
        let overview = build_overview(&report.results);
        console::print_overview(&overview);

        write_results(
            &run.output_dir.join(format!("{event_type}_comparisons.csv")),
            &report.results,
        )?;
        write_overview(
            &run.output_dir.join(format!("{event_type}_overview.csv")),
            &overview,
        )?;
    }

    // Caregiver-baseline comparison when linkage is configured
    if let (Some(baseline_config), Some(links_path)) = (&run.baseline, &run.caregiver_links_csv) {
        let caregivers = match &run.caregiver_observations_csv {
            Some(path) => loader::load_observations(path)?.table,
            // Caregivers may live in the same day-level table as patients
            None => observations.table.clone(),
        };
        let links = loader::load_caregiver_links(links_path)?;

        let pipeline = BaselineComparisonPipeline::new(baseline_config.clone())?;
        let report = pipeline.run(&observations.table, &caregivers, &links.links)?;

        console::print_report("caregiver baseline", &report);
        write_results(
            &run.output_dir.join("caregiver_baseline_comparisons.csv"),
            &report.results,
        )?;
    }

    info!("Run complete; outputs in {}", run.output_dir.display());
    Ok(())
}
