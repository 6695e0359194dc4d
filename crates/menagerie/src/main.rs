use anyhow::Context;
use menagerie::config::PipelineConfig;
use menagerie::reporting::render_report;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    menagerie::init_logging();

    let config = PipelineConfig::from_env()?;
    info!(
        format = %config.format,
        dir = %config.out_dir.display(),
        "Loading dataset"
    );

    let dataset = config
        .format
        .adapter()
        .import(&config.out_dir)
        .with_context(|| format!("Failed to import {} dataset", config.format))?;

    info!(
        persons = dataset.persons.len(),
        pets = dataset.pets.len(),
        occupations = dataset.occupations.len(),
        "Rendering charts"
    );
    let report = render_report(&dataset, &config.out_dir);

    let rendered = report.rendered().count();
    for (chart, err) in report.failures() {
        error!(chart = %chart, error = %err, "Chart not rendered");
    }
    info!(rendered, total = report.outcomes.len(), "Report finished");

    Ok(())
}
