use {
    anyhow::Context,
    tracing::info,
    bigdata_reviews_core::{
        config::Config,
        normalizer::Normalizer,
    },
    crate::{
        data_loading::load_data_files,
        tokenization::run_tokenization_step,
        sentiment::SentimentStep,
        report::write_reports,
    },
};

mod data_loading;
mod progress;
mod report;
mod sentiment;
mod tokenization;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let warnings = utils::init_logging();

    info!("game reviews pmi sentiment workshop");

    let config = Config::load();

    // configuration errors are fatal and reported before any data is read
    let step = SentimentStep::new(&config).context("invalid scoring configuration")?;
    let normalizer = Normalizer::new(&config.input(), &config.normalizer());
    let input = config.input();

    let analysis = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let documents = load_data_files(&input)?;
        let sequences = run_tokenization_step(&documents, &normalizer);
        Ok(step.run(&sequences)?)
    }).await??;

    write_reports(&config.report().output_dir(), &analysis, &warnings.entries())?;

    Ok(())
}
