use anyhow::Result;
use freeview_experiment::ExperimentConfig;

mod app;
mod gateway;
mod sim;

use app::App;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let participant_id = args.next().unwrap_or_else(|| "demo".to_string());
    let config = match args.next() {
        Some(path) => ExperimentConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => demo_config(),
    };

    App::new(participant_id, config)?.run()
}

// The study defaults run 15 s per trial; the simulated session compresses
// the timings so a full 20-trial run finishes in a few seconds.
fn demo_config() -> ExperimentConfig {
    ExperimentConfig {
        image_viewing_time: 150,
        fixation_duration: 50,
        inter_trial_interval: 25,
        ..ExperimentConfig::default()
    }
}
