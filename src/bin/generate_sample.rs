use anyhow::{Context, Result};

use kosis_preprocess::sample::generate_samples;
use kosis_preprocess::PipelineConfig;

/// Seed used unless `SAMPLE_SEED` is set.
const DEFAULT_SEED: u64 = 42;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let project_root = std::env::current_dir().context("resolving project root")?;
    let config = PipelineConfig::discover(&project_root)?;
    let data_dir = config.data_dir_in(&project_root);

    let seed = match std::env::var("SAMPLE_SEED") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("SAMPLE_SEED is not an integer: {raw}"))?,
        Err(_) => DEFAULT_SEED,
    };

    println!("[sample data]");
    println!("synthetic tables for testing without KOSIS downloads");

    let written = generate_samples(&data_dir, seed)
        .with_context(|| format!("writing samples to {}", data_dir.display()))?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(())
}
