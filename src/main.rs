use anyhow::{Context, Result};

use kosis_preprocess::pipeline;
use kosis_preprocess::PipelineConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let project_root = std::env::current_dir().context("resolving project root")?;
    let config = PipelineConfig::discover(&project_root)?;

    pipeline::run(&config, &project_root).context("preprocessing failed")?;
    Ok(())
}
