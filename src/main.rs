use anyhow::{Context, anyhow};
use gsde::Catalog;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let catalog = Catalog::from_env().context("loading lookup catalog")?;
    gsde::run_gui(catalog).map_err(|e| anyhow!("running editor window: {e}"))
}
