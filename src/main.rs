use std::path::PathBuf;

use anyhow::{Context, Result};
use staff_dashboard::config::DashboardConfig;
use staff_dashboard::data::{employee, loader};
use staff_dashboard::report;
use staff_dashboard::state::Dashboard;

/// `staff-dashboard [DATA_FILE] [CONFIG_JSON]`
///
/// Without a data file the embedded sample table is shown.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let data_path = args.next();
    let config = match args.next() {
        Some(path) => DashboardConfig::load(&path)?,
        None => DashboardConfig::default(),
    };

    let dataset = match &data_path {
        Some(path) => loader::load_file(path)
            .inspect_err(|e| log::error!("Failed to load file: {e:#}"))?,
        None => employee::sample_dataset().clone(),
    };

    let mut dashboard = Dashboard::new(config);
    dashboard
        .set_dataset(dataset)
        .context("dataset does not match the dashboard config")?;

    print!("{}", report::render(&dashboard)?);
    Ok(())
}
