use anyhow::Result;
use nave_config::{Config, ConfigError, Settings, load_dotenv};
use nave_engine::SyncPipeline;
use nave_sources::{DashboardClient, TrackerClient};
use std::path::PathBuf;

pub async fn handle(
    settings: Settings,
    work_dir: Option<PathBuf>,
    cumulative: bool,
    seed: Option<u64>,
    env_file: Option<PathBuf>,
) -> Result<()> {
    if let Some(path) = load_dotenv(env_file.as_deref())? {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = match Config::from_env(settings) {
        Ok(config) => config,
        Err(ConfigError::MissingVariables(missing)) => {
            eprintln!("Error: Missing required environment variables:");
            for name in &missing {
                eprintln!("- {}", name);
            }
            eprintln!("Set them in the environment or in a .env file.");
            return Err(ConfigError::MissingVariables(missing).into());
        }
        Err(e) => return Err(e.into()),
    };

    let tracker = TrackerClient::new(&config.tracker, &config.settings.tracker)?;
    let dashboard = DashboardClient::new(&config.dashboard, &config.settings.dashboard)?
        .with_cumulative(cumulative || config.settings.dashboard.cumulative);
    let masker = super::build_masker(&config.settings, seed);
    let work_dir = super::work_dir(&config.settings, work_dir);

    let mut pipeline = SyncPipeline::new(tracker, dashboard, masker, work_dir);

    println!("Syncing tracker export to dashboard {}...", config.dashboard.dashboard_id);
    let summary = pipeline.run().await?;

    println!("✓ Processing completed successfully!");
    println!("  Issues: {}", summary.issues);
    if summary.stale_removed > 0 {
        println!("  Stale exports removed: {}", summary.stale_removed);
    }
    super::print_report(&summary.report);
    if !summary.response.is_null() {
        println!("  Dashboard response: {}", serde_json::to_string(&summary.response)?);
    }

    Ok(())
}
