use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tether::{Services, Tether, build_tui};
use tianyan_common::APP_NAME;
use tianyan_common::observability::{LogConfig, init_logging};
use tianyan_config::{CONFIG_FILE_NAME, PortalConfig, PortalConfigLoader, user_config_path};
mod oneshot;
mod tether;

/// Terminal client for the Tianyan search portal.
#[derive(Debug, Parser)]
#[command(name = "tianyan", version, about)]
struct Cli {
    /// Config file; must exist when given. Otherwise `./tianyan.yaml` and the
    /// user config file are read if present.
    #[arg(long, short, env = "TIANYAN_CONFIG")]
    config: Option<PathBuf>,

    /// Search once, print a page of results and exit.
    #[arg(long, short)]
    query: Option<String>,

    /// Page to print with --query, starting at 1.
    #[arg(long, default_value_t = 1, requires = "query",
          value_parser = clap::value_parser!(u16).range(1..))]
    page: u16,

    /// Duplicate logs to stderr (one-shot mode only).
    #[arg(long)]
    log_stderr: bool,
}

fn load_config(cli: &Cli) -> Result<PortalConfig> {
    let loader = match &cli.config {
        Some(path) => PortalConfigLoader::new().with_file(path),
        None => {
            let mut loader = PortalConfigLoader::new();
            if let Some(user) = user_config_path() {
                loader = loader.with_optional_file(user);
            }
            loader.with_optional_file(CONFIG_FILE_NAME)
        }
    };
    Ok(loader.load()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Config (env wins over files)
    let cfg = load_config(&cli)?;

    // 2) Logging; stderr would tear the alternate screen, so only one-shot may use it
    let one_shot = cli.query.is_some();
    let wants_stderr = cli.log_stderr || cfg.logging.stderr;
    let log_path = init_logging(LogConfig {
        app_name: APP_NAME,
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: one_shot && wants_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    })?;
    tracing::info!(
        target: "tianyan.app",
        log = %log_path.display(),
        one_shot,
        "tianyan.start"
    );
    if wants_stderr && !one_shot {
        tracing::warn!(target: "tianyan.app", "stderr logging ignored while the TUI is active");
    }

    // 3) Wiring
    let services = Services::from_config(&cfg)?;

    match cli.query {
        Some(query) => {
            let mut stdout = std::io::stdout().lock();
            oneshot::run(&services, &query, usize::from(cli.page), &mut stdout).await
        }
        None => {
            let mut tether = Tether::new();
            build_tui(&mut tether, services)?;
            tether.run().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_requires_query() {
        assert!(Cli::try_parse_from(["tianyan", "--page", "2"]).is_err());
        let cli = Cli::try_parse_from(["tianyan", "-q", "rust", "--page", "2"]).unwrap();
        assert_eq!(cli.page, 2);
        assert_eq!(cli.query.as_deref(), Some("rust"));
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(Cli::try_parse_from(["tianyan", "-q", "rust", "--page", "0"]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
