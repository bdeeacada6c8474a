// bin/envdash.rs

use std::path::PathBuf;

use clap::Parser;
use envdash::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Environmental monitoring dashboard")]
struct Opts {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Root of the mycodo installation (log/, config/, cgi-bin/, images/)
    #[arg(long)]
    install_path: Option<PathBuf>,

    /// Let every request in without authentication
    #[arg(long)]
    trust_all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let opts = Opts::parse();
    info!("Starting up envdash v{APP_VERSION}");

    let mut config = match &opts.config {
        None => MyConfig::default(),
        Some(path) => match MyConfig::from_file(path) {
            Some(c) => c,
            None => {
                error!("Could not read config, using defaults");
                MyConfig::default()
            }
        },
    };
    if let Some(port) = opts.port {
        config.port = port;
    }
    if let Some(p) = opts.install_path {
        config.install_path = p;
    }
    config.trust_all |= opts.trust_all;

    if config.render_timeout_secs == 0 {
        bail!("render_timeout_secs must be positive");
    }
    info!("My config:\n{config:#?}");

    let state = Arc::new(MyState::new(config));
    run_api_server(state).await
}

// EOF
