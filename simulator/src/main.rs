use anyhow::Context;
use clap::Parser;
use feed::server::FeedServer;
use feed::state::FeedState;
use generator::profile::build_session;
use replaycore::session::{load_boundaries, BoundaryRecord, Session};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod feed;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for recorded traffic-radar replays")]
struct Args {
    /// Session export (JSON) to replay
    #[arg(long, conflicts_with = "synthesize")]
    session: Option<PathBuf>,
    /// Queue-boundary records (JSON array) to join with the session
    #[arg(long)]
    boundaries: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Generate a synthetic session instead of loading one
    #[arg(long, default_value_t = false)]
    synthesize: bool,
    /// Seed for the synthetic generator (overrides the config)
    #[arg(long)]
    seed: Option<u64>,
    /// Write the synthesized session (and `<stem>.boundaries.json`) here
    #[arg(long)]
    output: Option<PathBuf>,
    /// Render this frame on a headless surface and report the draw calls
    #[arg(long)]
    render_frame: Option<usize>,
    /// Write the run summary as JSON
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep serving the boundary records over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Address for the boundary feed (overrides the config)
    #[arg(long)]
    listen: Option<SocketAddr>,
}

fn write_synthetic(
    path: &Path,
    session: &Session,
    boundaries: &[BoundaryRecord],
) -> anyhow::Result<()> {
    session
        .save(path)
        .with_context(|| format!("writing session {}", path.display()))?;
    let boundary_path = path.with_extension("boundaries.json");
    let text = serde_json::to_string_pretty(boundaries).context("encoding boundary records")?;
    fs::write(&boundary_path, text)
        .with_context(|| format!("writing boundaries {}", boundary_path.display()))?;
    log::info!("wrote {} and {}", path.display(), boundary_path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = match &args.config {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    };
    if let Some(seed) = args.seed {
        workflow_config.generator.seed = seed;
    }
    if let Some(address) = args.listen {
        workflow_config.feed_address = address;
    }

    let (session, mut boundaries) = if args.synthesize {
        let synthetic = build_session(&workflow_config.generator)?;
        if let Some(path) = &args.output {
            write_synthetic(path, &synthetic.session, &synthetic.boundaries)?;
        }
        (synthetic.session, synthetic.boundaries)
    } else if let Some(path) = &args.session {
        let session = Session::load(path)
            .with_context(|| format!("loading session {}", path.display()))?;
        (session, Vec::new())
    } else {
        log::warn!("no session given; replaying an empty session");
        (Session::default(), Vec::new())
    };
    if let Some(path) = &args.boundaries {
        boundaries = load_boundaries(path)
            .with_context(|| format!("loading boundaries {}", path.display()))?;
    }

    let feed_state = Arc::new(FeedState::new(boundaries.clone()));
    let runner = Runner::new(workflow_config.clone());
    let result = runner.execute(session, boundaries, args.render_frame)?;
    println!("{}", result);

    if let Some(path) = &args.report {
        let report = serde_json::to_string_pretty(&result).context("encoding run report")?;
        fs::write(path, report).with_context(|| format!("writing report {}", path.display()))?;
    }

    if args.serve {
        let server = FeedServer::new(workflow_config.feed_address, feed_state);
        server.spawn()?;
        println!(
            "Boundary feed on http://{}/boundaries (Ctrl+C to stop)",
            server.address()
        );
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
