//! grove: synchronize a GitLab group tree to local working copies
//! Crawls the configured root groups, clones anything missing and
//! fast-forwards everything else.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command as ClapCommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use grove_sync::config::Config;
use grove_sync::core::{Aggregator, RenderMode, SyncEngine};
use grove_sync::git::GitSyncer;
use grove_sync::provider::GitLabProvider;

fn build_cli() -> ClapCommand {
    ClapCommand::new("grove")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Synchronize a GitLab group tree to local working copies")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file (default: ~/.config/grove/grove.toml)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("One log line per event instead of the live summary"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Like --verbose, plus debug-level events"),
        )
}

fn init_logging(debug: bool, interactive: bool) {
    // The live summary owns the terminal in interactive mode; keep the
    // subscriber quiet there so stray events don't corrupt the line.
    let default_level = if debug {
        "debug"
    } else if interactive {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let verbose = matches.get_flag("verbose");
    let debug = matches.get_flag("debug");
    let interactive = std::io::stdout().is_terminal() && !verbose && !debug;

    init_logging(debug, interactive);

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    let token = config.resolved_token();
    let provider = Arc::new(GitLabProvider::new(
        config.gitlab.host.as_deref(),
        token.clone(),
    ));

    // Resolve every configured root group up front; a lookup or auth
    // failure aborts before any sync work starts.
    let mut seed_groups = Vec::new();
    for root in &config.gitlab.groups {
        let group = provider
            .lookup_group(&root.group, &root.location)
            .await
            .with_context(|| format!("unable to resolve root group '{}'", root.group))?;
        seed_groups.push(group);
    }

    let seed_projects = config.seed_projects(token.as_deref());

    let mode = if interactive {
        RenderMode::Interactive
    } else {
        RenderMode::Verbose
    };

    let engine = SyncEngine::new(provider, Arc::new(GitSyncer));
    let report = engine
        .run(seed_groups, seed_projects, Aggregator::new(mode))
        .await?;

    if report.completed() == 0 {
        println!("Nothing to synchronize.");
    }

    Ok(())
}
