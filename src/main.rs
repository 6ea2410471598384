mod config;
mod pr;
mod report;
mod tools;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use pr::CommentState;

/// Python Doctor — reads static-analysis result files, scores them, and keeps
/// a single summary comment up to date on the pull request.
#[derive(Parser, Debug)]
#[command(name = "python-doctor", version, about)]
struct Cli {
    /// Config file (default: .python-doctor.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the pydoctor_<tool>.txt result files
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Also write the rendered comment body to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the comment body to stdout instead of calling the GitHub API
    #[arg(long)]
    dry_run: bool,

    /// Never post, regardless of POST_COMMENT
    #[arg(long)]
    no_post: bool,

    /// Event name override (default: GITHUB_EVENT_NAME)
    #[arg(long)]
    event: Option<String>,

    /// Repository override as owner/repo (default: GITHUB_REPOSITORY)
    #[arg(long)]
    repo: Option<String>,

    /// Pull request number override
    #[arg(long)]
    pr: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let _main_span = info_span!("python_doctor").entered();

    info!("loading configuration");
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.results_dir {
        config.results.dir = Some(dir);
    }
    if cli.no_post {
        config.comment.post = Some(false);
    }

    let registry = tools::ToolRegistry::from_config(&config)?;
    let noise = tools::NoiseFilter::new(&config.noise.patterns)?;

    info!(tools = registry.tools().len(), "reading tool results");
    let results = tools::reader::read_all(&registry, &noise)?;

    let score = report::score(&results);
    info!(
        score = score.score,
        band = %score.band,
        deducted = score.deducted,
        findings = score.findings,
        "computed health score"
    );

    let output_file = std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from);
    report::write_outputs(&score, output_file.as_deref())?;
    report::print_terminal_summary(&results, &score);

    let body = score
        .has_findings()
        .then(|| report::render(&results, &score));
    if let (Some(body), Some(path)) = (&body, cli.output.as_deref()) {
        report::write_body(body, path)?;
        info!(path = %path.display(), "wrote comment body");
    }
    if body.is_none() {
        info!("no issues found, no comment needed");
    }

    if cli.dry_run {
        if let Some(body) = &body {
            println!("{body}");
        }
        info!("dry run, skipping GitHub API");
        return Ok(());
    }

    let overrides = pr::ContextOverrides {
        event: cli.event,
        repo: cli.repo,
        pr: cli.pr,
    };
    let plan = pr::plan_comment(config.should_post(), body.is_some(), &overrides, |key| {
        std::env::var(key).ok()
    })?;
    let Some((action, thread)) = plan else {
        info!("not posting: comment disabled or not a pull_request event");
        return Ok(());
    };
    debug!(?action, issue = thread.issue_number, "syncing PR comment");

    let client = pr::GitHubClient::new(config.api_url(), config.github_token())?;
    let outcome = pr::sync_report_comment(&client, &thread, body.as_deref()).await?;
    match outcome.final_state() {
        CommentState::HasComment(id) => {
            info!(comment_id = id, replaced = outcome.deleted.len(), "PR comment posted")
        }
        CommentState::NoComment => {
            info!(deleted = outcome.deleted.len(), "no findings, stale PR comment cleared")
        }
    }

    Ok(())
}
