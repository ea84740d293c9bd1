mod cli;

use anyhow::Context;
use clap::ArgMatches;
use gh_repo_stats::stats::{summarize, RepoStat};
use gh_repo_stats::{forks, owners, rate_limit, report, stars, Config, Session};
use std::io::{self, Write};
use std::path::Path;

// Requests are issued one at a time; no worker threads needed.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::build_cli();
    let matches = cmd.get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();

    cli::init_logging(log_level.as_deref(), matches.get_flag("verbose"));

    if matches.get_flag("version") {
        println!("gh-repo-stats {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match matches.subcommand() {
        Some(("forks", sub)) => run_forks(sub).await,
        Some(("stars", sub)) => run_stars(sub).await,
        Some(("rate", sub)) => run_rate(sub).await,
        _ => {
            cli::build_cli().print_help()?;
            Ok(())
        }
    }
}

fn session_for(sub: &ArgMatches) -> anyhow::Result<Session> {
    let mut cfg = Config::from_env()?;
    if let Some(path) = sub.get_one::<String>("oauth") {
        cfg = cfg
            .with_token_file(Path::new(path))
            .with_context(|| format!("reading token file {path}"))?;
    }
    Ok(Session::new(cfg)?)
}

async fn run_forks(sub: &ArgMatches) -> anyhow::Result<()> {
    let session = session_for(sub)?;
    let user = sub
        .get_one::<String>("user")
        .context("missing user argument")?;
    let branch = sub.get_one::<String>("branch").map(String::as_str);

    rate_limit::check_quota(&session).await?;
    let owner = owners::user_or_org(&session, user).await?;
    let repos = owners::list_repos(&session, &owner).await?;
    let summary = summarize(repos.iter().map(RepoStat::from));

    let mut out = io::stdout().lock();
    report::write_summary(&mut out, user, &summary)?;
    out.flush()?;

    if !sub.get_flag("stars") {
        let ahead = forks::forks_ahead(&session, &repos, branch).await?;
        report::write_forks_ahead(&mut out, user, &ahead)?;
    }
    out.flush()?;
    Ok(())
}

async fn run_stars(sub: &ArgMatches) -> anyhow::Result<()> {
    let session = session_for(sub)?;
    let mut out = io::stdout().lock();
    for user in sub.get_many::<String>("users").into_iter().flatten() {
        let count = stars::count_stars(&session, user).await?;
        report::write_star_count(&mut out, &count)?;
    }
    out.flush()?;
    Ok(())
}

async fn run_rate(sub: &ArgMatches) -> anyhow::Result<()> {
    let session = session_for(sub)?;
    let quota = session.rate_limit().await?;
    let mut out = io::stdout().lock();
    report::write_quota(&mut out, &quota)?;
    out.flush()?;
    rate_limit::evaluate(&quota)?;
    Ok(())
}
