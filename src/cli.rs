use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    let oauth = |required: bool| {
        Arg::new("oauth")
            .required(required)
            .help("File holding a GitHub OAuth token (keep it out of any Git repo)")
    };

    Command::new("gh-repo-stats")
        .about("Count stars and forks across a GitHub user's or organization's repositories")
        .disable_version_flag(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("forks")
                .about("List repos with stars and forks, and forks ahead of upstream")
                .arg(Arg::new("user").required(true).help("GitHub user or organization"))
                .arg(oauth(false))
                .arg(
                    Arg::new("branch")
                        .short('b')
                        .long("branch")
                        .num_args(1)
                        .help("Fork branch to compare (default: the fork's default branch)"),
                )
                .arg(
                    Arg::new("stars")
                        .long("stars")
                        .action(ArgAction::SetTrue)
                        .help("Only count stars and forks; skip fork comparison"),
                ),
        )
        .subcommand(
            Command::new("stars")
                .about("Count stars received by each user via GraphQL")
                .arg(oauth(true))
                .arg(
                    Arg::new("users")
                        .required(true)
                        .num_args(1..)
                        .help("GitHub username(s)"),
                ),
        )
        .subcommand(
            Command::new("rate")
                .about("Check the remaining GitHub API quota")
                .arg(oauth(false)),
        )
}

/// `--log-level` wins, then `-v`, then RUST_LOG, then info.
pub fn init_logging(level: Option<&str>, verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    } else if verbose {
        builder.parse_filters("debug");
    }
    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn forks_args() {
        let m = build_cli()
            .try_get_matches_from(["gh-repo-stats", "forks", "alice", "~/.token", "-b", "dev"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "forks");
        assert_eq!(sub.get_one::<String>("user").unwrap(), "alice");
        assert_eq!(sub.get_one::<String>("oauth").unwrap(), "~/.token");
        assert_eq!(sub.get_one::<String>("branch").unwrap(), "dev");
        assert!(!sub.get_flag("stars"));
    }

    #[test]
    fn stars_needs_users() {
        assert!(build_cli()
            .try_get_matches_from(["gh-repo-stats", "stars", "token"])
            .is_err());
        let m = build_cli()
            .try_get_matches_from(["gh-repo-stats", "stars", "token", "a", "b"])
            .unwrap();
        let sub = m.subcommand_matches("stars").unwrap();
        let users: Vec<_> = sub.get_many::<String>("users").unwrap().collect();
        assert_eq!(users, ["a", "b"]);
    }
}
