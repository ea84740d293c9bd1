use crate::error::Result;
use crate::http::encode_path_segment;
use crate::owners::{self, repo_path};
use crate::rate_limit;
use crate::session::Session;
use crate::types::Repository;
use log::{debug, warn};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkAhead {
    pub fork: String,
    pub upstream: String,
    pub branch: String,
    pub ahead_by: u64,
}

impl fmt::Display for ForkAhead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) is {} commits ahead of {}",
            self.fork, self.branch, self.ahead_by, self.upstream
        )
    }
}

#[derive(Deserialize)]
struct Comparison {
    ahead_by: u64,
    #[serde(default)]
    behind_by: u64,
}

/// Compare every fork in `repos` against its parent and keep the ones with
/// commits the parent lacks. `branch` overrides the fork's default branch.
///
/// The quota guard runs before each fork, so an exhausted quota stops the
/// walk with [`crate::error::Error::QuotaExhausted`].
pub async fn forks_ahead(
    session: &Session,
    repos: &[Repository],
    branch: Option<&str>,
) -> Result<Vec<ForkAhead>> {
    let mut ahead = Vec::new();
    for repo in repos.iter().filter(|r| r.fork) {
        rate_limit::check_quota(session).await?;
        if let Some(found) = fork_ahead(session, repo, branch).await? {
            ahead.push(found);
        }
    }
    Ok(ahead)
}

async fn fork_ahead(
    session: &Session,
    fork: &Repository,
    branch: Option<&str>,
) -> Result<Option<ForkAhead>> {
    // Listings omit `parent`; only the single-repo endpoint carries it.
    let detail = owners::get_repo(session, &fork.full_name).await?;
    let Some(parent) = detail.parent else {
        warn!("{} is marked as a fork but has no parent", fork.full_name);
        return Ok(None);
    };

    let head_branch = branch
        .map(str::to_string)
        .or_else(|| detail.default_branch.clone())
        .unwrap_or_else(|| "main".to_string());
    let base_branch = parent
        .default_branch
        .clone()
        .unwrap_or_else(|| "main".to_string());

    let path = format!(
        "{}/compare/{}...{}:{}",
        repo_path(&parent.full_name),
        encode_path_segment(&base_branch),
        encode_path_segment(&fork.owner.login),
        encode_path_segment(&head_branch),
    );
    let resp = session.get::<Comparison>(&path).await;
    if resp.is_not_found() {
        warn!(
            "{}: cannot compare branch {} against {}",
            fork.full_name, head_branch, parent.full_name
        );
        return Ok(None);
    }
    let cmp = resp.into_value()?;
    debug!(
        "{} vs {}: ahead {} behind {}",
        fork.full_name, parent.full_name, cmp.ahead_by, cmp.behind_by
    );
    if cmp.ahead_by == 0 {
        return Ok(None);
    }
    Ok(Some(ForkAhead {
        fork: fork.full_name.clone(),
        upstream: parent.full_name,
        branch: head_branch,
        ahead_by: cmp.ahead_by,
    }))
}
