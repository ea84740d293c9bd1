use crate::error::Result;
use crate::owners::{self, repo_path};
use crate::session::Session;
use chrono::{DateTime, Utc};
use log::{error, info};

/// A repository with no commits answers 404 on its root contents.
pub async fn repo_is_empty(session: &Session, full_name: &str) -> Result<bool> {
    let path = format!("{}/contents/", repo_path(full_name));
    let resp = session.get::<serde_json::Value>(&path).await;
    if resp.is_not_found() {
        error!("{full_name} is empty.");
        if let Some(e) = &resp.error {
            info!("{}", e.message);
        }
        return Ok(true);
    }
    resp.into_value()?;
    Ok(false)
}

/// Last push time, the REST equivalent of `git show -s --format=%cI HEAD`.
/// `None` for empty or missing repositories.
pub async fn last_commit_date(
    session: &Session,
    full_name: &str,
) -> Result<Option<DateTime<Utc>>> {
    let repo = match owners::get_repo(session, full_name).await {
        Ok(r) => r,
        Err(e) if e.is_not_found() => {
            error!("{full_name} not found");
            info!("{e}");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    if repo_is_empty(session, full_name).await? {
        return Ok(None);
    }
    Ok(repo.pushed_at)
}
