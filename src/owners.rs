//! Users, organizations and the repositories and teams they hold.

use crate::error::{Error, Result};
use crate::http::encode_path_segment;
use crate::session::Session;
use crate::types::{Account, Existence, Owner, Repository, Team};
use log::info;

/// Decide whether `name` is a user or an organization. Organizations are
/// listed through `/orgs/...`, which also returns their private repos when
/// the token allows.
pub async fn user_or_org(session: &Session, name: &str) -> Result<Owner> {
    let path = format!("/users/{}", encode_path_segment(name));
    let resp = session.get::<Account>(&path).await;
    if resp.is_not_found() {
        return Err(Error::NotFound(format!("{name} not found on GitHub")));
    }
    let account = resp.into_value()?;
    Ok(match account.kind.as_deref() {
        Some("Organization") => Owner::Organization(account.login),
        _ => Owner::User(account.login),
    })
}

/// Resolve the account behind the session's token. With `org`, the token's
/// user must be a member of that organization, which is then returned so
/// its private repositories are reachable.
pub async fn connect(session: &Session, org: Option<&str>) -> Result<Owner> {
    if !session.is_authenticated() {
        return Err(Error::Config(
            "connecting as the authenticated user requires a token".into(),
        ));
    }
    let me: Account = session.get_json("/user").await?;
    let Some(org) = org else {
        return Ok(Owner::User(me.login));
    };
    let orgs: Vec<Account> = session.get_all("/user/orgs").await?;
    match orgs.into_iter().find(|o| o.login == org) {
        Some(o) => Ok(Owner::Organization(o.login)),
        None => Err(Error::NotFound(format!(
            "Organization {org} authentication could not be established for {}",
            me.login
        ))),
    }
}

pub async fn list_repos(session: &Session, owner: &Owner) -> Result<Vec<Repository>> {
    let repos: Vec<Repository> = session.get_all(&owner.repos_path()).await?;
    info!("{}: {} repositories", owner.login(), repos.len());
    Ok(repos)
}

pub async fn get_repo(session: &Session, full_name: &str) -> Result<Repository> {
    session.get_json(&repo_path(full_name)).await
}

pub async fn repo_exists(session: &Session, owner: &str, repo: &str) -> Existence {
    let path = format!(
        "/repos/{}/{}",
        encode_path_segment(owner),
        encode_path_segment(repo)
    );
    let resp = session.get::<Repository>(&path).await;
    if resp.is_not_found() {
        info!("{owner}/{repo} not found");
        return Existence::NotFound;
    }
    match resp.into_value() {
        Ok(r) if !r.name.is_empty() => Existence::Exists,
        Ok(_) => Existence::NotFound,
        Err(e) => {
            info!("{owner}/{repo}: {e}");
            Existence::Error(e.to_string())
        }
    }
}

pub async fn team_exists(session: &Session, org: &str, team: &str) -> Existence {
    let path = format!("/orgs/{}/teams", encode_path_segment(org));
    match session.get_all::<Team>(&path).await {
        Ok(teams) if teams.iter().any(|t| t.name == team) => Existence::Exists,
        Ok(_) => Existence::NotFound,
        Err(e) => {
            info!("{org} teams: {e}");
            Existence::Error(e.to_string())
        }
    }
}

/// `/repos/{owner}/{repo}` from an `owner/repo` full name. Each half is
/// encoded separately so the separating slash survives.
pub fn repo_path(full_name: &str) -> String {
    match full_name.split_once('/') {
        Some((owner, repo)) => format!(
            "/repos/{}/{}",
            encode_path_segment(owner),
            encode_path_segment(repo)
        ),
        None => format!("/repos/{}", encode_path_segment(full_name)),
    }
}
