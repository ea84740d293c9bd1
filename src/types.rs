use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subset of the REST repository object this crate reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub owner: Account,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    /// Only present on the single-repository endpoint, and only for forks.
    #[serde(default)]
    pub parent: Option<Box<Repository>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A GitHub account that owns repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    User(String),
    Organization(String),
}

impl Owner {
    pub fn login(&self) -> &str {
        match self {
            Owner::User(l) | Owner::Organization(l) => l,
        }
    }

    /// Listing path for every repository the owner has, including forks.
    pub fn repos_path(&self) -> String {
        let login = crate::http::encode_path_segment(self.login());
        match self {
            Owner::User(_) => format!("/users/{login}/repos?type=all"),
            Owner::Organization(_) => format!("/orgs/{login}/repos?type=all"),
        }
    }
}

/// Result of a "does X exist" probe. Lookup failures other than a clean
/// 404 are kept distinct so callers do not mistake an outage for absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    Exists,
    NotFound,
    Error(String),
}

impl Existence {
    pub fn exists(&self) -> bool {
        matches!(self, Existence::Exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_decodes_minimal_listing_entry() {
        let v = serde_json::json!({
            "name": "pymap3d",
            "full_name": "alice/pymap3d",
            "owner": {"login": "alice", "type": "User"},
            "fork": false,
            "stargazers_count": 12,
            "forks_count": 3,
            "default_branch": "main",
            "pushed_at": "2024-05-01T12:00:00Z"
        });
        let r: Repository = serde_json::from_value(v).unwrap();
        assert_eq!(r.owner.login, "alice");
        assert_eq!(r.stargazers_count, 12);
        assert!(r.parent.is_none());
        assert_eq!(r.pushed_at.unwrap().timestamp(), 1_714_564_800);
    }

    #[test]
    fn owner_paths() {
        assert_eq!(
            Owner::User("alice".into()).repos_path(),
            "/users/alice/repos?type=all"
        );
        assert_eq!(
            Owner::Organization("my org".into()).repos_path(),
            "/orgs/my%20org/repos?type=all"
        );
    }
}
