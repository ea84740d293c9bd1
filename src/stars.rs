//! Star counts through the GraphQL search API.

use crate::error::{Error, Result};
use crate::session::Session;
use serde::Deserialize;

const STARRED_REPOS_QUERY: &str = r#"
query StarredRepos($q: String!) {
  search(type: REPOSITORY, query: $q, first: 100) {
    repositoryCount
    nodes {
      ... on Repository { name url stargazerCount }
    }
  }
}
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarredRepo {
    pub name: String,
    pub url: String,
    pub stars: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarCount {
    pub login: String,
    pub repos: Vec<StarredRepo>,
    pub total: u64,
}

#[derive(Deserialize)]
struct Data {
    search: Search,
}

#[derive(Deserialize)]
struct Search {
    nodes: Vec<Option<Node>>,
}

// Search results are a union; non-repository nodes decode with no fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    name: Option<String>,
    url: Option<String>,
    stargazer_count: Option<u64>,
}

pub async fn count_stars(session: &Session, login: &str) -> Result<StarCount> {
    if login.is_empty() || login.contains(char::is_whitespace) {
        return Err(Error::Config(format!("invalid GitHub login {login:?}")));
    }
    let vars = serde_json::json!({ "q": format!("user:{login} sort:stars stars:>1") });
    let data: Data = session.graphql(STARRED_REPOS_QUERY, &vars).await?;
    let repos: Vec<StarredRepo> = data
        .search
        .nodes
        .into_iter()
        .flatten()
        .filter_map(|n| {
            Some(StarredRepo {
                name: n.name?,
                url: n.url.unwrap_or_default(),
                stars: n.stargazer_count.unwrap_or(0),
            })
        })
        .collect();
    let total = repos.iter().map(|r| r.stars).sum();
    Ok(StarCount {
        login: login.to_string(),
        repos,
        total,
    })
}
