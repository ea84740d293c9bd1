use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{self, RestResponse};
use crate::rate_limit::Quota;
use log::{debug, trace, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const PER_PAGE: u32 = 100;
/// Upper bound on pages followed for one listing.
const MAX_PAGES: u32 = 100;

/// Caller-owned handle to the GitHub API: one HTTP client plus the
/// configuration it was built from. Pass it to every operation.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    cfg: Config,
}

#[derive(Deserialize)]
struct RateLimitBody {
    resources: Resources,
}

#[derive(Deserialize)]
struct Resources {
    core: Resource,
}

#[derive(Deserialize)]
struct Resource {
    limit: i64,
    remaining: i64,
    reset: i64,
}

impl Session {
    pub fn new(cfg: Config) -> Result<Self> {
        let client = http::build_client(&cfg)?;
        Ok(Self { client, cfg })
    }

    pub fn is_authenticated(&self) -> bool {
        self.cfg.is_authenticated()
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> RestResponse<T> {
        let resp = http::rest_get_json(&self.client, &self.cfg, path).await;
        if let Some(q) = &resp.rate {
            trace!("{}: {} / {} calls left", path, q.remaining, q.limit);
        }
        resp
    }

    pub async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        self.get(path).await.into_value()
    }

    /// Collect every page of a list endpoint, following `Link: rel="next"`.
    pub async fn get_all<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<Vec<T>> {
        self.get_pages(path, MAX_PAGES).await
    }

    async fn get_pages<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        max_pages: u32,
    ) -> Result<Vec<T>> {
        let sep = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut more = false;
        for page in 1..=max_pages {
            let paged = format!("{path}{sep}per_page={PER_PAGE}&page={page}");
            let resp: RestResponse<Vec<T>> = self.get(&paged).await;
            more = resp.has_next_page();
            let batch = resp.into_value()?;
            debug!("{} page {}: {} items", path, page, batch.len());
            let empty = batch.is_empty();
            items.extend(batch);
            if !more || empty {
                more = false;
                break;
            }
        }
        if more {
            warn!(
                "{}: stopped after {} pages ({} items); further pages were not fetched",
                path,
                max_pages,
                items.len()
            );
        }
        Ok(items)
    }

    pub async fn graphql<TReq: Serialize, TResp: for<'de> Deserialize<'de>>(
        &self,
        query: &str,
        variables: &TReq,
    ) -> Result<TResp> {
        http::graphql_post(&self.client, &self.cfg, query, variables).await
    }

    /// Current core REST quota, read fresh from `GET /rate_limit`.
    pub async fn rate_limit(&self) -> Result<Quota> {
        let body: RateLimitBody = self.get_json("/rate_limit").await?;
        let core = body.resources.core;
        Quota::from_raw(core.remaining, core.limit, core.reset).ok_or_else(|| Error::Api {
            code: "server_error".into(),
            status: 200,
            message: format!(
                "malformed rate limit: {} / {} reset {}",
                core.remaining, core.limit, core.reset
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};

    fn session(server: &MockServer) -> Session {
        Session::new(Config {
            token: None,
            api_url: server.base_url(),
            graphql_url: format!("{}/graphql", server.base_url()),
            api_version: "2022-11-28".into(),
            user_agent: "gh-repo-stats-tests".into(),
            timeout_secs: 5,
            max_retries: 0,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn page_cap_stops_endless_listing() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/orgs/huge/repos");
                then.status(200)
                    .header("link", "<http://example/next>; rel=\"next\"")
                    .json_body(serde_json::json!([{"id": 1}]));
            })
            .await;
        let items: Vec<serde_json::Value> = session(&server)
            .get_pages("/orgs/huge/repos?type=all", 3)
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(m.hits_async().await, 3);
    }

    #[tokio::test]
    async fn last_page_without_next_link_ends_listing() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/orgs/small/teams");
                then.status(200).json_body(serde_json::json!([{"id": 1}, {"id": 2}]));
            })
            .await;
        let items: Vec<serde_json::Value> =
            session(&server).get_all("/orgs/small/teams").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(m.hits_async().await, 1);
    }
}
