use crate::config::Config;
use crate::error::{Error, Result};
use crate::rate_limit::Quota;
use log::{trace, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    pub retriable: bool,
}

impl ErrorInfo {
    pub fn into_error(self, status: StatusCode) -> Error {
        Error::Api {
            code: self.code,
            status: status.as_u16(),
            message: self.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestResponse<T> {
    pub value: Option<T>,
    pub rate: Option<Quota>,
    pub error: Option<ErrorInfo>,
    pub status: StatusCode,
    pub headers: Option<HeaderMap>,
}

impl<T> RestResponse<T> {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn has_next_page(&self) -> bool {
        self.headers.as_ref().is_some_and(has_next_page_from_link)
    }

    /// Collapse into the crate error type. A success with no body is
    /// reported as a server error since every caller expects JSON.
    pub fn into_value(self) -> Result<T> {
        match (self.value, self.error) {
            (Some(v), _) => Ok(v),
            (None, Some(e)) => Err(e.into_error(self.status)),
            (None, None) => Err(Error::Api {
                code: "server_error".into(),
                status: self.status.as_u16(),
                message: "empty response".into(),
            }),
        }
    }
}

pub fn build_client(cfg: &Config) -> Result<Client> {
    let mut default_headers = HeaderMap::new();
    let ua = HeaderValue::from_str(&cfg.user_agent)
        .map_err(|e| Error::Config(format!("invalid user agent: {e}")))?;
    default_headers.insert(USER_AGENT, ua);
    // Authorization header is injected per request; anonymous sessions omit it.
    let client = Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()?;
    Ok(client)
}

fn auth_header(token: Option<&str>) -> Option<HeaderValue> {
    token.and_then(|t| HeaderValue::from_str(&format!("Bearer {}", t)).ok())
}

pub fn map_status_to_error(status: StatusCode, message: String) -> ErrorInfo {
    let (code, retriable) = match status {
        StatusCode::BAD_REQUEST => ("bad_request", false),
        StatusCode::UNAUTHORIZED => ("unauthorized", false),
        StatusCode::FORBIDDEN => ("forbidden", false),
        StatusCode::NOT_FOUND => ("not_found", false),
        StatusCode::CONFLICT => ("conflict", false),
        StatusCode::TOO_MANY_REQUESTS => ("rate_limited", true),
        s if s.is_server_error() => ("upstream_error", true),
        _ => ("server_error", false),
    };
    ErrorInfo {
        code: code.to_string(),
        message,
        retriable,
    }
}

/// Read the `x-ratelimit-*` headers GitHub attaches to every REST response.
/// Returns `None` unless remaining, limit and reset are all present.
pub fn extract_rate_from_rest(headers: &HeaderMap) -> Option<Quota> {
    let header_num = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i64>().ok())
    };
    let remaining = header_num("x-ratelimit-remaining")?;
    let limit = header_num("x-ratelimit-limit")?;
    let reset = header_num("x-ratelimit-reset")?;
    Quota::from_raw(remaining, limit, reset)
}

fn compute_backoff(attempt: u32, retry_after: Option<Duration>) -> Duration {
    if let Some(d) = retry_after {
        return d;
    }
    // Exponential backoff with jitter: base 200ms * 2^attempt, max 5s.
    let base = 200u64.saturating_mul(1u64 << attempt.min(5));
    let max = 5_000u64.min(base);
    let jitter = fastrand::u64(0..=max / 2);
    Duration::from_millis(max / 2 + jitter)
}

fn should_retry(status: StatusCode) -> bool {
    map_status_to_error(status, String::new()).retriable
}

/// GET `{api_url}{path}` and decode the JSON body. Send failures, 429 and 5xx
/// are retried up to `cfg.max_retries` times; everything else is returned as-is.
pub async fn rest_get_json<T: for<'de> Deserialize<'de>>(
    client: &Client,
    cfg: &Config,
    path: &str,
) -> RestResponse<T> {
    let url = format!("{}{}", cfg.api_url, path);
    let mut attempt: u32 = 0;
    loop {
        let mut req = client
            .get(&url)
            .header("X-GitHub-Api-Version", &cfg.api_version)
            .header(
                ACCEPT,
                HeaderValue::from_static("application/vnd.github+json"),
            );
        if let Some(auth) = auth_header(cfg.token.as_deref()) {
            req = req.header(AUTHORIZATION, auth);
        }

        let res = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("REST GET error sending request: {}", e);
                if attempt < cfg.max_retries {
                    tokio::time::sleep(compute_backoff(attempt, None)).await;
                    attempt += 1;
                    continue;
                }
                return RestResponse {
                    value: None,
                    rate: None,
                    error: Some(ErrorInfo {
                        code: "upstream_error".into(),
                        message: e.to_string(),
                        retriable: true,
                    }),
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    headers: None,
                };
            }
        };

        let status = res.status();
        let headers = res.headers().clone();
        let rate = extract_rate_from_rest(&headers);
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);
        trace!("REST GET {} -> {}", path, status);

        if status.is_success() {
            return match res.json::<T>().await {
                Ok(val) => RestResponse {
                    value: Some(val),
                    rate,
                    error: None,
                    status,
                    headers: Some(headers),
                },
                Err(e) => RestResponse {
                    value: None,
                    rate,
                    error: Some(ErrorInfo {
                        code: "server_error".into(),
                        message: e.to_string(),
                        retriable: false,
                    }),
                    status,
                    headers: Some(headers),
                },
            };
        }

        if should_retry(status) && attempt < cfg.max_retries {
            let backoff = compute_backoff(attempt, retry_after);
            warn!(
                "REST GET {} retrying (status {}), backoff {:?}",
                url, status, backoff
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
            continue;
        }
        let text = res.text().await.unwrap_or_default();
        return RestResponse {
            value: None,
            rate,
            error: Some(map_status_to_error(status, text)),
            status,
            headers: Some(headers),
        };
    }
}

pub fn has_next_page_from_link(headers: &HeaderMap) -> bool {
    if let Some(link) = headers.get("link").and_then(|v| v.to_str().ok()) {
        // Simple check for rel="next"
        return link.contains("rel=\"next\"");
    }
    false
}

/// Percent-encode a single URL path segment (owner, repo, team or branch name).
pub fn encode_path_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>, // standard GraphQL errors
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

pub async fn graphql_post<TReq: Serialize, TResp: for<'de> Deserialize<'de>>(
    client: &Client,
    cfg: &Config,
    query: &str,
    variables: &TReq,
) -> Result<TResp> {
    let Some(auth) = auth_header(cfg.token.as_deref()) else {
        return Err(Error::Config(
            "the GraphQL API requires a token (GITHUB_TOKEN or a token file)".into(),
        ));
    };
    let mut attempt: u32 = 0;
    let body = serde_json::json!({ "query": query, "variables": variables });
    loop {
        let res = client
            .post(&cfg.graphql_url)
            .header(AUTHORIZATION, auth.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await;

        let res = match res {
            Ok(r) => r,
            Err(e) => {
                if attempt < cfg.max_retries {
                    tokio::time::sleep(compute_backoff(attempt, None)).await;
                    attempt += 1;
                    continue;
                }
                return Err(Error::Http(e));
            }
        };

        let status = res.status();
        let text = res.text().await.unwrap_or_default();

        if status.is_success() {
            let resp: GraphQlResponse<TResp> =
                serde_json::from_str(&text).map_err(|e| Error::GraphQl(e.to_string()))?;
            if let Some(errors) = resp.errors.filter(|e| !e.is_empty()) {
                let msg = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::GraphQl(msg));
            }
            return resp
                .data
                .ok_or_else(|| Error::GraphQl("response carried no data".into()));
        }

        if should_retry(status) && attempt < cfg.max_retries {
            tokio::time::sleep(compute_backoff(attempt, None)).await;
            attempt += 1;
            continue;
        }
        return Err(map_status_to_error(status, text).into_error(status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_matrix() {
        assert_eq!(
            map_status_to_error(StatusCode::BAD_REQUEST, "".into()).code,
            "bad_request"
        );
        assert_eq!(
            map_status_to_error(StatusCode::UNAUTHORIZED, "".into()).code,
            "unauthorized"
        );
        assert_eq!(
            map_status_to_error(StatusCode::FORBIDDEN, "".into()).code,
            "forbidden"
        );
        assert_eq!(
            map_status_to_error(StatusCode::NOT_FOUND, "".into()).code,
            "not_found"
        );
        assert_eq!(
            map_status_to_error(StatusCode::CONFLICT, "".into()).code,
            "conflict"
        );
        let rl = map_status_to_error(StatusCode::TOO_MANY_REQUESTS, "".into());
        assert_eq!(rl.code, "rate_limited");
        assert!(rl.retriable);
        let s5 = map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, "".into());
        assert_eq!(s5.code, "upstream_error");
        assert!(s5.retriable);
    }

    #[test]
    fn retry_follows_retriable_codes() {
        assert!(should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry(StatusCode::BAD_GATEWAY));
        assert!(!should_retry(StatusCode::NOT_FOUND));
        assert!(!should_retry(StatusCode::FORBIDDEN));
    }

    #[test]
    fn backoff_honors_retry_after() {
        assert_eq!(
            compute_backoff(3, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
        for attempt in 0..8 {
            assert!(compute_backoff(attempt, None) <= Duration::from_millis(5_000));
        }
    }

    #[test]
    fn rate_headers_need_all_three_values() {
        let mut h = HeaderMap::new();
        h.insert("x-ratelimit-remaining", "4999".parse().unwrap());
        h.insert("x-ratelimit-limit", "5000".parse().unwrap());
        assert!(extract_rate_from_rest(&h).is_none());
        h.insert("x-ratelimit-reset", "0".parse().unwrap());
        let q = extract_rate_from_rest(&h).unwrap();
        assert_eq!(q.remaining, 4999);
        assert_eq!(q.limit, 5000);
        assert_eq!(q.reset.timestamp(), 0);
    }

    #[test]
    fn into_value_maps_errors() {
        let resp: RestResponse<u32> = RestResponse {
            value: None,
            rate: None,
            error: Some(map_status_to_error(StatusCode::NOT_FOUND, "nope".into())),
            status: StatusCode::NOT_FOUND,
            headers: None,
        };
        assert!(resp.is_not_found());
        let err = resp.into_value().unwrap_err();
        assert!(err.is_not_found());
    }
}
