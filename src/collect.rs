//! Collection glue: harvest a group wall's comments plus the commenting
//! users' profiles from a VK-style JSON API into a [`Dump`].
//!
//! All boundary concerns live here and nowhere else: offset pagination,
//! polite inter-request delays, bounded retry on API-level errors. The core
//! never sees the network.

use crate::dump::{Dump, DumpMeta};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::thread::sleep;
use std::time::Duration;

/// Static collector parameters. `base_url` is injectable so tests can point
/// the client at a local stub.
#[derive(Clone, Debug)]
pub struct CollectorCfg {
    pub base_url: String,
    pub access_token: String,
    pub api_version: String,
    pub page_size: usize,
    pub request_delay: Duration,
    pub error_backoff: Duration,
    pub max_error_retries: usize,
    pub profile_fields: Vec<String>,
}

impl Default for CollectorCfg {
    fn default() -> Self {
        Self {
            base_url: "https://api.vk.com/method".to_string(),
            access_token: String::new(),
            api_version: "5.131".to_string(),
            page_size: 100,
            request_delay: Duration::from_millis(100),
            error_backoff: Duration::from_secs(1),
            max_error_retries: 10,
            profile_fields: vec![
                "sex".to_string(),
                "bdate".to_string(),
                "has_photo".to_string(),
                "education".to_string(),
            ],
        }
    }
}

/// `{ "response": ... }` on success, `{ "error": ... }` on API-level failure.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error_code: i64,
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default)]
    count: Option<u64>,
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct WallPost {
    id: i64,
    owner_id: i64,
}

#[derive(Debug, Deserialize)]
struct WallComment {
    from_id: i64,
    #[serde(default)]
    text: String,
}

pub struct Collector {
    client: reqwest::blocking::Client,
    cfg: CollectorCfg,
}

impl Collector {
    pub fn new(cfg: CollectorCfg) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build HTTP client")?;
        Ok(Self { client, cfg })
    }

    /// Harvest every comment on `domain`'s wall plus the commenting users'
    /// profiles. Community replies (non-positive ids) are skipped.
    pub fn collect_group(&self, domain: &str) -> Result<Dump> {
        let mut data: BTreeMap<String, Vec<String>> = BTreeMap::new();

        let mut post_offset = 0usize;
        loop {
            let page: Page<WallPost> = self.call(
                "wall.get",
                &[
                    ("domain", domain.to_string()),
                    ("filter", "all".to_string()),
                    ("offset", post_offset.to_string()),
                    ("count", self.cfg.page_size.to_string()),
                ],
            )?;
            if page.items.is_empty() {
                tracing::info!(domain, "finished wall scan");
                break;
            }
            tracing::info!(offset = post_offset, total = page.count, "wall page");
            for post in &page.items {
                self.collect_post_comments(post, &mut data)?;
            }
            post_offset += self.cfg.page_size;
        }

        let users = self.collect_profiles(data.keys().cloned().collect())?;

        Ok(Dump {
            meta: Some(DumpMeta::now(domain)),
            users,
            data: data.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        })
    }

    fn collect_post_comments(
        &self,
        post: &WallPost,
        data: &mut BTreeMap<String, Vec<String>>,
    ) -> Result<()> {
        let mut offset = 0usize;
        loop {
            let page: Page<WallComment> = self.call(
                "wall.getComments",
                &[
                    ("owner_id", post.owner_id.to_string()),
                    ("post_id", post.id.to_string()),
                    ("sort", "asc".to_string()),
                    ("offset", offset.to_string()),
                    ("count", self.cfg.page_size.to_string()),
                ],
            )?;
            if page.items.is_empty() {
                return Ok(());
            }
            for c in page.items {
                if c.from_id > 0 {
                    data.entry(c.from_id.to_string()).or_default().push(c.text);
                }
            }
            offset += self.cfg.page_size;
        }
    }

    fn collect_profiles(&self, ids: Vec<String>) -> Result<BTreeMap<String, Value>> {
        let mut users = BTreeMap::new();
        for chunk in ids.chunks(self.cfg.page_size.max(1)) {
            let profiles: Vec<Value> = self.call(
                "users.get",
                &[
                    ("user_ids", chunk.join(",")),
                    ("fields", self.cfg.profile_fields.join(",")),
                ],
            )?;
            tracing::info!(fetched = profiles.len(), "profile page");
            for p in profiles {
                if let Some(id) = p.get("id").and_then(|v| v.as_i64()) {
                    users.insert(id.to_string(), p);
                }
            }
        }
        Ok(users)
    }

    /// One API call with the polite delay and a bounded error-retry loop.
    /// Transport errors propagate immediately; API-level errors back off and
    /// retry up to `max_error_retries` times.
    fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), method);
        let mut errors = 0usize;
        loop {
            sleep(self.cfg.request_delay);
            let mut req = self.client.get(&url).query(params);
            if !self.cfg.access_token.is_empty() {
                req = req.query(&[("access_token", self.cfg.access_token.as_str())]);
            }
            req = req.query(&[("v", self.cfg.api_version.as_str())]);

            let env: Envelope<T> = req
                .send()
                .and_then(|r| r.json())
                .with_context(|| format!("call {method}"))?;

            if let Some(err) = env.error {
                errors += 1;
                if errors > self.cfg.max_error_retries {
                    return Err(anyhow!(
                        "{} failed after {} retries: {}",
                        method,
                        errors - 1,
                        err.error_msg
                    ));
                }
                tracing::warn!(method, code = err.error_code, msg = %err.error_msg, "API error, backing off");
                sleep(self.cfg.error_backoff);
                continue;
            }
            return env
                .response
                .ok_or_else(|| anyhow!("{method}: empty response envelope"));
        }
    }
}
