// Environment checks: can we write every artifact, and are the configured
// endpoints answering?

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use tokio::time::Duration;

use crate::collector::reddit::{REDDIT_SEARCH_URL, USER_AGENT};
use crate::config::{Config, EngineKind};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub check: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DoctorReport {
    pub checks: Vec<Check>,
}

impl DoctorReport {
    pub fn all_ok(&self) -> bool {
        self.checks.iter().all(|check| check.ok)
    }
}

/// Whether `path`'s parent directory exists (creating it if needed) and is
/// not read-only.
pub fn check_writable(path: &Path) -> bool {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if fs::create_dir_all(parent).is_err() {
        return false;
    }
    fs::metadata(parent)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false)
}

/// Output directory checks only; no network.
pub fn output_checks(config: &Config) -> Vec<Check> {
    config
        .outputs
        .entries()
        .into_iter()
        .map(|(key, path)| Check {
            check: format!("output_writable:{key}"),
            ok: check_writable(&config.resolve(path)),
            endpoint: None,
        })
        .collect()
}

async fn probe(client: &Client, url: &str, params: &[(&str, &str)]) -> bool {
    match client.get(url).query(params).send().await {
        Ok(response) => response.status().as_u16() < 400,
        Err(_) => false,
    }
}

/// Run every check.
pub async fn run(config: &Config) -> Result<DoctorReport> {
    let mut checks = output_checks(config);

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(PROBE_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    for engine in &config.engines {
        if engine.name != EngineKind::Searxng {
            continue;
        }
        let ok = !engine.endpoint.is_empty()
            && probe(&client, &engine.endpoint, &[("q", "test"), ("format", "json")]).await;
        checks.push(Check {
            check: "searxng_reachable".to_string(),
            ok,
            endpoint: Some(engine.endpoint.clone()),
        });
    }

    if let Some(query) = config.reddit.queries.first() {
        let ok = probe(
            &client,
            REDDIT_SEARCH_URL,
            &[("q", query.as_str()), ("limit", "1"), ("type", "link")],
        )
        .await;
        checks.push(Check {
            check: "reddit_reachable".to_string(),
            ok,
            endpoint: None,
        });
    }

    Ok(DoctorReport { checks })
}
