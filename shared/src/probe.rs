//! Best-effort intranet reachability probing.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use crate::settle::settle_once;

/// Upper bound on a probe request left running after its timeout fired.
const ORPHAN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Decides whether a restricted network answers.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Try `candidates` in order; `true` as soon as one answers within
    /// `timeout`. Never fails: every error path is `false`.
    async fn probe(&self, candidates: &[String], timeout: Duration) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeSignal {
    Loaded,
    Failed,
    TimedOut,
}

/// Probes candidates with unauthenticated, cache-busted GET requests.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    secure_context: bool,
}

impl HttpProber {
    /// Build a prober. `secure_context` enables the http→https upgrade
    /// variant for plain-http candidates.
    pub fn new(secure_context: bool) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(ORPHAN_REQUEST_TIMEOUT)
            .build()
            .context("failed to build probe http client")?;
        Ok(Self::with_client(client, secure_context))
    }

    /// Build a prober around an existing client.
    pub fn with_client(client: reqwest::Client, secure_context: bool) -> Self {
        Self {
            client,
            secure_context,
        }
    }

    async fn probe_one(&self, candidate: &str, timeout: Duration) -> bool {
        let Ok(mut url) = Url::parse(candidate) else {
            tracing::debug!(candidate, "probe candidate is not a valid url");
            return false;
        };
        url.query_pairs_mut()
            .append_pair("_t", &Utc::now().timestamp_millis().to_string());

        let (settler, settled) = settle_once::<ProbeSignal>();
        let started_at = Instant::now();

        // The request is never aborted; once the timer wins, its outcome is
        // simply not observed.
        {
            let settler = settler.clone();
            let client = self.client.clone();
            tokio::spawn(async move {
                let signal = match client.get(url).send().await {
                    Ok(response) if response.status().is_success() => ProbeSignal::Loaded,
                    _ => ProbeSignal::Failed,
                };
                settler.settle(signal);
            });
        }
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            settler.settle(ProbeSignal::TimedOut);
        });

        let signal = settled.wait().await.unwrap_or(ProbeSignal::Failed);
        timer.abort();

        tracing::debug!(
            candidate,
            outcome = ?signal,
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "probe candidate settled"
        );
        signal == ProbeSignal::Loaded
    }
}

#[async_trait]
impl ReachabilityProbe for HttpProber {
    async fn probe(&self, candidates: &[String], timeout: Duration) -> bool {
        if candidates.is_empty() {
            return false;
        }
        for candidate in expand_candidates(candidates, self.secure_context) {
            if self.probe_one(&candidate, timeout).await {
                tracing::info!(candidate = %candidate, "intranet probe succeeded");
                return true;
            }
        }
        tracing::info!(candidates = candidates.len(), "intranet probe found nothing reachable");
        false
    }
}

/// Candidate order actually probed.
///
/// In a secure context every plain-http candidate is followed directly by
/// its https variant. Nothing else is added.
pub fn expand_candidates(candidates: &[String], secure_context: bool) -> Vec<String> {
    let mut expanded = Vec::with_capacity(candidates.len() * 2);
    for candidate in candidates {
        expanded.push(candidate.clone());
        if !secure_context {
            continue;
        }
        let Ok(mut url) = Url::parse(candidate) else {
            continue;
        };
        if url.scheme() == "http" && url.set_scheme("https").is_ok() {
            expanded.push(url.to_string());
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn prober() -> HttpProber {
        HttpProber::with_client(reqwest::Client::new(), false)
    }

    #[test]
    fn secure_context_adds_https_variant_after_http_candidate() {
        let candidates = vec![
            "http://intra.corp/ping.gif".to_string(),
            "https://secure.corp/ping.gif".to_string(),
        ];
        assert_eq!(expand_candidates(&candidates, false), candidates);
        assert_eq!(expand_candidates(&candidates, true), vec![
            "http://intra.corp/ping.gif".to_string(),
            "https://intra.corp/ping.gif".to_string(),
            "https://secure.corp/ping.gif".to_string(),
        ]);
    }

    #[tokio::test]
    async fn empty_candidates_resolve_false_immediately() {
        let started_at = Instant::now();
        assert!(!prober().probe(&[], Duration::from_secs(5)).await);
        assert!(started_at.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn first_success_wins_and_stops_the_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/c.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let candidates = ["a.png", "b.png", "c.png"]
            .iter()
            .map(|name| format!("{}/{name}", server.uri()))
            .collect::<Vec<_>>();
        assert!(prober().probe(&candidates, Duration::from_secs(2)).await);
    }

    #[tokio::test]
    async fn slow_candidate_times_out_and_next_one_is_tried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.png"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast.png"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let slow_only = vec![format!("{}/slow.png", server.uri())];
        let started_at = Instant::now();
        assert!(!prober().probe(&slow_only, Duration::from_millis(150)).await);
        assert!(started_at.elapsed() < Duration::from_secs(2));

        let slow_then_fast = vec![
            format!("{}/slow.png", server.uri()),
            format!("{}/fast.png", server.uri()),
        ];
        assert!(prober().probe(&slow_then_fast, Duration::from_millis(150)).await);
    }

    #[tokio::test]
    async fn unreachable_and_invalid_candidates_resolve_false() {
        let candidates = vec!["not a url".to_string(), "http://127.0.0.1:9/ping.png".to_string()];
        assert!(!prober().probe(&candidates, Duration::from_millis(500)).await);
    }

    #[tokio::test]
    async fn cache_buster_is_appended_to_existing_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(query_param("v", "1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = vec![format!("{}/ping?v=1", server.uri())];
        assert!(prober().probe(&candidates, Duration::from_secs(2)).await);

        let requests = server.received_requests().await.expect("recording enabled");
        assert!(requests[0].url.query_pairs().any(|(key, _)| key == "_t"));
    }
}
