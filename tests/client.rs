use std::time::Duration;

use ghpulse::cache::{PollOptions, PollingCache};
use ghpulse::dashboard::Resource;
use ghpulse::github::{Endpoint, MetricsClient, StatsMetric};
use ghpulse::models::{ActivityPayload, OverviewStats, RepositorySummary};
use ghpulse::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> MetricsClient {
    MetricsClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_get_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/github"))
        .and(query_param("type", "repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "name": "ghpulse",
                "stargazers_count": 42,
                "forks_count": 7,
                "size": 512,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-02-01T00:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repos: Vec<RepositorySummary> = client(&server)
        .get(Endpoint::Repositories)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].stars, 42);
    assert_eq!(repos[0].size_kb, 512);
}

#[tokio::test]
async fn test_stats_route_and_missing_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/github/stats"))
        .and(query_param("metric", "overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let stats: Option<OverviewStats> = client(&server)
        .get(Endpoint::Stats(StatsMetric::Overview))
        .await
        .unwrap();
    assert_eq!(stats, None);
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/github"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream rate limited"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get::<ActivityPayload>(Endpoint::Activity)
        .await
        .unwrap_err();
    match &err {
        Error::Api { status, message } => {
            assert_eq!(*status, 503);
            assert!(message.contains("upstream rate limited"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_clear_cache_posts_action() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/github"))
        .and(body_json(json!({"action": "clear-cache"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).clear_cache().await.unwrap();
}

#[tokio::test]
async fn test_cache_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/github"))
        .and(query_param("type", "activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "recentCommits": [{
                    "sha": "abc123",
                    "commit": {
                        "message": "Add heatmap\n\nRenders levels 0-4",
                        "author": {"name": "octo", "date": "2024-05-01T09:30:00Z"}
                    },
                    "html_url": "https://github.com/octo/site/commit/abc123",
                    "repository": {"name": "site"}
                }]
            }
        })))
        .mount(&server)
        .await;

    let cache = PollingCache::new(client(&server));
    let mut subscription = cache.subscribe(Some(Endpoint::Activity.key()), PollOptions::once());
    let entry = tokio::time::timeout(
        Duration::from_secs(5),
        subscription.wait_until(|entry| entry.is_settled()),
    )
    .await
    .unwrap();

    let payload: Resource<ActivityPayload> = Resource::from_entry(&entry);
    let payload = payload.data().unwrap();
    assert_eq!(payload.recent_commits.len(), 1);
    assert_eq!(payload.recent_commits[0].sha, "abc123");
    assert!(payload.recent_issues.is_empty());
}

#[tokio::test]
async fn test_cache_keeps_error_without_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cache = PollingCache::new(client(&server));
    let mut subscription = cache.subscribe(Some(Endpoint::Contributions.key()), PollOptions::once());
    let entry = tokio::time::timeout(
        Duration::from_secs(5),
        subscription.wait_until(|entry| entry.is_settled()),
    )
    .await
    .unwrap();

    assert!(entry.data.is_none());
    assert!(entry.error.is_some());
}
