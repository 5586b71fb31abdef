use std::sync::{Arc, Mutex};
use std::time::Duration;

use interfaces_github_stargazers::{
    ClientConfig, Completion, FetchAllPagesError, FetchProgress, GetRepositoryError,
    GetUserError, GitHubClient, RateLimitError, RepositoryPayload, SendRequestError,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(
        ClientConfig::default()
            .with_base_url(server.uri())
            .with_token(Some("test-token".to_string()))
            .with_request_delay(Duration::ZERO),
    )
    .unwrap()
}

fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("X-RateLimit-Remaining", "4999")
        .insert_header("X-RateLimit-Reset", "1700000000")
        .set_body_json(body)
}

fn stargazer_page(start: usize, count: usize) -> Value {
    Value::Array(
        (start..start + count)
            .map(|i| json!({ "login": format!("user{i}"), "id": i }))
            .collect(),
    )
}

fn widget() -> RepositoryPayload {
    RepositoryPayload {
        full_name: "acme/widget".to_string(),
        stargazers_count: 250,
        forks_count: 12,
        watchers_count: 250,
    }
}

async fn mount_page(server: &MockServer, page: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/stargazers"))
        .and(query_param("page", page))
        .and(query_param("per_page", "100"))
        .respond_with(ok_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn pagination_stops_on_first_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "1", stargazer_page(0, 100)).await;
    mount_page(&server, "2", stargazer_page(100, 100)).await;
    mount_page(&server, "3", stargazer_page(200, 50)).await;
    mount_page(&server, "4", json!([])).await;

    let result = client(&server)
        .list_stargazers(&widget(), None)
        .await
        .unwrap();

    assert_eq!(result.completion, Completion::Exhausted);
    assert_eq!(result.pages_requested, 4);
    assert_eq!(result.items.len(), 250);
    assert_eq!(result.items[0].login, "user0");
    assert_eq!(result.items[249].login, "user249");
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn pagination_ignores_the_estimate() {
    let server = MockServer::start().await;
    mount_page(&server, "1", stargazer_page(0, 100)).await;
    mount_page(&server, "2", stargazer_page(100, 100)).await;
    mount_page(&server, "3", stargazer_page(200, 100)).await;
    mount_page(&server, "4", stargazer_page(300, 100)).await;
    mount_page(&server, "5", json!([])).await;

    let mut repository = widget();
    repository.stargazers_count = 10;

    let result = client(&server)
        .list_stargazers(&repository, None)
        .await
        .unwrap();

    assert_eq!(result.items.len(), 400);
    assert_eq!(result.pages_requested, 5);
}

#[tokio::test]
async fn failed_page_keeps_earlier_items() {
    let server = MockServer::start().await;
    mount_page(&server, "1", stargazer_page(0, 100)).await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/stargazers"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(502)
                .insert_header("X-RateLimit-Remaining", "4998")
                .insert_header("X-RateLimit-Reset", "1700000000")
                .set_body_json(json!({ "message": "Server Error" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .list_stargazers(&widget(), None)
        .await
        .unwrap();

    assert_eq!(
        result.completion,
        Completion::Interrupted {
            page: 2,
            status: StatusCode::BAD_GATEWAY
        }
    );
    assert_eq!(result.items.len(), 100);
}

#[tokio::test]
async fn progress_events_follow_the_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "1", stargazer_page(0, 100)).await;
    mount_page(&server, "2", stargazer_page(100, 20)).await;
    mount_page(&server, "3", json!([])).await;

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let on_progress = move |event: FetchProgress| sink.lock().unwrap().push(event);

    let mut repository = widget();
    repository.stargazers_count = 120;
    client(&server)
        .list_stargazers(&repository, Some(&on_progress))
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            FetchProgress::Started {
                label: "acme/widget".to_string(),
                estimated_pages: Some(2),
            },
            FetchProgress::PageFetched {
                page: 1,
                count: 100,
                total_so_far: 100
            },
            FetchProgress::PageFetched {
                page: 2,
                count: 20,
                total_so_far: 120
            },
            FetchProgress::Finished { total: 120 },
        ]
    );
}

#[tokio::test]
async fn progress_callback_may_borrow_local_state() {
    let server = MockServer::start().await;
    mount_page(&server, "1", stargazer_page(0, 3)).await;
    mount_page(&server, "2", json!([])).await;

    let pages = Mutex::new(0u32);
    let on_progress = |event: FetchProgress| {
        if let FetchProgress::PageFetched { .. } = event {
            *pages.lock().unwrap() += 1;
        }
    };

    let mut repository = widget();
    repository.stargazers_count = 3;
    client(&server)
        .list_stargazers(&repository, Some(&on_progress))
        .await
        .unwrap();

    assert_eq!(*pages.lock().unwrap(), 1);
}

#[tokio::test]
async fn missing_rate_limit_headers_fail_loudly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/stargazers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stargazer_page(0, 3)))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_stargazers(&widget(), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchAllPagesError::SendRequest {
            source: SendRequestError::RateLimit {
                source: RateLimitError::MissingHeader { .. }
            }
        }
    ));
}

#[tokio::test]
async fn get_repository_sends_api_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ok_json(json!({
            "full_name": "acme/widget",
            "stargazers_count": 250,
            "forks_count": 12,
            "watchers_count": 250,
            "private": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repository = client(&server).get_repository("acme/widget").await.unwrap();
    assert_eq!(repository, widget());
}

#[tokio::test]
async fn get_repository_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-RateLimit-Remaining", "4999")
                .insert_header("X-RateLimit-Reset", "1700000000")
                .set_body_json(json!({ "message": "Not Found" })),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .get_repository("acme/missing")
        .await
        .unwrap_err();
    assert!(matches!(err, GetRepositoryError::NotFound { full_name } if full_name == "acme/missing"));
}

#[tokio::test]
async fn get_user_reports_status_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-RateLimit-Remaining", "4999")
                .insert_header("X-RateLimit-Reset", "1700000000")
                .set_body_json(json!({ "message": "Not Found" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).get_user("ghost").await.unwrap_err();
    assert!(!err.is_rate_limit());
    assert!(matches!(
        err,
        GetUserError::UnexpectedStatus { status, .. } if status == StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn get_user_decodes_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice"))
        .respond_with(ok_json(json!({
            "login": "alice",
            "name": "Alice",
            "company": null,
            "blog": "https://alice.dev",
            "public_repos": 7,
            "followers": 3,
            "following": 1,
            "created_at": "2012-03-04T05:06:07Z"
        })))
        .mount(&server)
        .await;

    let user = client(&server).get_user("alice").await.unwrap();
    assert_eq!(user.login, "alice");
    assert_eq!(user.name.as_deref(), Some("Alice"));
    assert_eq!(user.company, None);
    assert_eq!(user.public_repos, Some(7));
    assert_eq!(user.public_gists, None);
    assert_eq!(user.created_at.as_deref(), Some("2012-03-04T05:06:07Z"));
}
