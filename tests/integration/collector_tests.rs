//! Integration tests for the collectors
//!
//! These tests use wiremock to stand in for the provider APIs and exercise
//! each retrieval protocol end-to-end, including its failure policy.

use ats_postings::collectors::{ashby, greenhouse, lever};
use ats_postings::{collect_postings, CollectionIssue, CollectorConfig, PostingsError, Provider};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Points every provider endpoint at the mock server
fn create_test_config(server: &MockServer) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.ashby.api_base = server.uri();
    config.ashby.graphql_base = server.uri();
    config.greenhouse.api_base = server.uri();
    config.lever.api_base = server.uri();
    config
}

async fn mount_ashby_detail(server: &MockServer, posting_id: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/non-user-graphql"))
        .and(query_param("op", "ApiJobPosting"))
        .and(body_partial_json(json!({
            "variables": {"organizationHostedJobsPageName": "acme", "jobPostingId": posting_id}
        })))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn ashby_detail(html: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {"jobPosting": {"id": "x", "title": "x", "descriptionHtml": html}}
    }))
}

#[tokio::test]
async fn test_greenhouse_combined_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/boards/acme/jobs"))
        .and(query_param("content", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": [
            {"id": 1, "title": "Engineer", "content": "<p>Build things</p>",
             "departments": [{"name": "Eng"}]},
            {"id": 2, "title": "Intern", "content": "<p>Learn</p>"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let table = greenhouse::get_postings("https://boards.greenhouse.io/acme", &config)
        .await
        .expect("Greenhouse board should be collected");

    assert_eq!(table.provider(), Provider::Greenhouse);
    assert_eq!(table.len(), 2);

    let first = &table.rows()[0];
    assert_eq!(first.posting_id(), "1");
    assert_eq!(first.title(), "Engineer");
    assert_eq!(first.team(), Some("Eng"));
    assert_eq!(first.description(), "Build things");

    let second = &table.rows()[1];
    assert_eq!(second.posting_id(), "2");
    assert_eq!(second.team(), Some(""));
    assert_eq!(second.location(), None);
    assert_eq!(second.description(), "Learn");
}

#[tokio::test]
async fn test_greenhouse_server_error_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/boards/acme/jobs"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let result = greenhouse::get_postings("https://boards.greenhouse.io/acme", &config).await;

    match result {
        Err(PostingsError::UpstreamUnavailable { provider, reason, .. }) => {
            assert_eq!(provider, Provider::Greenhouse);
            assert_eq!(reason, "HTTP 500");
        }
        other => panic!("expected UpstreamUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_greenhouse_missing_board_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/boards/ghost/jobs"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"status": 404, "error": "Job not found"})),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let result = greenhouse::get_postings("https://boards.greenhouse.io/ghost", &config).await;
    assert!(matches!(result, Err(PostingsError::UpstreamUnavailable { .. })));
}

#[tokio::test]
async fn test_greenhouse_envelope_error_yields_empty_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/boards/acme/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "board disabled"})))
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let table = greenhouse::get_postings("https://boards.greenhouse.io/acme", &config)
        .await
        .expect("envelope errors are not raised");

    assert!(table.is_empty());
    assert!(table.envelope_error().is_some());
}

#[tokio::test]
async fn test_greenhouse_timeout_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/boards/slow/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jobs": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.greenhouse.timeout_secs = 1;

    let result = greenhouse::get_postings("https://boards.greenhouse.io/slow", &config).await;
    assert!(matches!(result, Err(PostingsError::UpstreamUnavailable { .. })));
}

#[tokio::test]
async fn test_lever_combined_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/postings/kong"))
        .and(query_param("mode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a1",
                "text": "Backend Engineer",
                "categories": {"location": "Remote", "team": "Platform"},
                "description": "<div>Own <b>APIs</b><script>track()</script></div>"
            },
            {"id": "a2", "text": "Recruiter"},
            {"text": "No id at all"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let table = lever::get_postings("https://jobs.lever.co/kong/", &config)
        .await
        .expect("Lever board should be collected");

    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped(), 1);

    let first = table.get("a1").expect("a1 present");
    assert_eq!(first.location(), Some("Remote"));
    assert_eq!(first.team(), Some("Platform"));
    assert_eq!(
        first.description_html(),
        Some("<div>Own <b>APIs</b><script>track()</script></div>")
    );
    assert_eq!(first.description(), "Own APIs");

    let second = table.get("a2").expect("a2 present");
    assert_eq!(second.location(), None);
    assert_eq!(second.team(), None);
}

#[tokio::test]
async fn test_lever_not_found_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/postings/ghost"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"ok": false, "error": "Document not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let result = lever::get_postings("https://jobs.lever.co/ghost", &config).await;
    assert!(matches!(
        result,
        Err(PostingsError::UpstreamUnavailable { provider: Provider::Lever, .. })
    ));
}

#[tokio::test]
async fn test_ashby_rest_listing_with_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .and(query_param("organizationSlug", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": [
            {"id": "p1", "title": "Engineer", "location": "NYC", "team": "Core"},
            {"id": "p2", "title": "Designer", "location": "Remote"},
            {"id": "p3", "title": "Manager"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    mount_ashby_detail(&server, "p1", ashby_detail("<p>Ship <b>it</b></p>")).await;
    mount_ashby_detail(
        &server,
        "p2",
        ResponseTemplate::new(200).set_body_json(json!({"errors": [{"message": "Not found"}]})),
    )
    .await;
    mount_ashby_detail(&server, "p3", ashby_detail("<ul><li>Lead</li></ul>")).await;

    let config = create_test_config(&server);
    let table = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config)
        .await
        .expect("Ashby board should be collected");

    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped(), 1);
    assert!(table.get("p2").is_none());

    let first = table.get("p1").expect("p1 present");
    assert_eq!(first.location(), Some("NYC"));
    assert_eq!(first.team(), Some("Core"));
    assert_eq!(first.description_html(), Some("<p>Ship <b>it</b></p>"));
    assert_eq!(first.description(), "Ship it");

    let third = table.get("p3").expect("p3 present");
    assert_eq!(third.team(), None);
    assert_eq!(third.description(), "Lead");

    assert!(matches!(
        &table.issues()[0],
        CollectionIssue::DroppedPosting { posting_id: Some(id), .. } if id == "p2"
    ));
}

/// Mounts a REST listing of `p1`, `p2` and `p3` on the `acme` board
async fn mount_ashby_rest_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .and(query_param("organizationSlug", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": [
            {"id": "p1", "title": "Engineer"},
            {"id": "p2", "title": "Designer"},
            {"id": "p3", "title": "Manager"}
        ]})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ashby_detail_timeout_drops_only_that_posting() {
    let server = MockServer::start().await;
    mount_ashby_rest_listing(&server).await;

    mount_ashby_detail(&server, "p1", ashby_detail("<p>One</p>")).await;
    mount_ashby_detail(
        &server,
        "p2",
        ashby_detail("<p>Too late</p>").set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_ashby_detail(&server, "p3", ashby_detail("<p>Three</p>")).await;

    let mut config = create_test_config(&server);
    config.ashby.graphql_timeout_secs = 1;

    let table = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config)
        .await
        .expect("a slow detail should not fail the board");

    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped(), 1);
    assert!(table.get("p2").is_none());
    assert_eq!(table.get("p1").expect("p1 present").description(), "One");
    assert_eq!(table.get("p3").expect("p3 present").description(), "Three");
}

#[tokio::test]
async fn test_ashby_non_json_detail_drops_only_that_posting() {
    let server = MockServer::start().await;
    mount_ashby_rest_listing(&server).await;

    mount_ashby_detail(&server, "p1", ashby_detail("<p>One</p>")).await;
    mount_ashby_detail(&server, "p2", ashby_detail("<p>Two</p>")).await;
    mount_ashby_detail(
        &server,
        "p3",
        ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
    )
    .await;

    let config = create_test_config(&server);
    let table = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config)
        .await
        .expect("an unreadable detail should not fail the board");

    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped(), 1);
    assert!(table.get("p3").is_none());
    assert!(matches!(
        &table.issues()[0],
        CollectionIssue::DroppedPosting { posting_id: Some(id), .. } if id == "p3"
    ));
}

#[tokio::test]
async fn test_ashby_listing_timeout_falls_back_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jobs": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/non-user-graphql"))
        .and(query_param("op", "ApiJobBoardWithTeams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"jobBoard": {
            "teams": [],
            "jobPostings": [{"id": "g1", "title": "Engineer", "locationName": "Remote"}]
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    mount_ashby_detail(&server, "g1", ashby_detail("<p>Code</p>")).await;

    let mut config = create_test_config(&server);
    config.ashby.list_timeout_secs = 1;

    let table = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config)
        .await
        .expect("a slow REST listing should fall back to GraphQL");

    assert_eq!(table.len(), 1);
    assert_eq!(table.dropped(), 0);
    let row = table.get("g1").expect("g1 present");
    assert_eq!(row.location(), Some("Remote"));
    assert_eq!(row.description(), "Code");
}

#[tokio::test]
async fn test_ashby_falls_back_to_graphql_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/non-user-graphql"))
        .and(query_param("op", "ApiJobBoardWithTeams"))
        .and(body_partial_json(json!({
            "operationName": "ApiJobBoardWithTeams",
            "variables": {"organizationHostedJobsPageName": "acme"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"jobBoard": {
            "teams": [{"id": "t1", "name": "Engineering"}],
            "jobPostings": [
                {"id": "g1", "title": "Engineer", "teamId": "t1", "locationName": "Berlin"},
                {"id": "g2", "title": "Analyst", "teamId": "t9", "locationName": null}
            ]
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    mount_ashby_detail(&server, "g1", ashby_detail("<p>Code</p>")).await;
    mount_ashby_detail(&server, "g2", ashby_detail("<p>Numbers</p>")).await;

    let config = create_test_config(&server);
    let table = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config)
        .await
        .expect("fallback listing should succeed");

    assert_eq!(table.len(), 2);

    let first = table.get("g1").expect("g1 present");
    assert_eq!(first.team(), Some("Engineering"));
    assert_eq!(first.location(), Some("Berlin"));
    assert_eq!(first.description(), "Code");

    let second = table.get("g2").expect("g2 present");
    assert_eq!(second.team(), Some("t9"));
    assert_eq!(second.location(), None);
}

#[tokio::test]
async fn test_ashby_failed_fallback_yields_empty_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/non-user-graphql"))
        .and(query_param("op", "ApiJobBoardWithTeams"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"message": "Organization not found"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let table = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config)
        .await
        .expect("a failed fallback is not raised");

    assert!(table.is_empty());
    assert!(table
        .envelope_error()
        .is_some_and(|payload| payload.contains("Organization not found")));
}

#[tokio::test]
async fn test_ashby_fallback_without_body_yields_empty_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/non-user-graphql"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let table = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config)
        .await
        .expect("a failed fallback is not raised");

    assert!(table.is_empty());
    assert_eq!(table.issues().len(), 1);
}

#[tokio::test]
async fn test_ashby_unreachable_fallback_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.ashby.graphql_base = "http://127.0.0.1:1".to_string();

    let result = ashby::get_postings("https://jobs.ashbyhq.com/acme", &config).await;
    assert!(matches!(
        result,
        Err(PostingsError::UpstreamUnavailable { provider: Provider::Ashby, .. })
    ));
}

#[tokio::test]
async fn test_ashby_slug_is_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posting-api/job-board"))
        .and(query_param("organizationSlug", "hippocratic-ai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let table = ashby::get_postings("https://jobs.ashbyhq.com/Hippocratic%20AI", &config)
        .await
        .expect("empty board is fine");

    assert!(table.is_empty());
    assert_eq!(table.token(), "hippocratic-ai");
    assert!(table.issues().is_empty());
}

#[tokio::test]
async fn test_collect_postings_dispatches_by_host() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/postings/kong"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "l1", "text": "Engineer"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let table = collect_postings("https://jobs.lever.co/kong", &config)
        .await
        .expect("dispatch to Lever");

    assert_eq!(table.provider(), Provider::Lever);
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_invalid_board_url_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let result = greenhouse::get_postings("https://boards.greenhouse.io//", &config).await;
    assert!(matches!(result, Err(PostingsError::InvalidBoardUrl(_))));
}
