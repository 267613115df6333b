//! Integration tests for platform backends against mock APIs.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{json, Value};
use social_content_dashboard::platforms::{
    BlueskyClient, Credentials, LinkedInClient, Platform, PlatformError, PlatformManager,
    SocialPlatform,
};
use social_content_dashboard::thread::{PublishStatus, ReplyRef};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const CREATE_SESSION: &str = "/xrpc/com.atproto.server.createSession";
const CREATE_RECORD: &str = "/xrpc/com.atproto.repo.createRecord";

fn bluesky_credentials() -> Credentials {
    Credentials {
        username: Some(" @alice.bsky.social ".to_string()),
        password: Some("app-password".to_string()),
        ..Credentials::default()
    }
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(CREATE_SESSION))
        .and(body_partial_json(json!({ "identifier": "alice.bsky.social" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessJwt": "access-token",
            "refreshJwt": "refresh-token",
            "handle": "alice.bsky.social",
            "did": "did:plc:alice",
            "displayName": "Alice"
        })))
        .mount(server)
        .await;
}

/// Answers createRecord with a uri/cid derived from the request count.
fn record_responder() -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    let counter = std::sync::atomic::AtomicUsize::new(0);
    move |_req: &Request| {
        let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        ResponseTemplate::new(200).set_body_json(json!({
            "uri": format!("at://did:plc:alice/app.bsky.feed.post/{n}"),
            "cid": format!("cid{n}")
        }))
    }
}

async fn connected_bluesky(server: &MockServer) -> BlueskyClient {
    mount_session(server).await;
    let mut client = BlueskyClient::new(reqwest::Client::new(), &server.uri(), Duration::ZERO);
    let message = client
        .connect(&bluesky_credentials())
        .await
        .expect("connect");
    assert_eq!(message, "Successfully connected to Bluesky as @alice.bsky.social");
    client
}

async fn record_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter(|r| r.url.path() == CREATE_RECORD)
        .map(|r| serde_json::from_slice(&r.body).expect("json body"))
        .collect()
}

fn long_text() -> String {
    "Rust makes concurrent programming approachable and safe. ".repeat(15)
}

#[tokio::test]
async fn test_bluesky_connect_sets_account() {
    let server = MockServer::start().await;
    let client = connected_bluesky(&server).await;

    assert!(client.is_connected());
    let account = client.account().expect("account");
    assert_eq!(account.name, "Alice");
    assert_eq!(account.handle.as_deref(), Some("alice.bsky.social"));
    assert_eq!(
        account.profile_url.as_deref(),
        Some("https://bsky.app/profile/alice.bsky.social")
    );
}

#[tokio::test]
async fn test_bluesky_connect_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CREATE_SESSION))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        })))
        .mount(&server)
        .await;

    let mut client = BlueskyClient::new(reqwest::Client::new(), &server.uri(), Duration::ZERO);
    let err = client
        .connect(&bluesky_credentials())
        .await
        .expect_err("should fail");

    match err {
        PlatformError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid identifier or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_bluesky_connect_requires_credentials() {
    let mut client =
        BlueskyClient::new(reqwest::Client::new(), "http://127.0.0.1:9", Duration::ZERO);
    let err = client
        .connect(&Credentials::default())
        .await
        .expect_err("should fail");
    assert!(matches!(err, PlatformError::MissingCredentials(_)));
}

#[tokio::test]
async fn test_bluesky_short_post_is_single_record() {
    let server = MockServer::start().await;
    let client = connected_bluesky(&server).await;

    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .and(header("authorization", "Bearer access-token"))
        .respond_with(record_responder())
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client.post_content("Short and sweet.").await;
    assert_eq!(outcome.status, PublishStatus::Complete);
    assert!(outcome.message.starts_with("Posted successfully to Bluesky!"));

    let bodies = record_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["repo"], "did:plc:alice");
    assert_eq!(bodies[0]["collection"], "app.bsky.feed.post");
    assert_eq!(bodies[0]["record"]["text"], "Short and sweet.");
    assert!(bodies[0]["record"].get("reply").is_none());
}

#[tokio::test]
async fn test_bluesky_long_post_is_reply_chain() {
    let server = MockServer::start().await;
    let client = connected_bluesky(&server).await;

    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .respond_with(record_responder())
        .mount(&server)
        .await;

    let outcome = client.post_content(&long_text()).await;
    assert_eq!(outcome.status, PublishStatus::Complete);
    assert!(outcome.total > 1);
    assert_eq!(outcome.posted, outcome.total);
    assert_eq!(outcome.links.len(), outcome.total);

    let bodies = record_bodies(&server).await;
    assert_eq!(bodies.len(), outcome.total);

    let total = outcome.total;
    for (i, body) in bodies.iter().enumerate() {
        let text = body["record"]["text"].as_str().expect("text");
        assert!(text.starts_with(&format!("({}/{total}) ", i + 1)));
        assert!(text.chars().count() <= 300);

        if i == 0 {
            assert!(body["record"].get("reply").is_none());
        } else {
            let reply = &body["record"]["reply"];
            assert_eq!(reply["root"]["uri"], "at://did:plc:alice/app.bsky.feed.post/1");
            assert_eq!(reply["root"]["cid"], "cid1");
            assert_eq!(
                reply["parent"]["uri"],
                format!("at://did:plc:alice/app.bsky.feed.post/{i}")
            );
        }
    }
}

#[tokio::test]
async fn test_bluesky_post_linked_reply() {
    let server = MockServer::start().await;
    let client = connected_bluesky(&server).await;

    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .respond_with(record_responder())
        .expect(2)
        .mount(&server)
        .await;

    let root = client.post_single("Root post").await.expect("root");
    assert_eq!(root.uri, "at://did:plc:alice/app.bsky.feed.post/1");

    let reply = ReplyRef {
        root: root.clone(),
        parent: root.clone(),
    };
    let child = client
        .post_linked_reply("A reply", &reply)
        .await
        .expect("reply");
    assert_eq!(child.cid, "cid2");

    let bodies = record_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0]["record"].get("reply").is_none());
    assert_eq!(bodies[1]["record"]["text"], "A reply");
    assert_eq!(bodies[1]["record"]["reply"]["root"]["uri"], root.uri.as_str());
    assert_eq!(bodies[1]["record"]["reply"]["parent"]["cid"], "cid1");
}

#[tokio::test]
async fn test_bluesky_partial_thread_failure() {
    let server = MockServer::start().await;
    let client = connected_bluesky(&server).await;

    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .respond_with(record_responder())
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "InternalServerError",
            "message": "upstream failure"
        })))
        .mount(&server)
        .await;

    let outcome = client.post_content(&long_text()).await;
    assert_eq!(outcome.status, PublishStatus::Partial);
    assert!(outcome.success());
    assert_eq!(outcome.posted, 1);
    assert!(outcome
        .message
        .starts_with(&format!("Thread partially posted: 1/{} posts successful", outcome.total)));

    // Nothing is attempted after the failing segment.
    assert_eq!(record_bodies(&server).await.len(), 2);
}

#[tokio::test]
async fn test_bluesky_first_segment_failure() {
    let server = MockServer::start().await;
    let client = connected_bluesky(&server).await;

    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "InvalidRequest"
        })))
        .mount(&server)
        .await;

    let outcome = client.post_content(&long_text()).await;
    assert_eq!(outcome.status, PublishStatus::Failed);
    assert!(!outcome.success());
    assert!(outcome.message.contains("Thread posting failed at post 1"));
}

#[tokio::test]
async fn test_bluesky_refresh_session() {
    let server = MockServer::start().await;
    let mut client = connected_bluesky(&server).await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.refreshSession"))
        .and(header("authorization", "Bearer refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessJwt": "access-2",
            "refreshJwt": "refresh-2",
            "handle": "alice.bsky.social",
            "did": "did:plc:alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.refresh_session().await.expect("refresh");

    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(record_responder())
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client.post_content("After refresh.").await;
    assert_eq!(outcome.status, PublishStatus::Complete);
}

#[tokio::test]
async fn test_linkedin_token_connect_and_post() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/~"))
        .and(query_param(
            "projection",
            "(id,firstName,lastName,profilePicture(displayImage~:playableStreams))",
        ))
        .and(header("authorization", "Bearer li-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc123",
            "firstName": { "localized": { "en_US": "Ada" } },
            "lastName": { "localized": { "en_US": "Lovelace" } }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ugcPosts"))
        .and(header("x-restli-protocol-version", "2.0.0"))
        .and(body_partial_json(json!({
            "author": "urn:li:person:abc123",
            "lifecycleState": "PUBLISHED"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "urn:li:share:42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = LinkedInClient::new(reqwest::Client::new(), &server.uri(), Duration::ZERO);
    let message = client
        .connect(&Credentials {
            access_token: Some("li-token".to_string()),
            ..Credentials::default()
        })
        .await
        .expect("connect");
    assert_eq!(message, "Successfully connected to LinkedIn as Ada Lovelace");
    assert!(!client.is_demo());

    let outcome = client.post_content("Hello LinkedIn").await;
    assert_eq!(outcome.status, PublishStatus::Complete);
    assert_eq!(
        outcome.message,
        "Posted successfully to LinkedIn! Post ID: urn:li:share:42"
    );
}

#[tokio::test]
async fn test_linkedin_post_requires_created_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/~"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc123" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ugcPosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
        .mount(&server)
        .await;

    let mut client = LinkedInClient::new(reqwest::Client::new(), &server.uri(), Duration::ZERO);
    client
        .connect(&Credentials {
            access_token: Some("li-token".to_string()),
            ..Credentials::default()
        })
        .await
        .expect("connect");

    let outcome = client.post_content("Hello").await;
    assert_eq!(outcome.status, PublishStatus::Failed);
    assert!(outcome.message.starts_with("LinkedIn post failed:"));
}

#[tokio::test]
async fn test_manager_posts_to_live_and_demo_backends() {
    let server = MockServer::start().await;
    let bluesky = connected_bluesky(&server).await;
    Mock::given(method("POST"))
        .and(path(CREATE_RECORD))
        .respond_with(record_responder())
        .mount(&server)
        .await;

    let mut manager = PlatformManager::new();
    manager.register(Box::new(bluesky));
    manager.register(Box::new(LinkedInClient::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        Duration::ZERO,
    )));

    let linkedin = manager.get_mut(Platform::LinkedIn).expect("linkedin");
    linkedin
        .connect(&Credentials {
            demo: true,
            ..Credentials::default()
        })
        .await
        .expect("demo connect");

    let content = HashMap::from([
        (Platform::Bluesky, "Hello Bluesky".to_string()),
        (Platform::LinkedIn, "Hello LinkedIn".to_string()),
    ]);
    let results = manager
        .post_to_multiple(
            &content,
            &[Platform::Bluesky, Platform::LinkedIn, Platform::Threads],
        )
        .await;

    assert_eq!(results[&Platform::Bluesky].status, PublishStatus::Complete);
    assert_eq!(
        results[&Platform::LinkedIn].message,
        "Posted to LinkedIn successfully (Demo mode)"
    );
    assert_eq!(results[&Platform::Threads].status, PublishStatus::Failed);
}
