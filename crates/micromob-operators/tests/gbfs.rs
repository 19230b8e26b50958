//! Integration tests for the Bolt GBFS v2.1 re-publisher.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use micromob_core::BoltConfig;
use micromob_operators::gbfs::{BoltGbfs, FeedName, GbfsDocument};
use micromob_operators::{build_http_client, BoltSource};

const BASE: &str = "https://mobility.test/gbfs/bolt";

async fn publisher(server: &MockServer) -> BoltGbfs {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" })))
        .expect(1)
        .mount(server)
        .await;

    let client = build_http_client(5, "micromob-test/0.1").expect("client");
    let source = BoltSource::new(
        client,
        BoltConfig {
            url_auth: format!("{}/auth", server.uri()),
            url_oslo: format!("{}/gbfs/free_bike_status", server.uri()),
            url_gbfs: format!("{}/gbfs", server.uri()),
            api_user: "u".to_string(),
            api_pass: "p".to_string(),
        },
    );
    BoltGbfs::new(Arc::new(source))
}

async fn mount_feed(server: &MockServer, feed: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/gbfs/{feed}")))
        .and(bearer_token("t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn discovery_document_links_to_local_feeds() {
    let server = MockServer::start().await;
    let gbfs = publisher(&server).await;
    mount_feed(
        &server,
        "gbfs",
        json!({ "last_updated": 1_700_000_000, "ttl": 30, "data": {} }),
    )
    .await;

    let doc = gbfs.feed(FeedName::Gbfs, BASE).await.expect("gbfs feed");
    let json = serde_json::to_value(&doc).expect("serialize");

    assert!(matches!(doc, GbfsDocument::Discovery(_)));
    assert_eq!(json["version"], "2.1");
    assert_eq!(json["last_updated"], 1_700_000_000);
    assert_eq!(json["ttl"], 30);
    assert_eq!(
        json["data"]["en"]["feeds"][2]["url"],
        "https://mobility.test/gbfs/bolt/free_bike_status"
    );
}

#[tokio::test]
async fn free_bike_status_is_reshaped() {
    let server = MockServer::start().await;
    let gbfs = publisher(&server).await;
    mount_feed(
        &server,
        "free_bike_status",
        json!({ "last_updated": 1, "ttl": 0, "data": { "bikes": [
            { "bike_id": "x9", "lat": 59.9, "lon": 10.7, "is_reserved": 1, "is_disabled": 0 }
        ]}}),
    )
    .await;

    let doc = gbfs
        .feed(FeedName::FreeBikeStatus, BASE)
        .await
        .expect("free_bike_status");
    let json = serde_json::to_value(&doc).expect("serialize");
    let bike = &json["data"]["bikes"][0];

    assert_eq!(bike["bike_id"], "YBO:Scooter:x9");
    assert_eq!(bike["is_reserved"], true);
    assert_eq!(bike["is_disabled"], false);
    assert_eq!(bike["vehicle_type_id"], "YBO:VehicleType:Scooter");
    assert_eq!(bike["pricing_plan_id"], "YBO:PricingPlan:Basic");
}

#[tokio::test]
async fn system_information_namespaces_system_id() {
    let server = MockServer::start().await;
    let gbfs = publisher(&server).await;
    mount_feed(
        &server,
        "system_information",
        json!({ "last_updated": 5, "ttl": 60, "data": {
            "system_id": "bolt", "language": "en", "name": "Bolt", "timezone": "Europe/Oslo"
        }}),
    )
    .await;

    let doc = gbfs
        .feed(FeedName::SystemInformation, BASE)
        .await
        .expect("system_information");
    let json = serde_json::to_value(&doc).expect("serialize");

    assert_eq!(json["data"]["system_id"], "YBO:System:boltOslo");
    assert_eq!(json["data"]["timezone"], "Europe/Oslo");
    assert_eq!(json["ttl"], 60);
}

#[tokio::test]
async fn upstream_failure_is_an_error() {
    let server = MockServer::start().await;
    let gbfs = publisher(&server).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = gbfs.feed(FeedName::SystemRegions, BASE).await;

    assert_eq!(result.unwrap_err().status(), Some(502));
}
