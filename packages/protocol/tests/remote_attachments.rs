use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blockspring_protocol::{
    Fetcher, FileReference, HttpFetcher, Materialized, Parser, materialize,
};

#[tokio::test]
async fn url_attachment_is_fetched_into_a_temp_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/report.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a,b\n1,2\n".to_vec()))
        .mount(&server)
        .await;

    let url = format!("{}/files/report.csv", server.uri());

    let contents = tokio::task::spawn_blocking(move || {
        let reference = FileReference::remote("report.csv", url);
        match materialize(&reference, &HttpFetcher::new()) {
            Materialized::File(location) => std::fs::read(&location).unwrap(),
            Materialized::Unresolved => panic!("fetch must resolve"),
        }
    })
    .await
    .unwrap();

    assert_eq!(contents, b"a,b\n1,2\n");
}

#[tokio::test]
async fn missing_remote_file_passes_the_reference_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/gone.bin"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/files/gone.bin", server.uri());

    let resolved = tokio::task::spawn_blocking(move || {
        let reference = FileReference::remote("gone.bin", url);
        materialize(&reference, &HttpFetcher::new()).is_resolved()
    })
    .await
    .unwrap();

    assert!(!resolved);
}

#[tokio::test]
async fn envelope_with_url_attachment_parses_to_a_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/avatar.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4e]))
        .mount(&server)
        .await;

    let payload = json!({
        "_blockspring_spec": true,
        "name": "Ann",
        "avatar": {"filename": "avatar.png", "url": format!("{}/avatar.png", server.uri())},
    });

    let (name, avatar_bytes) = tokio::task::spawn_blocking(move || {
        let request = Parser::new().parse_value(payload).unwrap();
        let name = request.params()["name"].clone();
        let location = request.params()["avatar"].as_str().unwrap();
        let bytes = std::fs::read(location).unwrap();
        (name, bytes)
    })
    .await
    .unwrap();

    assert_eq!(name, json!("Ann"));
    assert_eq!(avatar_bytes, vec![0x89, 0x50, 0x4e]);
}

#[tokio::test]
async fn unreachable_host_passes_the_reference_through() {
    // No server at all; connection fails outright.
    let resolved = tokio::task::spawn_blocking(|| {
        let reference =
            FileReference::remote("nope.bin", "http://127.0.0.1:1/nope.bin");
        HttpFetcher::new().fetch(reference.url.as_deref().unwrap()).is_ok()
    })
    .await
    .unwrap();

    assert!(!resolved);
}
