mod common;

use std::time::Duration;

use analyzer_engine::{
    fetch_page_content, AcquisitionError, ExtractionFailure, FetchSettings, HttpTabs, Relay,
    RelayChannel, RelayRequest, ReqwestFetcher, TabProvider, DEFAULT_CONTENT_TIMEOUT,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_tabs(settings: FetchSettings) -> HttpTabs<ReqwestFetcher> {
    HttpTabs::new(ReqwestFetcher::new(settings).expect("fetcher"))
}

#[tokio::test]
async fn fetched_page_flows_through_relay_channel() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/story"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>Story</title><meta name=\"keywords\" content=\"peace\"></head>\
             <body><p>Negotiators agreed on a framework.</p></body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let tabs = http_tabs(FetchSettings::default());
    tabs.open(&format!("{}/story", server.uri())).expect("open tab");
    let channel = RelayChannel::spawn(Relay::with_document_extractor(tabs));

    let page = fetch_page_content(
        &channel,
        &RelayRequest::get_page_content(),
        DEFAULT_CONTENT_TIMEOUT,
    )
    .await
    .expect("page");

    assert_eq!(page.title, "Story");
    assert_eq!(page.content, "Negotiators agreed on a framework.");
    assert_eq!(page.keywords.as_deref(), Some("peace"));
    assert!(page.url.ends_with("/story"));
}

#[tokio::test]
async fn http_failure_becomes_extraction_error() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tabs = http_tabs(FetchSettings::default());
    tabs.open(&format!("{}/gone", server.uri())).expect("open tab");
    let channel = RelayChannel::spawn(Relay::with_document_extractor(tabs));

    let err = fetch_page_content(
        &channel,
        &RelayRequest::get_page_content(),
        DEFAULT_CONTENT_TIMEOUT,
    )
    .await
    .unwrap_err();

    match err {
        AcquisitionError::Extraction(message) => assert!(message.contains("http status 404")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn oversized_and_unsupported_documents_are_refused() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "image/png"))
        .mount(&server)
        .await;

    let tabs = http_tabs(FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    });
    let large = tabs.open(&format!("{}/large", server.uri())).unwrap();
    let image = tabs.open(&format!("{}/image", server.uri())).unwrap();

    let err = tabs.load(large).await.unwrap_err();
    assert!(
        matches!(&err, ExtractionFailure::LoadFailed { reason, .. } if reason.contains("too large")),
        "{err:?}"
    );
    let err = tabs.load(image).await.unwrap_err();
    assert!(
        matches!(&err, ExtractionFailure::LoadFailed { reason, .. } if reason.contains("unsupported content type")),
        "{err:?}"
    );
}

#[tokio::test]
async fn slow_server_hits_request_timeout() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let tabs = http_tabs(FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    });
    let tab = tabs.open(&format!("{}/slow", server.uri())).unwrap();

    let err = tabs.load(tab).await.unwrap_err();
    assert!(
        matches!(&err, ExtractionFailure::LoadFailed { reason, .. } if reason.starts_with("timeout")),
        "{err:?}"
    );
}

#[test]
fn non_http_urls_cannot_be_opened() {
    let tabs = http_tabs(FetchSettings::default());
    assert!(tabs.open("file:///etc/passwd").is_err());
    assert!(tabs.open("not a url").is_err());
}
