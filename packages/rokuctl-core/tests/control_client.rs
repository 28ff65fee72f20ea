//! Integration tests for the ECP device client against a mock device.

use std::sync::{Arc, Mutex};

use rokuctl_core::ecp::ControlError;
use rokuctl_core::{
    ControlEvent, DeviceClient, DiscoveryEvent, EventEmitter, Launched, NoopEventEmitter,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<apps>
	<app id="2285" type="appl" version="6.81.0">Hulu</app>
	<app id="12" type="appl" version="4.2.100079005">Netflix</app>
	<app id="13535" type="appl" version="7.18.10">Plex - Free Movies &amp; TV</app>
	<app id="14295" type="appl" version="4.23.240318">Acorn TV</app>
	<app id="22297" type="appl" version="2.11.67">Spotify Music</app>
</apps>"#;

const ACTIVE_APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<active-app>
	<app id="12" type="appl" version="4.2.100079005">Netflix</app>
</active-app>"#;

/// Keeps every control event in arrival order.
#[derive(Default)]
struct RecordingEmitter {
    events: Mutex<Vec<ControlEvent>>,
}

impl RecordingEmitter {
    fn events(&self) -> Vec<ControlEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit_discovery(&self, _event: DiscoveryEvent) {}

    fn emit_control(&self, event: ControlEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn client_for(server: &MockServer) -> DeviceClient {
    client_with_emitter(server, Arc::new(NoopEventEmitter))
}

fn client_with_emitter(server: &MockServer, emitter: Arc<dyn EventEmitter>) -> DeviceClient {
    DeviceClient::new(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        emitter,
    )
}

async fn mount_apps(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/query/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_string(APPS_XML))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_launch(server: &MockServer, id: &str, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/launch/{}", id)))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_home(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/keypress/home"))
        .respond_with(ResponseTemplate::new(200))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_query_apps() {
    let server = MockServer::start().await;
    mount_apps(&server, 1).await;

    let apps = client_for(&server).query_apps().await.unwrap();

    assert_eq!(apps.len(), 5);
    assert_eq!(apps[0].id, "2285");
    assert_eq!(apps[0].name, "Hulu");
    assert_eq!(apps[2].name, "Plex - Free Movies &amp; TV");
}

#[tokio::test]
async fn test_query_apps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/apps"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).query_apps().await.unwrap_err();
    assert!(matches!(err, ControlError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_query_apps_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<apps><app id=\"1\">Hulu"))
        .mount(&server)
        .await;

    let err = client_for(&server).query_apps().await.unwrap_err();
    assert!(matches!(err, ControlError::Catalog(_)));
}

#[tokio::test]
async fn test_active_app() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/active-app"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACTIVE_APP_XML))
        .mount(&server)
        .await;

    let app = client_for(&server).active_app().await.unwrap();
    assert_eq!(app.id, "12");
    assert_eq!(app.name, "Netflix");
}

#[tokio::test]
async fn test_active_app_requires_exactly_one() {
    for (body, count) in [
        ("<active-app></active-app>", 0),
        (
            r#"<active-app><app id="1">A</app><app id="2">B</app></active-app>"#,
            2,
        ),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query/active-app"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let err = client_for(&server).active_app().await.unwrap_err();
        assert!(
            matches!(err, ControlError::UnexpectedAppCount(n) if n == count),
            "body {:?} gave {:?}",
            body,
            err
        );
    }
}

#[tokio::test]
async fn test_launch_accepts_200_and_204() {
    let server = MockServer::start().await;
    mount_launch(&server, "12", 200, 1).await;
    mount_launch(&server, "2285", 204, 1).await;

    let client = client_for(&server);
    client.launch("12").await.unwrap();
    client.launch("2285").await.unwrap();
}

#[tokio::test]
async fn test_launch_reports_whether_app_was_already_active() {
    let server = MockServer::start().await;
    mount_launch(&server, "12", 200, 1).await;
    mount_launch(&server, "2285", 204, 1).await;

    let recorder = Arc::new(RecordingEmitter::default());
    let client = client_with_emitter(&server, recorder.clone());
    client.launch("12").await.unwrap();
    client.launch("2285").await.unwrap();

    let device = client.base().to_string();
    let events = recorder.events();
    assert_eq!(events.len(), 2, "events: {:?}", events);
    assert!(matches!(
        &events[0],
        ControlEvent::AppLaunched { device: d, app_id, already_active: false, .. }
            if *d == device && app_id == "12"
    ));
    assert!(matches!(
        &events[1],
        ControlEvent::AppLaunched { app_id, already_active: true, .. } if app_id == "2285"
    ));
}

#[tokio::test]
async fn test_failed_launch_reports_nothing() {
    let server = MockServer::start().await;
    mount_launch(&server, "12", 500, 1).await;

    let recorder = Arc::new(RecordingEmitter::default());
    let client = client_with_emitter(&server, recorder.clone());
    client.launch("12").await.unwrap_err();

    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn test_launch_by_name_reports_catalog_then_launch() {
    let server = MockServer::start().await;
    mount_apps(&server, 1).await;
    mount_launch(&server, "14295", 200, 1).await;
    mount_home(&server, 1).await;

    let recorder = Arc::new(RecordingEmitter::default());
    let mut client = client_with_emitter(&server, recorder.clone());
    client.launch_by_name("acorn").await.unwrap();
    client.launch("0").await.unwrap();

    let events = recorder.events();
    assert_eq!(events.len(), 3, "events: {:?}", events);
    assert!(matches!(events[0], ControlEvent::CatalogFetched { apps: 5, .. }));
    assert!(matches!(
        &events[1],
        ControlEvent::AppLaunched { app_id, .. } if app_id == "14295"
    ));
    assert!(matches!(events[2], ControlEvent::HomePressed { .. }));
}

#[tokio::test]
async fn test_launch_other_status_is_error() {
    let server = MockServer::start().await;
    mount_launch(&server, "12", 500, 1).await;

    let err = client_for(&server).launch("12").await.unwrap_err();
    match err {
        ControlError::HttpStatus { target, status, .. } => {
            assert_eq!(target, "12");
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_launch_zero_presses_home() {
    let server = MockServer::start().await;
    mount_home(&server, 1).await;
    mount_launch(&server, "0", 200, 0).await;

    client_for(&server).launch("0").await.unwrap();
}

#[tokio::test]
async fn test_home_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/keypress/home"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).home().await.unwrap_err();
    assert!(matches!(err, ControlError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_launch_by_name_resolves_fuzzy_name() {
    let server = MockServer::start().await;
    mount_apps(&server, 1).await;
    mount_launch(&server, "14295", 200, 1).await;

    let mut client = client_for(&server);
    let launched = client.launch_by_name("acorn").await.unwrap();

    match launched {
        Launched::App(app) => assert_eq!(app.name, "Acorn TV"),
        Launched::Home => panic!("expected an app launch"),
    }
}

#[tokio::test]
async fn test_launch_by_name_fetches_catalog_once() {
    let server = MockServer::start().await;
    mount_apps(&server, 1).await;
    mount_launch(&server, "22297", 200, 1).await;
    mount_launch(&server, "2285", 200, 1).await;

    let mut client = client_for(&server);
    client.launch_by_name("spotfy").await.unwrap();
    client.launch_by_name("HULU").await.unwrap();
    assert_eq!(client.catalog().map(|c| c.len()), Some(5));
}

#[tokio::test]
async fn test_launch_by_name_home_skips_catalog() {
    let server = MockServer::start().await;
    mount_apps(&server, 0).await;
    mount_home(&server, 1).await;

    let mut client = client_for(&server);
    assert_eq!(client.launch_by_name("Home").await.unwrap(), Launched::Home);
    assert!(client.catalog().is_none());
}

#[tokio::test]
async fn test_launch_by_name_not_found() {
    let server = MockServer::start().await;
    mount_apps(&server, 1).await;

    let mut client = client_for(&server);
    let err = client.launch_by_name("xyzzy").await.unwrap_err();
    assert!(matches!(err, ControlError::AppNotFound(ref name) if name == "xyzzy"));
    assert_eq!(
        err.to_string(),
        "no applications found with a name like 'xyzzy'"
    );
}

#[tokio::test]
async fn test_preloaded_catalog_skips_fetch() {
    let server = MockServer::start().await;
    mount_apps(&server, 0).await;
    mount_launch(&server, "12", 200, 1).await;

    let mut client = client_for(&server);
    client.set_catalog(rokuctl_core::ecp::parse_apps(APPS_XML).unwrap());
    client.launch_by_name("netflix").await.unwrap();
}

#[tokio::test]
async fn test_unreachable_device_is_transport_error() {
    // Port 9 (discard) on loopback is not listening in test environments.
    let client = DeviceClient::new(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9/").unwrap(),
        Arc::new(NoopEventEmitter),
    );
    let err = client.home().await.unwrap_err();
    assert!(matches!(err, ControlError::Http { .. }));
}
