mod common;

use common::{closed_address, Canned, FixtureServer};
use std::sync::Mutex;
use surveymap::prelude::*;

const COVERAGE_BODY: &str = r#"{
    "surveys": [
        {
            "id": "a1",
            "captureDate": "2021-03-01",
            "pixelSize": 0.075,
            "timezone": "Australia/Sydney",
            "resources": {"tiles": [{"id": "t1", "scale": 21, "type": "Vert"}]}
        },
        {
            "id": "b2",
            "captureDate": "2020-06-15",
            "resources": {"tiles": [{"type": "North"}]}
        },
        {
            "id": "c3",
            "captureDate": "2019-11-20",
            "resources": {"tiles": [{"type": "Vert"}, {"type": "South"}]}
        },
        {
            "id": "d4",
            "captureDate": "2018-02-02",
            "resources": {"tiles": null}
        }
    ]
}"#;

fn api_for(server: &FixtureServer) -> ApiConfig {
    ApiConfig {
        api_key: "test-key".into(),
        ..ApiConfig::with_base(&server.base)
    }
}

#[tokio::test]
async fn test_coverage_request_shape() {
    let server = FixtureServer::start(|_| Canned::json(COVERAGE_BODY)).await;
    let api = api_for(&server);
    let source = HttpCoverageSource::new(api.clone()).unwrap();
    let bounds = Bounds::new(-33.5, 151.5, 151.0, -34.0);

    let response = source.fetch_coverage(&bounds).await.unwrap();
    assert_eq!(response.surveys.as_ref().map(Vec::len), Some(4));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        "/coverage/v2/poly/151,-33.5,151.5,-33.5,151.5,-34,151,-34,151,-33.5?apikey=test-key&limit=1000"
    );
    assert_eq!(
        format!("{}{}", server.base, requests[0]),
        coverage_url(&api, &bounds)
    );
}

#[tokio::test]
async fn test_coverage_error_status() {
    let server = FixtureServer::start(|_| Canned::status(500)).await;
    let source = HttpCoverageSource::new(api_for(&server)).unwrap();

    let err = source
        .fetch_coverage(&Bounds::new(1.0, 1.0, 0.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::CoverageStatus { status: 500 }));
}

#[tokio::test]
async fn test_coverage_malformed_body() {
    let server = FixtureServer::start(|_| Canned::json("{\"surveys\": [")).await;
    let source = HttpCoverageSource::new(api_for(&server)).unwrap();

    let err = source
        .fetch_coverage(&Bounds::new(1.0, 1.0, 0.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::Serialization(_)));
}

#[tokio::test]
async fn test_coverage_unreachable() {
    let base = closed_address().await;
    let source = HttpCoverageSource::new(ApiConfig::with_base(&base)).unwrap();

    let err = source
        .fetch_coverage(&Bounds::new(1.0, 1.0, 0.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::Network(_)));
}

#[tokio::test]
async fn test_picker_over_http() {
    let server = FixtureServer::start(|path| {
        if path.starts_with("/coverage/") {
            Canned::json(COVERAGE_BODY)
        } else {
            Canned::ok(vec![0xFF, 0xD8, 0xFF])
        }
    })
    .await;

    let config = PickerConfig {
        api: api_for(&server),
        viewport_size: (256.0, 256.0),
        ..PickerConfig::default()
    };
    let dropdown = Arc::new(Mutex::new(MemoryDropdown::new()));
    let picker = PickerBuilder::with_config(config)
        .dropdown(Box::new(dropdown.clone()))
        .build()
        .unwrap();
    picker.selected_cell().set(Some("2019-12-01".into()));

    let update = picker.update_surveys().await.unwrap();
    assert_eq!(
        update,
        SurveyUpdate::Applied {
            available: 2,
            displayed: Some("2019-11-20".into()),
        }
    );
    assert_eq!(
        dropdown.lock().unwrap().values(),
        vec!["2021-03-01", "2019-11-20"]
    );

    let layer = picker.tile_layer().clone();
    let queued = picker.request_visible_tiles();
    assert!(queued > 0);

    let mut loaded = Vec::new();
    for _ in 0..100 {
        loaded.extend(layer.poll_loaded());
        if loaded.len() >= queued {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(loaded.len(), queued);
    assert!(loaded.iter().all(|tile| !tile.image.is_blank()));

    let tile_requests: Vec<String> = server
        .requests()
        .into_iter()
        .filter(|path| path.starts_with("/tiles/"))
        .collect();
    assert_eq!(tile_requests.len(), queued);
    assert!(tile_requests
        .iter()
        .all(|path| path.contains("/Vert/") && path.ends_with("&until=2019-11-20")));
}
