use ava_bulletin::config::SignageConfig;
use ava_bulletin::{BulletinError, BulletinPipeline, EtlEngine, LocalStorage, Vocabulary};
use chrono::DateTime;
use httpmock::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_test::assert_ok;

fn config(endpoint: String, region_id: &str) -> SignageConfig {
    SignageConfig {
        api_endpoint: endpoint,
        lang: "fr".to_string(),
        region_id: region_id.to_string(),
        active_at: DateTime::parse_from_rfc3339("2025-01-05T08:00:00+01:00").unwrap(),
        output_path: "signage_bulletin_fr.html".to_string(),
        images_dir: "static/images".to_string(),
        image_href_prefix: "static/images".to_string(),
    }
}

fn engine(dir: &TempDir, config: SignageConfig) -> EtlEngine<BulletinPipeline<LocalStorage, SignageConfig>> {
    let storage = LocalStorage::new(dir.path().to_string_lossy().into_owned());
    EtlEngine::new(BulletinPipeline::new(storage, config, Arc::new(Vocabulary::french())))
}

fn bulletin() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {"properties": {
                "regions": [{"regionID": "CH-1111", "name": "Elsewhere"}],
                "dangerRatings": [{"mainValue": "very_high"}]
            }},
            {"properties": {
                "regions": [{"regionID": "CH-4211", "name": "Leukerbad - Lötschental"}],
                "dangerRatings": [
                    {"mainValue": "considerable", "customData": {"CH": {"subdivision": "plus"}}}
                ],
                "avalancheProblems": [
                    {
                        "problemType": "wind_slab",
                        "elevation": {"lowerBound": "2200"},
                        "aspects": ["N", "NE"],
                        "comment": "<p>Triebschnee  frais.</p>"
                    },
                    {
                        "problemType": "wind_slab",
                        "elevation": {"lowerBound": "2200"},
                        "aspects": ["N", "NE"],
                        "comment": "<p>Triebschnee  frais.</p>"
                    },
                    {"problemType": "no_distinct_avalanche_problem"}
                ]
            }}
        ]
    })
}

fn image_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_end_to_end_render() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/caaml/fr/geojson")
            .query_param("activeAt", "2025-01-05T08:00:00+01:00");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(bulletin());
    });

    let output_path = assert_ok!(engine(&temp_dir, config(server.url("/caaml"), "CH-4211")).run().await);
    api_mock.assert();
    assert_eq!(output_path, "signage_bulletin_fr.html");

    let html = std::fs::read_to_string(temp_dir.path().join("signage_bulletin_fr.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Niveau de danger: marqué (3+)"));
    assert!(html.contains("à plus de 2200m"));
    assert_eq!(html.matches("static/images/wind_slab.jpg").count(), 1);
    assert!(html.contains("Triebschnee frais."));
    assert!(!html.contains("<p>Triebschnee"));

    // 兩個相同問題合併成一組；另一組涵蓋所有坡向，各有一個羅盤圖示
    let icons = image_files(&temp_dir.path().join("static/images"));
    assert_eq!(icons.len(), 2);
    for icon in &icons {
        assert!(icon.starts_with("compass_fr_"));
        assert!(icon.ends_with(".svg"));
        assert!(html.contains(&format!("static/images/{}", icon)));
    }

    // 其他問題排在一般問題之後
    let ordinary = html.find("wind_slab.jpg").unwrap();
    let other = html.find("Pas de problème avalancheux particulier").unwrap();
    assert!(ordinary < other);
    assert!(!html.contains("no_distinct_avalanche_problem.jpg"));
}

#[tokio::test]
async fn test_region_not_found_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/caaml/fr/geojson");
        then.status(200).json_body(bulletin());
    });

    let result = engine(&temp_dir, config(server.url("/caaml"), "CH-9999")).run().await;

    match result {
        Err(e @ BulletinError::RegionNotFound { .. }) => {
            assert_eq!(e.user_friendly_message(), "Région CH-9999 introuvable.");
            assert_eq!(e.severity().exit_code(), 0);
        }
        other => panic!("expected RegionNotFound, got {:?}", other),
    }
    assert!(!temp_dir.path().join("signage_bulletin_fr.html").exists());
    assert!(!temp_dir.path().join("static").exists());
}

#[tokio::test]
async fn test_rerender_reuses_icons() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/caaml/fr/geojson");
        then.status(200).json_body(bulletin());
    });

    assert_ok!(engine(&temp_dir, config(server.url("/caaml"), "CH-4211")).run().await);
    let images = temp_dir.path().join("static/images");
    let first = image_files(&images);
    let icon_path = images.join(&first[0]);
    let svg = std::fs::read_to_string(&icon_path).unwrap();

    assert_ok!(engine(&temp_dir, config(server.url("/caaml"), "CH-4211")).run().await);

    api_mock.assert_hits(2);
    assert_eq!(image_files(&images), first);
    assert_eq!(std::fs::read_to_string(&icon_path).unwrap(), svg);
}

#[tokio::test]
async fn test_upstream_failure_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/caaml/fr/geojson");
        then.status(500);
    });

    let err = engine(&temp_dir, config(server.url("/caaml"), "CH-4211"))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BulletinError::ApiError(_)));
    assert_eq!(err.severity().exit_code(), 2);
    assert!(!temp_dir.path().join("signage_bulletin_fr.html").exists());
}
