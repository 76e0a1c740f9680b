use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use kerbside_core::{
    CollectionEvent, CouncilLocator, CouncilMeta, CouncilPlugin, Councils, KerbsideService,
    PluginRegistry, PortError, SourceAdapter,
};
use kerbside_server::build_router;
use serde_json::{Value, json};
use tokio::net::TcpListener;

struct KeywordLocator;

#[async_trait]
impl CouncilLocator for KeywordLocator {
    async fn locate(&self, address: &str) -> Result<Option<String>, PortError> {
        Ok(if address.contains("Clayton") {
            Some("City of Monash".to_owned())
        } else if address.contains("Frankston") {
            Some("Frankston City".to_owned())
        } else if address.contains("Docklands") {
            Some("Melbourne City".to_owned())
        } else {
            None
        })
    }
}

struct MonashStub(CouncilMeta);

#[async_trait]
impl SourceAdapter for MonashStub {
    fn council(&self) -> &CouncilMeta {
        &self.0
    }

    async fn fetch(&self, address: &str) -> Result<Vec<CollectionEvent>, PortError> {
        if address.starts_with("999") {
            return Err(PortError::AddressNotFound);
        }
        Ok(vec![CollectionEvent {
            date: NaiveDate::from_ymd_opt(2024, 3, 12).expect("valid test date"),
            label: "Landfill Waste".to_owned(),
            icon: Some("mdi:delete".to_owned()),
        }])
    }
}

struct MelbourneDown(CouncilMeta);

#[async_trait]
impl SourceAdapter for MelbourneDown {
    fn council(&self) -> &CouncilMeta {
        &self.0
    }

    async fn fetch(&self, _address: &str) -> Result<Vec<CollectionEvent>, PortError> {
        Err(PortError::Parse("dataset is not GeoJSON".to_owned()))
    }
}

async fn spawn_app() -> SocketAddr {
    let registry = PluginRegistry::new(vec![
        CouncilPlugin::new(Arc::new(MonashStub(CouncilMeta {
            id: Councils::Monash.into(),
            name: "Monash City Council".to_owned(),
        }))),
        CouncilPlugin::new(Arc::new(MelbourneDown(CouncilMeta {
            id: Councils::Melbourne.into(),
            name: "City of Melbourne".to_owned(),
        }))),
    ]);
    let service = Arc::new(KerbsideService::new(
        Arc::new(registry),
        Arc::new(KeywordLocator),
    ));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, build_router(service))
            .await
            .expect("serve test app");
    });
    addr
}

async fn get(addr: SocketAddr, path_and_query: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{addr}{path_and_query}"))
        .await
        .expect("request succeeds");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn returns_collections_for_a_supported_council() {
    let addr = spawn_app().await;
    let (status, body) = get(
        addr,
        "/collections?address=21%20Chancellors%20Walk%2C%20Clayton",
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "council": "City of Monash",
            "address": "21 Chancellors Walk, Clayton",
            "collections": [
                {"date": "2024-03-12", "type": "Landfill Waste", "icon": "mdi:delete"}
            ]
        })
    );
}

#[tokio::test]
async fn missing_address_is_a_bad_request() {
    let addr = spawn_app().await;

    let (status, body) = get(addr, "/collections").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "address parameter is required"}));

    let (status, _) = get(addr, "/collections?address=%20%20").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn unknown_council_is_not_found() {
    let addr = spawn_app().await;
    let (status, body) = get(addr, "/collections?address=Nowhere").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "could not determine council"}));
}

#[tokio::test]
async fn council_without_source_is_not_found() {
    let addr = spawn_app().await;
    let (status, body) = get(addr, "/collections?address=1%20Young%20St%20Frankston").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "no source found for Frankston City"}));
}

#[tokio::test]
async fn unresolvable_address_is_not_found() {
    let addr = spawn_app().await;
    let (status, body) = get(addr, "/collections?address=999%20Clayton%20Rd%20Clayton").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "could not resolve address"}));
}

#[tokio::test]
async fn adapter_failure_is_a_server_error() {
    let addr = spawn_app().await;
    let (status, body) = get(addr, "/collections?address=1%20Harbour%20Esplanade%20Docklands").await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"error": "Parse error: dataset is not GeoJSON"}));
}

#[tokio::test]
async fn health_check_answers() {
    let addr = spawn_app().await;
    let response = reqwest::get(format!("http://{addr}/healthz"))
        .await
        .expect("request succeeds");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.expect("text body"), "ok");
}
