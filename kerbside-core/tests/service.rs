use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use kerbside_core::{
    CollectionEvent, CouncilId, CouncilLocator, CouncilMeta, CouncilPlugin, Councils,
    KerbsideService, PluginRegistry, PortError, SourceAdapter,
};

struct FixedLocator(Option<&'static str>);

#[async_trait]
impl CouncilLocator for FixedLocator {
    async fn locate(&self, _address: &str) -> Result<Option<String>, PortError> {
        Ok(self.0.map(str::to_owned))
    }
}

struct CannedAdapter {
    meta: CouncilMeta,
    events: Vec<CollectionEvent>,
}

#[async_trait]
impl SourceAdapter for CannedAdapter {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn fetch(&self, _address: &str) -> Result<Vec<CollectionEvent>, PortError> {
        Ok(self.events.clone())
    }
}

struct BrokenAdapter(CouncilMeta);

#[async_trait]
impl SourceAdapter for BrokenAdapter {
    fn council(&self) -> &CouncilMeta {
        &self.0
    }

    async fn fetch(&self, _address: &str) -> Result<Vec<CollectionEvent>, PortError> {
        Err(PortError::AddressNotFound)
    }
}

fn hard_waste() -> CollectionEvent {
    CollectionEvent {
        date: NaiveDate::from_ymd_opt(2024, 3, 12).expect("valid test date"),
        label: "Hard Waste".to_owned(),
        icon: Some("mdi:sofa".to_owned()),
    }
}

fn service(council: Option<&'static str>) -> KerbsideService {
    let monash = CannedAdapter {
        meta: CouncilMeta {
            id: Councils::Monash.into(),
            name: "Monash City Council".to_owned(),
        },
        events: vec![hard_waste()],
    };
    let melbourne = BrokenAdapter(CouncilMeta {
        id: Councils::Melbourne.into(),
        name: "City of Melbourne".to_owned(),
    });
    let registry = PluginRegistry::new(vec![
        CouncilPlugin::new(Arc::new(monash)),
        CouncilPlugin::new(Arc::new(melbourne)),
    ]);
    KerbsideService::new(Arc::new(registry), Arc::new(FixedLocator(council)))
}

#[tokio::test]
async fn report_names_council_and_address() {
    let report = service(Some("City of Monash"))
        .collections_for("21 Chancellors Walk, Clayton")
        .await
        .expect("collections resolve");

    assert_eq!(report.council, "City of Monash");
    assert_eq!(report.address, "21 Chancellors Walk, Clayton");
    assert_eq!(report.collections, vec![hard_waste()]);
}

#[tokio::test]
async fn missing_council_is_reported() {
    let err = service(None)
        .collections_for("somewhere")
        .await
        .expect_err("no council");
    assert!(matches!(err, PortError::CouncilNotFound));
}

#[tokio::test]
async fn council_without_adapter_is_unsupported() {
    let err = service(Some("Frankston City"))
        .collections_for("somewhere")
        .await
        .expect_err("no adapter");
    assert!(matches!(err, PortError::UnsupportedCouncil(name) if name == "Frankston City"));
}

#[tokio::test]
async fn adapter_errors_pass_through() {
    let err = service(Some("Melbourne City"))
        .collections_for("somewhere")
        .await
        .expect_err("adapter failure");
    assert!(matches!(err, PortError::AddressNotFound));
}

#[test]
fn councils_are_listed_in_id_order() {
    let ids: Vec<CouncilId> = service(None)
        .councils()
        .into_iter()
        .map(|(id, _name)| id)
        .collect();
    assert_eq!(
        ids,
        vec![
            CouncilId::from(Councils::Melbourne),
            CouncilId::from(Councils::Monash)
        ]
    );
}
