use anyhow::Result;
use k8s_openapi::api::core::v1::{Container, PersistentVolumeClaim};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::templates::*;
use crate::crd::{ChiPodTemplate, ChiTemplates, ChiVolumeClaimTemplate};
use crate::error::ChiError;

fn pod_template(name: &str, image: &str) -> ChiPodTemplate {
    ChiPodTemplate {
        name: name.into(),
        containers: vec![Container {
            name: "clickhouse".into(),
            image: Some(image.into()),
            ..Default::default()
        }],
        volumes: vec![],
    }
}

fn volume_claim_template(name: &str, claim_name: Option<&str>) -> ChiVolumeClaimTemplate {
    ChiVolumeClaimTemplate {
        name: name.into(),
        persistent_volume_claim: PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: claim_name.map(String::from),
                ..Default::default()
            },
            ..Default::default()
        },
    }
}

#[test]
fn put_then_get_returns_the_template() -> Result<()> {
    let mut index = PodTemplatesIndex::new("pod template");
    let data = PodTemplatesIndexData::from(&pod_template("t0", "clickhouse:23.8"));
    index.put("t0", data.clone());

    assert!(index.get("t0") == Some(&data), "expected indexed template to be returned");
    assert!(index.require("t0")? == &data, "expected indexed template to be required");
    assert!(index.get("t1").is_none(), "expected unknown template to be absent");
    Ok(())
}

#[test]
fn put_is_last_write_wins() {
    let templates = ChiTemplates {
        pod_templates: vec![pod_template("t0", "clickhouse:22.3"), pod_template("t0", "clickhouse:23.8")],
        volume_claim_templates: vec![],
    };
    let index = PodTemplatesIndex::from_templates(&templates);
    let image = index.get("t0").and_then(|data| data.containers[0].image.as_deref());

    assert!(index.len() == 1, "expected 1 indexed template, got {}", index.len());
    assert!(image == Some("clickhouse:23.8"), "expected the later template to win, got {:?}", image);
}

#[test]
fn require_unknown_template_is_not_found() {
    let index = VolumeClaimTemplatesIndex::new("volume claim template");
    let res = index.require("missing");
    assert!(
        res == Err(ChiError::NotFound {
            kind: "volume claim template",
            name: "missing".into()
        }),
        "expected NotFound, got {:?}",
        res
    );
}

#[test]
fn volume_claim_templates_record_default_name_substitution() {
    let templates = ChiTemplates {
        pod_templates: vec![],
        volume_claim_templates: vec![volume_claim_template("named", Some("logs")), volume_claim_template("unnamed", None)],
    };
    let index = VolumeClaimTemplatesIndex::from_templates(&templates, "clickhouse-data");

    let named = index.get("named").expect("expected named template to be indexed");
    assert!(!named.use_default_name, "expected named claim to keep its own name");
    assert!(named.persistent_volume_claim.metadata.name.as_deref() == Some("logs"));

    let unnamed = index.get("unnamed").expect("expected unnamed template to be indexed");
    assert!(unnamed.use_default_name, "expected unnamed claim to use the default name");
    assert!(
        unnamed.persistent_volume_claim.metadata.name.as_deref() == Some("clickhouse-data"),
        "unexpected default claim name, got {:?}",
        unnamed.persistent_volume_claim.metadata.name
    );
}
