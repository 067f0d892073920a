use anyhow::Result;

use super::registry::*;
use crate::crd::ChiDeployment;
use crate::error::ChiError;

fn deployment(pod_template: &str) -> ChiDeployment {
    ChiDeployment {
        pod_template: pod_template.into(),
        ..Default::default()
    }
}

#[test]
fn register_is_idempotent_for_identical_deployments() -> Result<()> {
    let mut registry = DeploymentRegistry::new();
    let id = FullDeploymentId::new("c1", 1, 1);
    registry.register(id.clone(), deployment("d"))?;
    let before = registry.clone();
    registry.register(id.clone(), deployment("d"))?;

    assert!(registry == before, "expected re-registration to leave the registry unchanged");
    assert!(registry.len() == 1, "expected 1 entry, got {}", registry.len());
    assert!(registry.resolve(&id)? == &deployment("d"), "unexpected deployment resolved for {}", id);
    Ok(())
}

#[test]
fn register_rejects_conflicting_deployments() -> Result<()> {
    let mut registry = DeploymentRegistry::new();
    let id = FullDeploymentId::new("c1", 1, 1);
    registry.register(id.clone(), deployment("d"))?;

    let res = registry.register(id.clone(), deployment("d-prime"));
    assert!(
        res == Err(ChiError::DuplicateIdentifier("c1/1/1".into())),
        "expected DuplicateIdentifier, got {:?}",
        res
    );
    assert!(registry.resolve(&id)? == &deployment("d"), "expected original deployment to be kept");
    Ok(())
}

#[test]
fn resolve_unknown_id_is_not_found() {
    let registry = DeploymentRegistry::new();
    let res = registry.resolve(&FullDeploymentId::new("c1", 2, 1));
    assert!(
        matches!(res, Err(ChiError::NotFound { kind: "deployment", .. })),
        "expected NotFound, got {:?}",
        res
    );
}

#[test]
fn ids_of_distinct_replicas_are_distinct() {
    let ids = vec![
        FullDeploymentId::new("c1", 1, 1),
        FullDeploymentId::new("c1", 1, 2),
        FullDeploymentId::new("c1", 2, 1),
        FullDeploymentId::new("c2", 1, 1),
    ];
    for (i, a) in ids.iter().enumerate() {
        for b in ids.iter().skip(i + 1) {
            assert!(a != b && a.to_string() != b.to_string(), "expected {} & {} to be distinct", a, b);
        }
    }
}
