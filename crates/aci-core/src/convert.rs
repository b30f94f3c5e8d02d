//! Snapshot → managed-object construction.
//!
//! Pure mapping functions from merged attribute snapshots to the wire
//! objects the APIC accepts. Keeping construction separate from the
//! apply engine makes it testable without a live controller.

use aci_api::Mo;

use crate::delta::Snapshot;
use crate::model::dn;
use crate::model::{FilterSpec, SubjectConfig};

/// Build an `fvTenant` from its merged snapshot.
pub fn tenant_object(name: &str, attrs: &Snapshot) -> Mo {
    let mut mo = Mo::new("fvTenant")
        .with_attr("dn", dn::tenant(name))
        .with_attr("name", name);
    if let Some(descr) = attrs.get("descr") {
        mo.set_attr("descr", descr);
    }
    mo
}

/// Build an `fvCtx` from its merged snapshot.
pub fn context_object(tenant: &str, name: &str, attrs: &Snapshot) -> Mo {
    let mut mo = Mo::new("fvCtx")
        .with_attr("dn", dn::context(tenant, name))
        .with_attr("name", name);
    if let Some(descr) = attrs.get("descr") {
        mo.set_attr("descr", descr);
    }
    mo
}

/// Build an `fvBD` from its merged snapshot.
///
/// The synthetic `context` and `subnet` keys become the `fvRsCtx` and
/// `fvSubnet` children of the bridge domain.
pub fn bridge_domain_object(tenant: &str, name: &str, attrs: &Snapshot) -> Mo {
    let mut mo = Mo::new("fvBD")
        .with_attr("dn", dn::bridge_domain(tenant, name))
        .with_attr("name", name);
    if let Some(descr) = attrs.get("descr") {
        mo.set_attr("descr", descr);
    }
    if let Some(context) = attrs.get("context") {
        mo.add_child(Mo::new("fvRsCtx").with_attr("tnFvCtxName", context));
    }
    if let Some(subnet) = attrs.get("subnet") {
        mo.add_child(Mo::new("fvSubnet").with_attr("ip", subnet));
    }
    mo
}

/// Build a `vzBrCP` from its merged snapshot.
pub fn contract_object(tenant: &str, name: &str, attrs: &Snapshot) -> Mo {
    let mut mo = Mo::new("vzBrCP")
        .with_attr("dn", dn::contract(tenant, name))
        .with_attr("name", name);
    for key in ["descr", "scope", "prio"] {
        if let Some(value) = attrs.get(key) {
            mo.set_attr(key, value);
        }
    }
    mo
}

/// Build a `vzSubj` from its merged snapshot plus the filter names to
/// newly attach.
///
/// In bidirectional mode the attaches are direct `vzRsSubjFiltAtt`
/// children; in split mode they sit under `vzInTerm` / `vzOutTerm`
/// (which are always present in split mode -- their existence is what
/// marks the subject's direction mode on the controller).
pub fn subject_object(config: &SubjectConfig, attrs: &Snapshot, new_filters: &FilterSpec) -> Mo {
    let mut mo = Mo::new("vzSubj")
        .with_attr("dn", config.dn())
        .with_attr("name", &config.name);
    for key in ["descr", "prio", "revFltPorts"] {
        if let Some(value) = attrs.get(key) {
            mo.set_attr(key, value);
        }
    }

    match new_filters {
        FilterSpec::Bidirectional(names) => {
            for name in names {
                mo.add_child(Mo::new("vzRsSubjFiltAtt").with_attr("tnVzFilterName", name));
            }
        }
        FilterSpec::Split { inbound, outbound } => {
            let mut in_term = Mo::new("vzInTerm");
            for name in inbound {
                in_term.add_child(Mo::new("vzRsFiltAtt").with_attr("tnVzFilterName", name));
            }
            let mut out_term = Mo::new("vzOutTerm");
            for name in outbound {
                out_term.add_child(Mo::new("vzRsFiltAtt").with_attr("tnVzFilterName", name));
            }
            mo.add_child(in_term);
            mo.add_child(out_term);
        }
    }
    mo
}

/// Build the deletion form of any object: class + DN + `status="deleted"`.
pub fn deleted_object(class: &str, dn: &str) -> Mo {
    Mo::new(class)
        .with_attr("dn", dn)
        .with_attr("status", "deleted")
}
