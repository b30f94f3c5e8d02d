use aci_api::Mo;

use crate::delta::Snapshot;
use crate::model::dn;

/// Desired configuration for a bridge domain (`fvBD`).
///
/// Carries two synthetic snapshot keys beyond the `fvBD` attributes:
/// `context` (the `fvRsCtx` child's `tnFvCtxName`) and `subnet` (the
/// single `fvSubnet` child's `ip`). Folding the children into the
/// snapshot keeps the delta logic uniform -- an existing subnet the
/// caller didn't mention is resent unchanged via the normal merge rule.
#[derive(Debug, Clone)]
pub struct BridgeDomainConfig {
    pub tenant: String,
    pub name: String,
    pub context: Option<String>,
    /// Gateway address with prefix, e.g. `10.1.100.1/24`.
    pub subnet: Option<String>,
    pub descr: Option<String>,
}

impl BridgeDomainConfig {
    pub const CLASS: &'static str = "fvBD";

    pub const MANAGED_ATTRS: &'static [&'static str] = &["descr", "context", "subnet"];

    pub fn dn(&self) -> String {
        dn::bridge_domain(&self.tenant, &self.name)
    }

    pub fn tenant_dn(&self) -> String {
        dn::tenant(&self.tenant)
    }

    pub fn context_dn(&self) -> Option<String> {
        self.context.as_deref().map(|c| dn::context(&self.tenant, c))
    }

    /// Canonical proposed snapshot: only attributes the caller supplied.
    pub fn proposed(&self) -> Snapshot {
        let mut snap = Snapshot::new();
        snap.set_opt("descr", self.descr.as_deref());
        snap.set_opt("context", self.context.as_deref());
        snap.set_opt("subnet", self.subnet.as_deref());
        snap
    }

    /// Existing snapshot from a controller read with child subtree.
    pub fn existing_snapshot(mo: &Mo) -> Snapshot {
        let mut snap = Snapshot::new();
        snap.set_opt("descr", mo.attr("descr"));
        if let Some(rs_ctx) = mo.children_of_class("fvRsCtx").next() {
            snap.set_opt("context", rs_ctx.attr("tnFvCtxName"));
        }
        if let Some(subnet) = mo.children_of_class("fvSubnet").next() {
            snap.set_opt("subnet", subnet.attr("ip"));
        }
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_snapshot_folds_children() {
        let mo = Mo::new("fvBD")
            .with_attr("name", "bd1")
            .with_attr("descr", "servers")
            .with_child(Mo::new("fvRsCtx").with_attr("tnFvCtxName", "ctx1"))
            .with_child(Mo::new("fvSubnet").with_attr("ip", "10.1.100.1/24"));

        let snap = BridgeDomainConfig::existing_snapshot(&mo);
        assert_eq!(snap.get("descr"), Some("servers"));
        assert_eq!(snap.get("context"), Some("ctx1"));
        assert_eq!(snap.get("subnet"), Some("10.1.100.1/24"));
    }

    #[test]
    fn existing_snapshot_without_children() {
        let mo = Mo::new("fvBD").with_attr("name", "bd1");
        let snap = BridgeDomainConfig::existing_snapshot(&mo);
        assert!(snap.is_empty());
    }
}
