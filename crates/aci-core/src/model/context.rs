use crate::delta::Snapshot;
use crate::model::dn;

/// Desired configuration for a private network context / VRF (`fvCtx`).
///
/// The parent tenant must already exist; the apply engine fails fast
/// rather than auto-creating it.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    pub tenant: String,
    pub name: String,
    pub descr: Option<String>,
}

impl ContextConfig {
    pub const CLASS: &'static str = "fvCtx";

    pub const MANAGED_ATTRS: &'static [&'static str] = &["descr"];

    pub fn dn(&self) -> String {
        dn::context(&self.tenant, &self.name)
    }

    pub fn tenant_dn(&self) -> String {
        dn::tenant(&self.tenant)
    }

    /// Canonical proposed snapshot: only attributes the caller supplied.
    pub fn proposed(&self) -> Snapshot {
        let mut snap = Snapshot::new();
        snap.set_opt("descr", self.descr.as_deref());
        snap
    }
}
