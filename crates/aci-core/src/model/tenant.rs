use crate::delta::Snapshot;
use crate::model::dn;

/// Desired configuration for a tenant (`fvTenant`).
#[derive(Debug, Clone)]
pub struct TenantConfig {
    pub name: String,
    pub descr: Option<String>,
}

impl TenantConfig {
    pub const CLASS: &'static str = "fvTenant";

    /// The attributes this operation manages on the controller object.
    pub const MANAGED_ATTRS: &'static [&'static str] = &["descr"];

    pub fn dn(&self) -> String {
        dn::tenant(&self.name)
    }

    /// Canonical proposed snapshot: only attributes the caller supplied.
    pub fn proposed(&self) -> Snapshot {
        let mut snap = Snapshot::new();
        snap.set_opt("descr", self.descr.as_deref());
        snap
    }
}
