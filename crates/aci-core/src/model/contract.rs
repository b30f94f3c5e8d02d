use serde::Serialize;
use strum::{Display, EnumString};

use crate::delta::Snapshot;
use crate::model::dn;

/// Contract scope: how far the contract's policy reaches.
///
/// `Display` / `FromStr` spellings are the canonical APIC attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ContractScope {
    ApplicationProfile,
    Context,
    Global,
    Tenant,
}

/// QoS priority class, shared by contracts and contract subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QosClass {
    Unspecified,
    Level1,
    Level2,
    Level3,
}

/// Desired configuration for a contract (`vzBrCP`).
#[derive(Debug, Clone)]
pub struct ContractConfig {
    pub tenant: String,
    pub name: String,
    pub scope: Option<ContractScope>,
    pub prio: Option<QosClass>,
    pub descr: Option<String>,
}

impl ContractConfig {
    pub const CLASS: &'static str = "vzBrCP";

    pub const MANAGED_ATTRS: &'static [&'static str] = &["descr", "scope", "prio"];

    pub fn dn(&self) -> String {
        dn::contract(&self.tenant, &self.name)
    }

    pub fn tenant_dn(&self) -> String {
        dn::tenant(&self.tenant)
    }

    /// Canonical proposed snapshot: only attributes the caller supplied.
    pub fn proposed(&self) -> Snapshot {
        let mut snap = Snapshot::new();
        snap.set_opt("descr", self.descr.as_deref());
        snap.set_opt("scope", self.scope.map(|s| s.to_string()));
        snap.set_opt("prio", self.prio.map(|p| p.to_string()));
        snap
    }
}
