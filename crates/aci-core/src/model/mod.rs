// ── Domain model ──
//
// Desired-configuration structs for the five managed entities, plus the
// DN helpers. Each struct knows its class, its DN, and how to render
// itself as a canonical attribute snapshot (see `delta`). Construction
// of wire objects lives in `convert`, not here.

pub mod dn;

mod bridge_domain;
mod contract;
mod context;
mod subject;
mod tenant;

pub use bridge_domain::BridgeDomainConfig;
pub use context::ContextConfig;
pub use contract::{ContractConfig, ContractScope, QosClass};
pub use subject::{DirectionMode, FilterSpec, SubjectConfig};
pub use tenant::TenantConfig;

use serde::Serialize;

/// The desired state of an object: configure it or remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    Present,
    Absent,
}

impl std::fmt::Display for DesiredState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// Canonical representation of a boolean attribute.
///
/// The APIC stores booleans as `yes`/`no`; every snapshot uses the same
/// spelling so delta comparison never mixes representations.
pub(crate) fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
