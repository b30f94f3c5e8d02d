// aci-core: desired-state logic between aci-api and the CLI.

pub mod config;
pub mod convert;
pub mod delta;
pub mod error;
pub mod fabric;
pub mod model;
pub mod report;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, TlsVerification};
pub use delta::{Delta, Snapshot, diff};
pub use error::CoreError;
pub use fabric::Fabric;
pub use report::ChangeReport;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BridgeDomainConfig, ContextConfig, ContractConfig, ContractScope, DesiredState, DirectionMode,
    FilterSpec, QosClass, SubjectConfig, TenantConfig,
};
