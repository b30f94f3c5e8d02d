//! Command dispatch: bridges CLI args -> core apply engine -> output formatting.

pub mod bridge_domain;
pub mod config_cmd;
pub mod contract;
pub mod subject;
pub mod tenant;
pub mod util;
pub mod vrf;

use aci_core::Fabric;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, fabric: &Fabric, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Tenant(args) => tenant::handle(fabric, args, global).await,
        Command::Vrf(args) => vrf::handle(fabric, args, global).await,
        Command::BridgeDomain(args) => bridge_domain::handle(fabric, args, global).await,
        Command::Contract(args) => contract::handle(fabric, args, global).await,
        Command::Subject(args) => subject::handle(fabric, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
