//! Bridge domain command handlers.

use aci_core::{BridgeDomainConfig, Fabric};

use crate::cli::{BridgeDomainArgs, BridgeDomainCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    fabric: &Fabric,
    args: BridgeDomainArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BridgeDomainCommand::Apply {
            name,
            tenant,
            vrf,
            subnet,
            descr,
        } => {
            let config = BridgeDomainConfig {
                tenant,
                name,
                context: vrf,
                subnet,
                descr,
            };
            let report = fabric.apply_bridge_domain(&config, global.check).await?;
            util::render(&report, global);
            Ok(())
        }

        BridgeDomainCommand::Remove { name, tenant } => {
            if !util::confirm(&format!("Delete bridge domain '{tenant}/{name}'?"), global)? {
                return Ok(());
            }
            let report = fabric
                .remove_bridge_domain(&tenant, &name, global.check)
                .await?;
            util::render(&report, global);
            Ok(())
        }
    }
}
