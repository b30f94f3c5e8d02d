//! Contract command handlers.

use aci_core::{ContractConfig, Fabric};

use crate::cli::{ContractArgs, ContractCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    fabric: &Fabric,
    args: ContractArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ContractCommand::Apply {
            name,
            tenant,
            scope,
            prio,
            descr,
        } => {
            let config = ContractConfig {
                tenant,
                name,
                scope: scope.map(Into::into),
                prio: prio.map(Into::into),
                descr,
            };
            let report = fabric.apply_contract(&config, global.check).await?;
            util::render(&report, global);
            Ok(())
        }

        ContractCommand::Remove { name, tenant } => {
            if !util::confirm(&format!("Delete contract '{tenant}/{name}'?"), global)? {
                return Ok(());
            }
            let report = fabric.remove_contract(&tenant, &name, global.check).await?;
            util::render(&report, global);
            Ok(())
        }
    }
}
