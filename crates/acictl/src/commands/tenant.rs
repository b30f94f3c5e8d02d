//! Tenant command handlers.

use aci_core::{Fabric, TenantConfig};

use crate::cli::{GlobalOpts, TenantArgs, TenantCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    fabric: &Fabric,
    args: TenantArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TenantCommand::Apply { name, descr } => {
            let config = TenantConfig { name, descr };
            let report = fabric.apply_tenant(&config, global.check).await?;
            util::render(&report, global);
            Ok(())
        }

        TenantCommand::Remove { name } => {
            if !util::confirm(
                &format!("Delete tenant '{name}' and everything under it?"),
                global,
            )? {
                return Ok(());
            }
            let report = fabric.remove_tenant(&name, global.check).await?;
            util::render(&report, global);
            Ok(())
        }
    }
}
