//! VRF context command handlers.

use aci_core::{ContextConfig, Fabric};

use crate::cli::{GlobalOpts, VrfArgs, VrfCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(fabric: &Fabric, args: VrfArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VrfCommand::Apply {
            name,
            tenant,
            descr,
        } => {
            let config = ContextConfig {
                tenant,
                name,
                descr,
            };
            let report = fabric.apply_context(&config, global.check).await?;
            util::render(&report, global);
            Ok(())
        }

        VrfCommand::Remove { name, tenant } => {
            if !util::confirm(&format!("Delete VRF context '{tenant}/{name}'?"), global)? {
                return Ok(());
            }
            let report = fabric.remove_context(&tenant, &name, global.check).await?;
            util::render(&report, global);
            Ok(())
        }
    }
}
