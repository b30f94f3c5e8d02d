//! Contract subject command handlers.

use aci_core::{Fabric, SubjectConfig};

use crate::cli::{GlobalOpts, SubjectArgs, SubjectCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    fabric: &Fabric,
    args: SubjectArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SubjectCommand::Apply {
            name,
            tenant,
            contract,
            descr,
            prio,
            reverse_filter_ports,
            both_directions,
            filters,
            in_filters,
            out_filters,
            service_graph,
        } => {
            let config = SubjectConfig {
                tenant,
                contract,
                name,
                descr,
                prio: prio.map(Into::into),
                reverse_filter_ports,
                apply_both_directions: both_directions,
                filters,
                in_filters,
                out_filters,
                svc_graph: service_graph,
            };
            let report = fabric.apply_subject(&config, global.check).await?;
            util::render(&report, global);
            Ok(())
        }

        SubjectCommand::Remove {
            name,
            tenant,
            contract,
        } => {
            if !util::confirm(
                &format!("Delete contract subject '{tenant}/{contract}/{name}'?"),
                global,
            )? {
                return Ok(());
            }
            let report = fabric
                .remove_subject(&tenant, &contract, &name, global.check)
                .await?;
            util::render(&report, global);
            Ok(())
        }
    }
}
