// ── Fabric abstraction ──
//
// The apply engine: one synchronous read-diff-gate-commit pass per
// invocation. Every operation follows the same shape: fail-fast local
// validation, parent lookups, existing-state read, delta resolution,
// and at most one commit -- skipped entirely in check mode.

use aci_api::{ApicClient, Credentials, Mo, TlsMode, TransportConfig};
use tracing::{debug, info, warn};

use crate::config::{ControllerConfig, TlsVerification};
use crate::convert;
use crate::delta::{Snapshot, diff};
use crate::error::CoreError;
use crate::model::{
    BridgeDomainConfig, ContextConfig, ContractConfig, DesiredState, DirectionMode, FilterSpec,
    SubjectConfig, TenantConfig, dn,
};
use crate::report::ChangeReport;

/// Shared tenant whose filters are visible to every other tenant.
const COMMON_TENANT: &str = "common";

/// A connection to one APIC fabric controller.
///
/// Holds no cached state between operations -- every apply re-reads the
/// controller, so re-running the same desired configuration against an
/// unmodified fabric computes an empty delta and performs no write.
pub struct Fabric {
    client: ApicClient,
}

impl Fabric {
    /// Build a fabric handle from resolved configuration. Does NOT
    /// authenticate -- call [`connect()`](Self::connect) first.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let tls = match config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        let transport = TransportConfig {
            tls,
            timeout: config.timeout,
            cookie_jar: None,
        };
        let credentials = Credentials::new(config.username, config.password);
        let client = ApicClient::new(config.url, credentials, &transport)?;
        Ok(Self { client })
    }

    /// Authenticate the session.
    pub async fn connect(&self) -> Result<(), CoreError> {
        info!("logging in to {}", self.client.base_url());
        self.client.login().await.map_err(CoreError::from)
    }

    /// End the session. Best effort -- a failed logout only logs.
    pub async fn disconnect(&self) {
        if let Err(err) = self.client.logout().await {
            warn!("logout failed: {err}");
        }
    }

    // ── Tenant ───────────────────────────────────────────────────────

    pub async fn apply_tenant(
        &self,
        config: &TenantConfig,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        let existing_mo = self.client.lookup_dn(&config.dn()).await?;
        let exists = existing_mo.is_some();
        let existing = existing_mo
            .map(|mo| Snapshot::from_mo(&mo, TenantConfig::MANAGED_ATTRS))
            .unwrap_or_default();
        let proposed = config.proposed();
        let delta = diff(&proposed, &existing);

        if exists && delta.is_empty() {
            debug!(tenant = %config.name, "no delta, nothing to commit");
            return Ok(ChangeReport::unchanged(
                proposed,
                existing,
                DesiredState::Present,
            ));
        }

        let mo = convert::tenant_object(&config.name, &existing.merged_with(&delta));
        self.commit_present(mo, proposed, existing, check, |mo| {
            Snapshot::from_mo(mo, TenantConfig::MANAGED_ATTRS)
        })
        .await
    }

    pub async fn remove_tenant(&self, name: &str, check: bool) -> Result<ChangeReport, CoreError> {
        self.remove(
            TenantConfig::CLASS,
            &dn::tenant(name),
            TenantConfig::MANAGED_ATTRS,
            check,
        )
        .await
    }

    // ── Context (VRF) ────────────────────────────────────────────────

    pub async fn apply_context(
        &self,
        config: &ContextConfig,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        self.require_exists("tenant", &config.tenant, &config.tenant_dn())
            .await?;

        let existing_mo = self.client.lookup_dn(&config.dn()).await?;
        let exists = existing_mo.is_some();
        let existing = existing_mo
            .map(|mo| Snapshot::from_mo(&mo, ContextConfig::MANAGED_ATTRS))
            .unwrap_or_default();
        let proposed = config.proposed();
        let delta = diff(&proposed, &existing);

        if exists && delta.is_empty() {
            debug!(context = %config.name, "no delta, nothing to commit");
            return Ok(ChangeReport::unchanged(
                proposed,
                existing,
                DesiredState::Present,
            ));
        }

        let mo =
            convert::context_object(&config.tenant, &config.name, &existing.merged_with(&delta));
        self.commit_present(mo, proposed, existing, check, |mo| {
            Snapshot::from_mo(mo, ContextConfig::MANAGED_ATTRS)
        })
        .await
    }

    pub async fn remove_context(
        &self,
        tenant: &str,
        name: &str,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        self.remove(
            ContextConfig::CLASS,
            &dn::context(tenant, name),
            ContextConfig::MANAGED_ATTRS,
            check,
        )
        .await
    }

    // ── Bridge domain ────────────────────────────────────────────────

    pub async fn apply_bridge_domain(
        &self,
        config: &BridgeDomainConfig,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        self.require_exists("tenant", &config.tenant, &config.tenant_dn())
            .await?;
        if let (Some(context), Some(context_dn)) = (&config.context, config.context_dn()) {
            self.require_exists("context", context, &context_dn).await?;
        }

        let existing_mo = self
            .client
            .lookup_dn_subtree(&config.dn(), &["fvSubnet", "fvRsCtx"])
            .await?;
        let exists = existing_mo.is_some();
        let existing = existing_mo
            .map(|mo| BridgeDomainConfig::existing_snapshot(&mo))
            .unwrap_or_default();
        let proposed = config.proposed();
        let delta = diff(&proposed, &existing);

        if exists && delta.is_empty() {
            debug!(bridge_domain = %config.name, "no delta, nothing to commit");
            return Ok(ChangeReport::unchanged(
                proposed,
                existing,
                DesiredState::Present,
            ));
        }

        // The merge rule carries an existing subnet/context the caller
        // didn't mention into the committed object unchanged.
        let mo = convert::bridge_domain_object(
            &config.tenant,
            &config.name,
            &existing.merged_with(&delta),
        );
        self.commit_present_subtree(mo, proposed, existing, check, &config.dn(), &[
            "fvSubnet", "fvRsCtx",
        ])
        .await
    }

    pub async fn remove_bridge_domain(
        &self,
        tenant: &str,
        name: &str,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        self.remove(
            BridgeDomainConfig::CLASS,
            &dn::bridge_domain(tenant, name),
            &["descr"],
            check,
        )
        .await
    }

    // ── Contract ─────────────────────────────────────────────────────

    pub async fn apply_contract(
        &self,
        config: &ContractConfig,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        self.require_exists("tenant", &config.tenant, &config.tenant_dn())
            .await?;

        let existing_mo = self.client.lookup_dn(&config.dn()).await?;
        let exists = existing_mo.is_some();
        let existing = existing_mo
            .map(|mo| Snapshot::from_mo(&mo, ContractConfig::MANAGED_ATTRS))
            .unwrap_or_default();
        let proposed = config.proposed();
        let delta = diff(&proposed, &existing);

        if exists && delta.is_empty() {
            debug!(contract = %config.name, "no delta, nothing to commit");
            return Ok(ChangeReport::unchanged(
                proposed,
                existing,
                DesiredState::Present,
            ));
        }

        let mo =
            convert::contract_object(&config.tenant, &config.name, &existing.merged_with(&delta));
        self.commit_present(mo, proposed, existing, check, |mo| {
            Snapshot::from_mo(mo, ContractConfig::MANAGED_ATTRS)
        })
        .await
    }

    pub async fn remove_contract(
        &self,
        tenant: &str,
        name: &str,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        self.remove(
            ContractConfig::CLASS,
            &dn::contract(tenant, name),
            ContractConfig::MANAGED_ATTRS,
            check,
        )
        .await
    }

    // ── Contract subject ─────────────────────────────────────────────

    pub async fn apply_subject(
        &self,
        config: &SubjectConfig,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        // Local validation first: direction flag vs. filter lists, and
        // unsupported service-graph references.
        let spec = config.filter_spec()?;

        self.require_exists("tenant", &config.tenant, &dn::tenant(&config.tenant))
            .await?;
        self.require_exists("contract", &config.contract, &config.contract_dn())
            .await?;

        let existing_mo = self.client.lookup_dn(&config.dn()).await?;
        let exists = existing_mo.is_some();

        // Direction mode is immutable in place: a subject created with
        // in/out terms cannot become bidirectional (or vice versa).
        if exists {
            let existing_mode = self.existing_direction_mode(config).await?;
            if existing_mode != spec.mode() {
                return Err(CoreError::ImmutableTransition {
                    message: format!(
                        "contract subject '{}' is configured as {existing_mode}; \
                         switching to {} is not supported -- remove the subject first",
                        config.name,
                        spec.mode(),
                    ),
                });
            }
        }

        // Every proposed filter must already exist in the target tenant
        // or in 'common' before anything is attached.
        for name in spec.referenced_filters() {
            self.require_filter(&config.tenant, name).await?;
        }

        let attached = if exists {
            self.attached_filters(config, spec.mode()).await?
        } else {
            FilterSpec::Bidirectional(Vec::new())
        };
        let new_filters = new_attachments(&spec, &attached);

        let existing = existing_mo
            .map(|mo| Snapshot::from_mo(&mo, SubjectConfig::MANAGED_ATTRS))
            .unwrap_or_default();
        let proposed = config.proposed();
        let delta = diff(&proposed, &existing);

        let has_new_filters = !new_filters.referenced_filters().is_empty();
        if exists && delta.is_empty() && !has_new_filters {
            debug!(subject = %config.name, "no delta and no new filters, nothing to commit");
            return Ok(ChangeReport::unchanged(
                proposed,
                existing,
                DesiredState::Present,
            ));
        }

        let mo = convert::subject_object(config, &existing.merged_with(&delta), &new_filters);
        self.commit_present(mo, proposed, existing, check, |mo| {
            Snapshot::from_mo(mo, SubjectConfig::MANAGED_ATTRS)
        })
        .await
    }

    pub async fn remove_subject(
        &self,
        tenant: &str,
        contract: &str,
        name: &str,
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        self.remove(
            SubjectConfig::CLASS,
            &dn::subject(tenant, contract, name),
            SubjectConfig::MANAGED_ATTRS,
            check,
        )
        .await
    }

    // ── Shared plumbing ──────────────────────────────────────────────

    /// Fail fast when a required parent object is absent.
    async fn require_exists(&self, kind: &str, name: &str, dn: &str) -> Result<(), CoreError> {
        if self.client.lookup_dn(dn).await?.is_none() {
            return Err(CoreError::missing_prerequisite(kind, name));
        }
        Ok(())
    }

    /// A filter is resolvable from the target tenant or from 'common'.
    async fn require_filter(&self, tenant: &str, name: &str) -> Result<(), CoreError> {
        if self.client.lookup_dn(&dn::filter(tenant, name)).await?.is_some() {
            return Ok(());
        }
        if tenant != COMMON_TENANT
            && self
                .client
                .lookup_dn(&dn::filter(COMMON_TENANT, name))
                .await?
                .is_some()
        {
            return Ok(());
        }
        Err(CoreError::UnmetDependency {
            kind: "filter".into(),
            name: name.into(),
        })
    }

    /// The direction mode of an existing subject, detected from the
    /// presence of its term containers.
    async fn existing_direction_mode(
        &self,
        config: &SubjectConfig,
    ) -> Result<DirectionMode, CoreError> {
        let has_terms = self.client.lookup_dn(&config.in_term_dn()).await?.is_some()
            || self.client.lookup_dn(&config.out_term_dn()).await?.is_some();
        Ok(if has_terms {
            DirectionMode::Split
        } else {
            DirectionMode::Bidirectional
        })
    }

    /// Filter names already attached to an existing subject.
    async fn attached_filters(
        &self,
        config: &SubjectConfig,
        mode: DirectionMode,
    ) -> Result<FilterSpec, CoreError> {
        match mode {
            DirectionMode::Bidirectional => {
                let names = self
                    .client
                    .children_of(&config.dn(), "vzRsSubjFiltAtt")
                    .await?;
                Ok(FilterSpec::Bidirectional(attach_names(&names)))
            }
            DirectionMode::Split => {
                let inbound = self
                    .client
                    .children_of(&config.in_term_dn(), "vzRsFiltAtt")
                    .await?;
                let outbound = self
                    .client
                    .children_of(&config.out_term_dn(), "vzRsFiltAtt")
                    .await?;
                Ok(FilterSpec::Split {
                    inbound: attach_names(&inbound),
                    outbound: attach_names(&outbound),
                })
            }
        }
    }

    /// Serialize, gate on check mode, commit once, re-read via `snapshot_fn`.
    async fn commit_present(
        &self,
        mo: Mo,
        proposed: Snapshot,
        existing: Snapshot,
        check: bool,
        snapshot_fn: impl Fn(&Mo) -> Snapshot,
    ) -> Result<ChangeReport, CoreError> {
        let xmldoc = mo.to_xml().map_err(CoreError::from)?;

        if check {
            debug!("check mode, skipping commit");
            return Ok(ChangeReport {
                proposed,
                existing,
                new: None,
                state: DesiredState::Present,
                xmldoc,
                changed: true,
            });
        }

        self.client.commit(&mo).await?;
        let dn = mo.dn().unwrap_or_default().to_string();
        let new = self.client.lookup_dn(&dn).await?.map(|mo| snapshot_fn(&mo));
        Ok(ChangeReport {
            proposed,
            existing,
            new,
            state: DesiredState::Present,
            xmldoc,
            changed: true,
        })
    }

    /// Variant of [`commit_present`](Self::commit_present) that re-reads
    /// with a child subtree (bridge domains fold children into snapshots).
    async fn commit_present_subtree(
        &self,
        mo: Mo,
        proposed: Snapshot,
        existing: Snapshot,
        check: bool,
        dn: &str,
        child_classes: &[&str],
    ) -> Result<ChangeReport, CoreError> {
        let xmldoc = mo.to_xml().map_err(CoreError::from)?;

        if check {
            debug!("check mode, skipping commit");
            return Ok(ChangeReport {
                proposed,
                existing,
                new: None,
                state: DesiredState::Present,
                xmldoc,
                changed: true,
            });
        }

        self.client.commit(&mo).await?;
        let new = self
            .client
            .lookup_dn_subtree(dn, child_classes)
            .await?
            .map(|mo| BridgeDomainConfig::existing_snapshot(&mo));
        Ok(ChangeReport {
            proposed,
            existing,
            new,
            state: DesiredState::Present,
            xmldoc,
            changed: true,
        })
    }

    /// Shared absent path: delete iff the object currently exists.
    async fn remove(
        &self,
        class: &str,
        dn: &str,
        attr_keys: &[&str],
        check: bool,
    ) -> Result<ChangeReport, CoreError> {
        let Some(existing_mo) = self.client.lookup_dn(dn).await? else {
            debug!(%dn, "object absent, nothing to delete");
            return Ok(ChangeReport::unchanged(
                Snapshot::new(),
                Snapshot::new(),
                DesiredState::Absent,
            ));
        };
        let existing = Snapshot::from_mo(&existing_mo, attr_keys);

        let mo = convert::deleted_object(class, dn);
        let xmldoc = mo.to_xml().map_err(CoreError::from)?;

        if check {
            debug!("check mode, skipping delete commit");
            return Ok(ChangeReport {
                proposed: Snapshot::new(),
                existing,
                new: None,
                state: DesiredState::Absent,
                xmldoc,
                changed: true,
            });
        }

        self.client.commit(&mo).await?;
        Ok(ChangeReport {
            proposed: Snapshot::new(),
            existing,
            new: None,
            state: DesiredState::Absent,
            xmldoc,
            changed: true,
        })
    }
}

// ── Filter attach delta ──────────────────────────────────────────────

fn attach_names(children: &[Mo]) -> Vec<String> {
    children
        .iter()
        .filter_map(|c| c.attr("tnVzFilterName"))
        .map(str::to_string)
        .collect()
}

/// Set difference of proposed filter names minus already-attached names,
/// order-preserving and deduplicated. Only these are attached on commit.
fn new_attachments(proposed: &FilterSpec, attached: &FilterSpec) -> FilterSpec {
    fn minus(proposed: &[String], attached: &[String]) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        proposed
            .iter()
            .filter(|name| {
                if attached.contains(name) || seen.contains(&name.as_str()) {
                    false
                } else {
                    seen.push(name.as_str());
                    true
                }
            })
            .cloned()
            .collect()
    }

    match proposed {
        FilterSpec::Bidirectional(names) => {
            let attached = match attached {
                FilterSpec::Bidirectional(names) => names.as_slice(),
                FilterSpec::Split { .. } => &[] as &[String],
            };
            FilterSpec::Bidirectional(minus(names, attached))
        }
        FilterSpec::Split { inbound, outbound } => {
            let (attached_in, attached_out) = match attached {
                FilterSpec::Split { inbound, outbound } => {
                    (inbound.as_slice(), outbound.as_slice())
                }
                FilterSpec::Bidirectional(_) => (&[] as &[String], &[] as &[String]),
            };
            FilterSpec::Split {
                inbound: minus(inbound, attached_in),
                outbound: minus(outbound, attached_out),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_attachments_subtracts_already_attached() {
        let proposed =
            FilterSpec::Bidirectional(vec!["web".into(), "icmp".into(), "dns".into()]);
        let attached = FilterSpec::Bidirectional(vec!["icmp".into()]);
        let new = new_attachments(&proposed, &attached);
        assert_eq!(
            new,
            FilterSpec::Bidirectional(vec!["web".into(), "dns".into()])
        );
    }

    #[test]
    fn new_attachments_all_attached_is_empty() {
        let proposed = FilterSpec::Bidirectional(vec!["web".into()]);
        let attached = FilterSpec::Bidirectional(vec!["web".into()]);
        let new = new_attachments(&proposed, &attached);
        assert!(new.referenced_filters().is_empty());
    }

    #[test]
    fn new_attachments_deduplicates_proposed() {
        let proposed = FilterSpec::Bidirectional(vec!["web".into(), "web".into()]);
        let attached = FilterSpec::Bidirectional(Vec::new());
        let new = new_attachments(&proposed, &attached);
        assert_eq!(new, FilterSpec::Bidirectional(vec!["web".into()]));
    }

    #[test]
    fn new_attachments_split_lists_are_independent() {
        let proposed = FilterSpec::Split {
            inbound: vec!["a".into(), "b".into()],
            outbound: vec!["a".into()],
        };
        let attached = FilterSpec::Split {
            inbound: vec!["a".into()],
            outbound: Vec::new(),
        };
        let new = new_attachments(&proposed, &attached);
        assert_eq!(
            new,
            FilterSpec::Split {
                inbound: vec!["b".into()],
                outbound: vec!["a".into()],
            }
        );
    }
}
