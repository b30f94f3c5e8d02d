use serde::Serialize;

use crate::delta::Snapshot;
use crate::error::CoreError;
use crate::model::contract::QosClass;
use crate::model::{dn, yes_no};

/// How a subject applies its filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionMode {
    /// One filter list applied to both directions (`vzRsSubjFiltAtt`
    /// children directly under the subject).
    Bidirectional,
    /// Separate inbound/outbound filter lists (`vzRsFiltAtt` children
    /// under the `vzInTerm` / `vzOutTerm` containers).
    Split,
}

impl std::fmt::Display for DirectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bidirectional => write!(f, "bidirectional"),
            Self::Split => write!(f, "split inbound/outbound"),
        }
    }
}

/// The validated filter lists for one direction mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    Bidirectional(Vec<String>),
    Split {
        inbound: Vec<String>,
        outbound: Vec<String>,
    },
}

impl FilterSpec {
    pub fn mode(&self) -> DirectionMode {
        match self {
            Self::Bidirectional(_) => DirectionMode::Bidirectional,
            Self::Split { .. } => DirectionMode::Split,
        }
    }

    /// All filter names referenced by this spec, for prerequisite checks.
    pub fn referenced_filters(&self) -> Vec<&str> {
        match self {
            Self::Bidirectional(names) => names.iter().map(String::as_str).collect(),
            Self::Split { inbound, outbound } => inbound
                .iter()
                .chain(outbound.iter())
                .map(String::as_str)
                .collect(),
        }
    }
}

/// Desired configuration for a contract subject (`vzSubj`).
///
/// The raw parameter surface is kept here (both-directions flag plus the
/// three filter lists) so [`SubjectConfig::filter_spec`] can reject
/// invalid combinations before any controller lookup happens.
#[derive(Debug, Clone)]
pub struct SubjectConfig {
    pub tenant: String,
    pub contract: String,
    pub name: String,
    pub descr: Option<String>,
    pub prio: Option<QosClass>,
    pub reverse_filter_ports: Option<bool>,
    /// Apply one filter list in both directions (the default mode).
    pub apply_both_directions: bool,
    /// Filter names for bidirectional mode.
    pub filters: Vec<String>,
    /// Inbound filter names for split mode.
    pub in_filters: Vec<String>,
    /// Outbound filter names for split mode.
    pub out_filters: Vec<String>,
    /// Service graph reference -- not implemented, rejected when set.
    pub svc_graph: Option<String>,
}

impl SubjectConfig {
    pub const CLASS: &'static str = "vzSubj";

    pub const MANAGED_ATTRS: &'static [&'static str] = &["descr", "prio", "revFltPorts"];

    pub fn dn(&self) -> String {
        dn::subject(&self.tenant, &self.contract, &self.name)
    }

    pub fn contract_dn(&self) -> String {
        dn::contract(&self.tenant, &self.contract)
    }

    pub fn in_term_dn(&self) -> String {
        dn::subject_in_term(&self.tenant, &self.contract, &self.name)
    }

    pub fn out_term_dn(&self) -> String {
        dn::subject_out_term(&self.tenant, &self.contract, &self.name)
    }

    /// Validate the parameter surface into a [`FilterSpec`].
    ///
    /// Checked before any remote lookup: service-graph references are
    /// unsupported, and the filter lists must agree with the direction flag.
    pub fn filter_spec(&self) -> Result<FilterSpec, CoreError> {
        if let Some(ref graph) = self.svc_graph {
            return Err(CoreError::UnsupportedFeature {
                feature: format!("service graph '{graph}'"),
            });
        }

        if self.apply_both_directions {
            if !self.in_filters.is_empty() || !self.out_filters.is_empty() {
                return Err(CoreError::InvalidParameterCombination {
                    message: "in/out filter lists cannot be used when applying filters \
                              to both directions; use the single filter list instead"
                        .into(),
                });
            }
            Ok(FilterSpec::Bidirectional(self.filters.clone()))
        } else {
            if !self.filters.is_empty() {
                return Err(CoreError::InvalidParameterCombination {
                    message: "the single filter list cannot be used with split \
                              directions; use the in/out filter lists instead"
                        .into(),
                });
            }
            Ok(FilterSpec::Split {
                inbound: self.in_filters.clone(),
                outbound: self.out_filters.clone(),
            })
        }
    }

    /// Canonical proposed snapshot: only attributes the caller supplied.
    pub fn proposed(&self) -> Snapshot {
        let mut snap = Snapshot::new();
        snap.set_opt("descr", self.descr.as_deref());
        snap.set_opt("prio", self.prio.map(|p| p.to_string()));
        snap.set_opt("revFltPorts", self.reverse_filter_ports.map(yes_no));
        snap
    }
}
