use serde::Serialize;

use crate::delta::Snapshot;
use crate::model::DesiredState;

/// The structured outcome of one apply/remove operation.
///
/// `xmldoc` is the serialized change document -- always populated when a
/// change was computed (including in check mode), empty otherwise. `new`
/// is the post-commit re-read and is only present after a live commit.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeReport {
    pub proposed: Snapshot,
    pub existing: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Snapshot>,
    pub state: DesiredState,
    pub xmldoc: String,
    pub changed: bool,
}

impl ChangeReport {
    /// A no-op outcome: nothing differed, nothing was sent.
    pub fn unchanged(proposed: Snapshot, existing: Snapshot, state: DesiredState) -> Self {
        Self {
            proposed,
            existing,
            new: None,
            state,
            xmldoc: String::new(),
            changed: false,
        }
    }
}
