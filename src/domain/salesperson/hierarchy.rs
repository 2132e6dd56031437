//! Manager-role derivation from the salesperson hierarchy
//!
//! There is no persisted role field. A salesperson counts as a manager when
//! they sit at the root of the hierarchy (no manager of their own) or when at
//! least one other salesperson reports to them directly.

use std::collections::HashSet;

use super::entity::{Salesperson, SalespersonId};

/// Reverse index of the hierarchy: every ID that appears as somebody's manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerIndex {
    manager_ids: HashSet<SalespersonId>,
}

impl ManagerIndex {
    /// Build from an already-collected set of manager IDs
    pub fn new(manager_ids: HashSet<SalespersonId>) -> Self {
        Self { manager_ids }
    }

    /// Build by scanning a snapshot of the directory once.
    /// Self references are ignored so they never count as a direct report.
    pub fn from_salespeople<'a>(salespeople: impl IntoIterator<Item = &'a Salesperson>) -> Self {
        let manager_ids = salespeople
            .into_iter()
            .filter_map(|sp| sp.manager_id().filter(|manager| *manager != sp.id()))
            .collect();

        Self { manager_ids }
    }

    /// Whether anyone reports directly to `id`
    pub fn has_direct_reports(&self, id: SalespersonId) -> bool {
        self.manager_ids.contains(&id)
    }

    /// Root-or-has-direct-reports rule
    pub fn is_manager(&self, salesperson: &Salesperson) -> bool {
        salesperson.is_root() || self.has_direct_reports(salesperson.id())
    }

    pub fn len(&self) -> usize {
        self.manager_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manager_ids.is_empty()
    }
}

/// Classify `salesperson` against a full snapshot of the directory
pub fn is_manager(salesperson: &Salesperson, all_salespeople: &[Salesperson]) -> bool {
    ManagerIndex::from_salespeople(all_salespeople).is_manager(salesperson)
}
