//! In-memory state of the lead pipeline board.
//!
//! The server groups leads by stage; this board keeps one column per stage
//! and applies local edits (moves, upserts, deletions) without a reload.
//! Moved and upserted leads are prepended, the top of a column is always
//! the most recently touched lead.

use std::collections::HashMap;

use crate::api::types::{Lead, LeadStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct LeadBoard {
    columns: HashMap<LeadStatus, Vec<Lead>>,
}

impl Default for LeadBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadBoard {
    /// An empty board with every pipeline column present.
    pub fn new() -> Self {
        let columns = LeadStatus::ALL
            .iter()
            .map(|status| (*status, Vec::new()))
            .collect();
        Self { columns }
    }

    /// Builds a board from the server's grouped response. Stages the server
    /// omitted become empty columns.
    pub fn from_groups(groups: HashMap<LeadStatus, Vec<Lead>>) -> Self {
        let mut board = Self::new();
        for (status, leads) in groups {
            board.columns.insert(status, leads);
        }
        board
    }

    pub fn column(&self, status: LeadStatus) -> &[Lead] {
        self.columns.get(&status).map_or(&[], Vec::as_slice)
    }

    pub fn find(&self, lead_id: i64) -> Option<&Lead> {
        LeadStatus::ALL
            .iter()
            .find_map(|status| self.column(*status).iter().find(|l| l.id == lead_id))
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves a lead to `to`, prepending it there, and returns the stage it
    /// came from. Unknown ids leave the board untouched. Moving within the
    /// same column raises the lead to the top.
    pub fn move_lead(&mut self, lead_id: i64, to: LeadStatus) -> Option<LeadStatus> {
        let mut lead = self.remove(lead_id)?;
        let from = lead.status;
        lead.status = to;
        self.columns.entry(to).or_default().insert(0, lead);
        Some(from)
    }

    /// Inserts or replaces a lead, placing it at the top of the column its
    /// `status` field names.
    pub fn upsert(&mut self, lead: Lead) {
        self.remove(lead.id);
        self.columns
            .entry(lead.status)
            .or_default()
            .insert(0, lead);
    }

    pub fn remove(&mut self, lead_id: i64) -> Option<Lead> {
        for column in self.columns.values_mut() {
            if let Some(pos) = column.iter().position(|l| l.id == lead_id) {
                return Some(column.remove(pos));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(id: i64, name: &str, status: LeadStatus) -> Lead {
        Lead {
            id,
            name: name.to_string(),
            phone: None,
            status,
            tags: Vec::new(),
            assignee: None,
            follow_up_date: None,
            notes: None,
            created_at: None,
        }
    }

    fn sample_groups() -> HashMap<LeadStatus, Vec<Lead>> {
        let mut groups = HashMap::new();
        groups.insert(
            LeadStatus::NewLead,
            vec![lead(1, "Amina", LeadStatus::NewLead)],
        );
        groups.insert(
            LeadStatus::Contacted,
            vec![
                lead(2, "Omar", LeadStatus::Contacted),
                lead(3, "Lina", LeadStatus::Contacted),
            ],
        );
        groups
    }

    #[test]
    fn from_groups_fills_missing_columns() {
        let board = LeadBoard::from_groups(sample_groups());
        assert_eq!(board.len(), 3);
        assert_eq!(board.column(LeadStatus::Contacted).len(), 2);
        assert!(board.column(LeadStatus::Converted).is_empty());
        assert!(board.column(LeadStatus::Archived).is_empty());
    }

    #[test]
    fn move_prepends_and_reports_origin() {
        let mut board = LeadBoard::from_groups(sample_groups());
        let from = board.move_lead(1, LeadStatus::Contacted);
        assert_eq!(from, Some(LeadStatus::NewLead));
        assert!(board.column(LeadStatus::NewLead).is_empty());
        let contacted = board.column(LeadStatus::Contacted);
        assert_eq!(contacted[0].id, 1);
        assert_eq!(contacted[0].status, LeadStatus::Contacted);
        assert_eq!(contacted.len(), 3);
    }

    #[test]
    fn move_within_column_raises_to_top() {
        let mut board = LeadBoard::from_groups(sample_groups());
        board.move_lead(3, LeadStatus::Contacted);
        let contacted = board.column(LeadStatus::Contacted);
        assert_eq!(contacted[0].id, 3);
        assert_eq!(contacted[1].id, 2);
    }

    #[test]
    fn move_unknown_lead_is_a_noop() {
        let mut board = LeadBoard::from_groups(sample_groups());
        let before = board.clone();
        assert_eq!(board.move_lead(99, LeadStatus::Lost), None);
        assert_eq!(board, before);
    }

    #[test]
    fn upsert_replaces_across_columns() {
        let mut board = LeadBoard::from_groups(sample_groups());
        let mut updated = lead(2, "Omar K.", LeadStatus::TrialScheduled);
        updated.phone = Some("+20100000000".to_string());
        board.upsert(updated);
        assert_eq!(board.len(), 3);
        assert_eq!(board.column(LeadStatus::Contacted).len(), 1);
        let trial = board.column(LeadStatus::TrialScheduled);
        assert_eq!(trial[0].name, "Omar K.");
    }

    #[test]
    fn upsert_inserts_new_lead_on_top() {
        let mut board = LeadBoard::from_groups(sample_groups());
        board.upsert(lead(4, "Nour", LeadStatus::NewLead));
        let new_leads = board.column(LeadStatus::NewLead);
        assert_eq!(new_leads[0].id, 4);
        assert_eq!(new_leads[1].id, 1);
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn remove_returns_the_lead() {
        let mut board = LeadBoard::from_groups(sample_groups());
        let removed = board.remove(3).expect("lead 3 exists");
        assert_eq!(removed.name, "Lina");
        assert_eq!(board.len(), 2);
        assert_eq!(board.remove(3), None);
    }

    #[test]
    fn reload_discards_local_moves() {
        let mut board = LeadBoard::from_groups(sample_groups());
        board.move_lead(1, LeadStatus::Lost);
        board = LeadBoard::from_groups(sample_groups());
        assert_eq!(board.column(LeadStatus::NewLead)[0].id, 1);
        assert!(board.column(LeadStatus::Lost).is_empty());
    }
}
