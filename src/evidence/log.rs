//! Ordered collection of evidence entries
//!
//! The log is the only owner of its entries. Callers hold [`EntryId`]s and
//! look entries up again, never long-lived references to images or stacks.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, Local};

use super::entry::{EntryId, EntrySnapshot, EvidenceEntry};
use super::metadata::{SessionInfo, Step};
use crate::capture::Image;
use crate::error::{Error, LogError};
use crate::session::Command;

/// Evidence entries in report order, plus session details and test steps
#[derive(Debug, Default)]
pub struct EvidenceLog {
    entries: HashMap<EntryId, EvidenceEntry>,
    order: Vec<EntryId>,
    next_id: u64,
    session: Option<SessionInfo>,
    steps: Vec<Step>,
}

impl EvidenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capture at the end of the log, timestamped now
    pub fn append_entry(&mut self, image: Image, description: impl Into<String>) -> EntryId {
        self.append_entry_at(image, description, Local::now().fixed_offset())
    }

    /// Add a capture at the end of the log with an explicit timestamp
    pub fn append_entry_at(
        &mut self,
        image: Image,
        description: impl Into<String>,
        captured_at: DateTime<FixedOffset>,
    ) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        log::info!(
            "Evidence entry {} added: {}x{} capture",
            id,
            image.width(),
            image.height()
        );
        self.entries
            .insert(id, EvidenceEntry::new(id, image, description.into(), captured_at));
        self.order.push(id);
        id
    }

    /// Take an entry out of the log, handing it back to the caller
    pub fn remove_entry(&mut self, id: EntryId) -> Result<EvidenceEntry, LogError> {
        let entry = self.entries.remove(&id).ok_or(LogError::UnknownEntry(id))?;
        self.order.retain(|e| *e != id);
        log::info!("Evidence entry {} removed", id);
        Ok(entry)
    }

    /// Replace the report order with `ids`, which must be a full permutation
    /// of the current ids. Anything else is rejected without changes.
    pub fn reorder(&mut self, ids: &[EntryId]) -> Result<(), LogError> {
        let mismatch = LogError::PermutationMismatch {
            expected: self.order.len(),
            given: ids.len(),
        };
        if ids.len() != self.order.len() {
            return Err(mismatch);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !self.entries.contains_key(id) || !seen.insert(*id) {
                return Err(mismatch);
            }
        }
        self.order = ids.to_vec();
        log::info!("Evidence log reordered ({} entries)", ids.len());
        Ok(())
    }

    /// Entries in report order
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &EvidenceEntry> + '_ {
        self.order.iter().map(|id| &self.entries[id])
    }

    /// Entry ids in report order
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    pub fn entry(&self, id: EntryId) -> Result<&EvidenceEntry, LogError> {
        self.entries.get(&id).ok_or(LogError::UnknownEntry(id))
    }

    /// 0-based report position of an entry
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|e| *e == id)
    }

    pub fn set_description(
        &mut self,
        id: EntryId,
        description: impl Into<String>,
    ) -> Result<(), LogError> {
        let entry = self.entries.get_mut(&id).ok_or(LogError::UnknownEntry(id))?;
        entry.set_description(description.into());
        Ok(())
    }

    /// Apply an annotation command to one entry's layer stack
    pub fn apply(&self, id: EntryId, command: Command) -> Result<(), Error> {
        Ok(self.entry(id)?.apply(command)?)
    }

    pub fn undo(&self, id: EntryId) -> Result<(), Error> {
        Ok(self.entry(id)?.undo()?)
    }

    pub fn redo(&self, id: EntryId) -> Result<(), Error> {
        Ok(self.entry(id)?.redo()?)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: SessionInfo) {
        self.session = Some(session);
    }

    /// Note a test step, timestamped now; returns its 1-based number
    pub fn record_step(&mut self, text: impl Into<String>) -> usize {
        self.record_step_at(text, Local::now().fixed_offset())
    }

    pub fn record_step_at(
        &mut self,
        text: impl Into<String>,
        recorded_at: DateTime<FixedOffset>,
    ) -> usize {
        let number = self.steps.len() + 1;
        self.steps.push(Step {
            number,
            recorded_at,
            text: text.into(),
        });
        number
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Consistent copy of the log's order and every entry's current state.
    ///
    /// Entries are locked one at a time; the result is unaffected by any
    /// later edit, append, removal or reorder.
    pub fn snapshot(&self) -> LogSnapshot {
        LogSnapshot {
            entries: self.entries().map(EvidenceEntry::snapshot).collect(),
            session: self.session.clone(),
            steps: self.steps.clone(),
        }
    }
}

/// Frozen view of a log, in report order
#[derive(Clone, Debug)]
pub struct LogSnapshot {
    pub entries: Vec<EntrySnapshot>,
    pub session: Option<SessionInfo>,
    pub steps: Vec<Step>,
}
