//! Per-status history stamps, kept in lifecycle order

use crate::lifecycle::Chain;
use crate::models::{Status, StatusEntry};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// First stamp of every status a record has reached.
///
/// Entries are ordered by their rank in the record's chain (forward statuses,
/// then the failure status), not by the `Status` declaration order, so a
/// configured chain iterates the way it was defined. Serialized as a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusHistory {
    entries: Vec<(Status, StatusEntry)>,
}

impl StatusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, status: &Status) -> Option<&StatusEntry> {
        self.entries
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, entry)| entry)
    }

    pub fn get_mut(&mut self, status: &Status) -> Option<&mut StatusEntry> {
        self.entries
            .iter_mut()
            .find(|(s, _)| s == status)
            .map(|(_, entry)| entry)
    }

    pub fn contains_key(&self, status: &Status) -> bool {
        self.get(status).is_some()
    }

    /// Statuses in lifecycle order
    pub fn keys(&self) -> impl Iterator<Item = &Status> + '_ {
        self.entries.iter().map(|(s, _)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Status, &StatusEntry)> + '_ {
        self.entries.iter().map(|(s, entry)| (s, entry))
    }

    /// Store a stamp at its place in `chain`, replacing any existing one.
    /// Statuses foreign to the chain go last.
    pub fn insert(&mut self, status: Status, entry: StatusEntry, chain: &Chain) {
        if let Some(slot) = self.get_mut(&status) {
            *slot = entry;
            return;
        }

        let rank = chain.rank(status);
        let at = self
            .entries
            .iter()
            .position(|(s, _)| chain.rank(*s) > rank)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, (status, entry));
    }

    /// Reorder entries loaded from elsewhere into `chain` order
    pub fn sort_by_chain(&mut self, chain: &Chain) {
        self.entries.sort_by_key(|(s, _)| chain.rank(*s));
    }
}

impl Index<&Status> for StatusHistory {
    type Output = StatusEntry;

    fn index(&self, status: &Status) -> &StatusEntry {
        match self.get(status) {
            Some(entry) => entry,
            None => panic!("no history entry for status {}", status),
        }
    }
}

impl Serialize for StatusHistory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (status, entry) in &self.entries {
            map.serialize_entry(status, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatusHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HistoryVisitor;

        impl<'de> Visitor<'de> for HistoryVisitor {
            type Value = StatusHistory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of status to history entry")
            }

            fn visit_map<A>(self, mut access: A) -> Result<StatusHistory, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut history = StatusHistory::new();
                while let Some((status, entry)) = access.next_entry::<Status, StatusEntry>()? {
                    match history.get_mut(&status) {
                        Some(slot) => *slot = entry,
                        None => history.entries.push((status, entry)),
                    }
                }
                Ok(history)
            }
        }

        deserializer.deserialize_map(HistoryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleTable;
    use crate::models::RecordKind;
    use chrono::NaiveDate;

    fn entry(day: u32) -> StatusEntry {
        StatusEntry::new(
            NaiveDate::from_ymd_opt(2024, 4, day)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            None,
        )
    }

    #[test]
    fn test_insert_keeps_chain_order() {
        let table = LifecycleTable::default();
        let chain = table.chain(RecordKind::Contract);
        let mut history = StatusHistory::new();

        history.insert(Status::Rejected, entry(5), chain);
        history.insert(Status::Contracted, entry(3), chain);
        history.insert(Status::New, entry(1), chain);

        let order: Vec<_> = history.keys().copied().collect();
        assert_eq!(order, vec![Status::New, Status::Contracted, Status::Rejected]);

        history.insert(Status::Contracted, entry(4), chain);
        assert_eq!(history.len(), 3);
        assert_eq!(history[&Status::Contracted], entry(4));
    }

    #[test]
    fn test_json_object_keeps_order() {
        let json = r#"{"CLOSED": {"timestamp": "2024-04-03"}, "OPEN": {"timestamp": "2024-04-01"}}"#;
        let mut history: StatusHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.keys().copied().collect::<Vec<_>>(), vec![Status::Closed, Status::Open]);

        history.sort_by_chain(LifecycleTable::default().chain(RecordKind::Report));
        let out = serde_json::to_string(&history).unwrap();
        assert!(out.find("OPEN").unwrap() < out.find("CLOSED").unwrap());
    }
}
