//! In-memory record store: the ordered list the table is rendered from.

use crate::model::{UserId, UserRecord};

/// Ordered collection of user records holding at most one record per id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<UserRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection. Duplicate ids collapse onto the first
    /// position with the last payload winning.
    pub fn load(&mut self, records: Vec<UserRecord>) {
        self.records.clear();
        self.records.reserve(records.len());
        for record in records {
            self.upsert(record);
        }
    }

    /// Replace the record with the same id in place, or append it.
    pub fn upsert(&mut self, record: UserRecord) {
        match self.position(record.id) {
            Some(idx) => self.records[idx] = record,
            None => self.records.push(record),
        }
    }

    /// Remove the record with `id`; absent ids leave the store untouched.
    pub fn remove(&mut self, id: UserId) -> Option<UserRecord> {
        let idx = self.position(id)?;
        Some(self.records.remove(idx))
    }

    /// Id for a record created locally. The server echo is never used: the
    /// placeholder backend hands out ids that collide with existing ones.
    pub fn next_local_id(&self) -> UserId {
        let candidate = UserId(self.records.len() as u64 + 1);
        if self.position(candidate).is_none() {
            return candidate;
        }
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(UserId::UNASSIGNED)
            .next()
    }

    pub fn position(&self, id: UserId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: u64, name: &str) -> UserRecord {
        UserRecord { id: UserId(id), name: name.to_string(), ..UserRecord::zero() }
    }

    fn ids(store: &RecordStore) -> Vec<u64> {
        store.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new_ids() {
        let mut store = RecordStore::new();
        store.load(vec![rec(1, "a"), rec(2, "b"), rec(3, "c")]);

        store.upsert(rec(2, "bee"));
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.get(UserId(2)).map(|r| r.name.as_str()), Some("bee"));

        store.upsert(rec(9, "z"));
        assert_eq!(ids(&store), vec![1, 2, 3, 9]);
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut once = RecordStore::new();
        once.load(vec![rec(1, "a"), rec(2, "b")]);
        let mut twice = once.clone();

        once.upsert(rec(2, "x"));
        twice.upsert(rec(2, "x"));
        twice.upsert(rec(2, "x"));
        assert_eq!(once, twice);

        once.upsert(rec(5, "new"));
        twice.upsert(rec(5, "new"));
        twice.upsert(rec(5, "new"));
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_twice_is_a_noop_the_second_time() {
        let mut store = RecordStore::new();
        store.load(vec![rec(1, "a"), rec(2, "b")]);
        assert_eq!(store.remove(UserId(1)).map(|r| r.id), Some(UserId(1)));
        let after_first = store.clone();
        assert!(store.remove(UserId(1)).is_none());
        assert_eq!(store, after_first);
    }

    #[test]
    fn remove_of_absent_id_leaves_store_unchanged() {
        let mut store = RecordStore::new();
        store.load((1..=5).map(|i| rec(i, "u")).collect());
        let before = store.clone();
        assert!(store.remove(UserId(7)).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn load_collapses_duplicate_ids() {
        let mut store = RecordStore::new();
        store.load(vec![rec(1, "a"), rec(2, "b"), rec(1, "a2")]);
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.get(UserId(1)).map(|r| r.name.as_str()), Some("a2"));
    }

    #[test]
    fn next_local_id_is_len_plus_one_unless_taken() {
        let mut store = RecordStore::new();
        assert_eq!(store.next_local_id(), UserId(1));

        store.load((1..=10).map(|i| rec(i, "u")).collect());
        assert_eq!(store.next_local_id(), UserId(11));

        // after a delete, len + 1 == 10 is still in use
        store.remove(UserId(3));
        assert_eq!(store.next_local_id(), UserId(11));
    }
}
