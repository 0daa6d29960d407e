//! Bounded, newest-first lists backing the data table and alert lists.

use std::collections::VecDeque;

use fieldsense_core::alert::Alert;
use fieldsense_core::types::AlertId;

/// A newest-first list with a fixed capacity.
///
/// When the list is full, prepending drops the oldest (last) row.
/// Lists built with a placeholder show it whenever they are empty —
/// it disappears on the first insert and comes back once the list
/// empties again.
#[derive(Debug)]
pub struct BoundedList<R> {
    rows: VecDeque<R>,
    cap: usize,
    placeholder: Option<String>,
}

impl<R> BoundedList<R> {
    pub fn new(cap: usize) -> Self {
        Self {
            rows: VecDeque::with_capacity(cap),
            cap,
            placeholder: None,
        }
    }

    pub fn with_placeholder(cap: usize, placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: Some(placeholder.into()),
            ..Self::new(cap)
        }
    }

    /// Insert at the top, evicting from the bottom past the cap.
    pub fn prepend(&mut self, row: R) {
        self.rows.push_front(row);
        while self.rows.len() > self.cap {
            self.rows.pop_back();
        }
    }

    /// Remove the first row matching the predicate.
    ///
    /// Returns `false` (and mutates nothing) when no row matches.
    pub fn remove_by(&mut self, pred: impl Fn(&R) -> bool) -> bool {
        match self.rows.iter().position(|r| pred(r)) {
            Some(idx) => {
                self.rows.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Rows in display order, newest first.
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    /// Placeholder text to render instead of rows, when applicable.
    pub fn placeholder(&self) -> Option<&str> {
        if self.rows.is_empty() {
            self.placeholder.as_deref()
        } else {
            None
        }
    }
}

/// The active-alerts list: bounded, newest first, resolved by id.
#[derive(Debug)]
pub struct AlertList {
    list: BoundedList<Alert>,
}

impl AlertList {
    pub fn new(cap: usize) -> Self {
        Self {
            list: BoundedList::with_placeholder(cap, "Aucune alerte active"),
        }
    }

    /// Display a newly raised alert at the top of the list.
    pub fn push(&mut self, alert: Alert) {
        self.list.prepend(alert);
    }

    /// Remove an alert by id.
    ///
    /// Resolving an id that is absent (already resolved, or evicted)
    /// is a no-op, so repeated or out-of-order resolutions are safe.
    pub fn resolve(&mut self, id: AlertId) -> bool {
        self.list.remove_by(|a| a.id == id)
    }

    pub fn contains(&self, id: AlertId) -> bool {
        self.list.rows().any(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Alerts in display order, newest first.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.list.rows()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.list.placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fieldsense_core::alert::Severity;

    fn alert(id: AlertId) -> Alert {
        Alert {
            id,
            sensor_id: "nitrogen".into(),
            severity: Severity::Medium,
            kind: "threshold".into(),
            message: format!("alerte {id}"),
            timestamp: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    #[test]
    fn prepend_evicts_oldest_past_cap() {
        let mut list = BoundedList::new(3);
        for n in 1..=5 {
            list.prepend(n);
        }
        let rows: Vec<i32> = list.rows().copied().collect();
        assert_eq!(rows, vec![5, 4, 3]);
    }

    #[test]
    fn placeholder_hides_on_insert_and_restores_on_empty() {
        let mut list = BoundedList::with_placeholder(5, "Aucune donnée");
        assert_eq!(list.placeholder(), Some("Aucune donnée"));

        list.prepend("row");
        assert_eq!(list.placeholder(), None);

        assert!(list.remove_by(|r| *r == "row"));
        assert_eq!(list.placeholder(), Some("Aucune donnée"));
    }

    #[test]
    fn list_without_placeholder_never_shows_one() {
        let list: BoundedList<&str> = BoundedList::new(5);
        assert_eq!(list.placeholder(), None);
    }

    #[test]
    fn newest_alert_renders_first() {
        let mut list = AlertList::new(10);
        list.push(alert(1)); // A
        list.push(alert(2)); // B

        let order: Vec<AlertId> = list.alerts().map(|a| a.id).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn resolve_removes_only_the_matching_alert() {
        let mut list = AlertList::new(10);
        list.push(alert(1));
        list.push(alert(2));

        assert!(list.resolve(1));
        assert!(!list.contains(1));
        assert!(list.contains(2));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn resolving_an_absent_id_is_a_noop() {
        let mut list = AlertList::new(10);
        list.push(alert(1));

        assert!(!list.resolve(99));
        assert_eq!(list.len(), 1);

        // Resolving twice: second call must not error or mutate.
        assert!(list.resolve(1));
        assert!(!list.resolve(1));
        assert!(list.is_empty());
    }

    #[test]
    fn clear_empties_the_table() {
        let mut list = BoundedList::new(3);
        list.prepend(1);
        list.prepend(2);
        list.clear();
        assert!(list.is_empty());
    }
}
