//! Pending-job priority queue.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Utc};

use cadence_core::models::Priority;

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueueEntry {
    weight: u8,
    created_at: DateTime<Utc>,
    sequence: u64,
    job_id: String,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher weight first, then earlier creation, then
        // earlier submission.
        self.weight
            .cmp(&other.weight)
            .then_with(|| other.created_at.cmp(&self.created_at))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dispatch order over pending job ids.
///
/// Removal is lazy: removed entries stay in the heap and are skipped on
/// pop unless their sequence is still the live one for that id.
#[derive(Debug, Default)]
pub struct JobQueue {
    heap: BinaryHeap<QueueEntry>,
    queued: HashMap<String, u64>,
    next_sequence: u64,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job_id: impl Into<String>, priority: Priority, created_at: DateTime<Utc>) {
        let job_id = job_id.into();
        self.queued.insert(job_id.clone(), self.next_sequence);
        self.heap.push(QueueEntry {
            weight: priority.weight(),
            created_at,
            sequence: self.next_sequence,
            job_id,
        });
        self.next_sequence += 1;
    }

    /// Next job id to dispatch.
    pub fn pop(&mut self) -> Option<String> {
        while let Some(entry) = self.heap.pop() {
            if self.queued.get(&entry.job_id) == Some(&entry.sequence) {
                self.queued.remove(&entry.job_id);
                return Some(entry.job_id);
            }
        }
        None
    }

    /// Returns false if the id was not queued.
    pub fn remove(&mut self, job_id: &str) -> bool {
        let removed = self.queued.remove(job_id).is_some();
        if self.queued.is_empty() {
            self.heap.clear();
        }
        removed
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.queued.contains_key(job_id)
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Queued ids in dispatch order.
    pub fn ordered_ids(&self) -> Vec<String> {
        let mut entries: Vec<&QueueEntry> = self
            .heap
            .iter()
            .filter(|e| self.queued.get(&e.job_id) == Some(&e.sequence))
            .collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|e| e.job_id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
    }

    #[test]
    fn priority_then_creation_then_submission() {
        let mut queue = JobQueue::new();
        queue.push("a", Priority::Low, t(0));
        queue.push("b", Priority::Critical, t(1));
        queue.push("c", Priority::Normal, t(2));
        queue.push("d", Priority::Normal, t(2));
        queue.push("e", Priority::Normal, t(1));

        assert_eq!(queue.ordered_ids(), vec!["b", "e", "c", "d", "a"]);
        let popped: Vec<String> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(popped, vec!["b", "e", "c", "d", "a"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn removed_ids_are_skipped() {
        let mut queue = JobQueue::new();
        queue.push("a", Priority::High, t(0));
        queue.push("b", Priority::Normal, t(0));
        assert!(queue.remove("a"));
        assert!(!queue.remove("a"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop().as_deref(), Some("b"));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn reinserted_id_takes_its_new_position() {
        let mut queue = JobQueue::new();
        queue.push("a", Priority::Normal, t(0));
        queue.push("b", Priority::Normal, t(1));
        queue.remove("a");
        queue.push("a", Priority::Normal, t(2));
        assert_eq!(queue.ordered_ids(), vec!["b", "a"]);
        assert_eq!(queue.pop().as_deref(), Some("b"));
        assert_eq!(queue.pop().as_deref(), Some("a"));
        assert_eq!(queue.pop(), None);
    }
}
