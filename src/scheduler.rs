//! Deferred work for the container.
//!
//! Provides idle tasks, one-shot timeouts and repeating intervals on a
//! virtual clock the host advances. Nothing runs until the host calls into
//! the container, so every task runs to completion before the next one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle of a scheduled task, used to cancel it.
    pub struct TaskId;
}

/// How a task is re-armed after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fires on the next dispatch.
    Idle,
    /// Fires once after its delay.
    OneShot,
    /// Fires every interval until cancelled.
    Repeating,
}

#[derive(Debug)]
struct TaskData<T> {
    task: T,
    kind: TaskKind,
    interval: Duration,
}

/// An entry in the task queue (min-heap by fire time, then schedule order).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TaskId,
    fire_time: Duration,
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of pending tasks keyed by virtual fire time.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    now: Duration,
    tasks: SlotMap<TaskId, TaskData<T>>,
    queue: BinaryHeap<QueueEntry>,
    next_seq: u64,
    /// First sequence number of the current dispatch round, if one is open.
    round_start: Option<u64>,
    /// Idle tasks scheduled during the open round.
    held: Vec<QueueEntry>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            tasks: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
            round_start: None,
            held: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_idle(&mut self, task: T) -> TaskId {
        self.insert(task, TaskKind::Idle, Duration::ZERO)
    }

    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TaskId {
        self.insert(task, TaskKind::OneShot, delay)
    }

    /// Schedules `task` every `interval`; the first fire is one interval away.
    /// A zero interval is bumped to one millisecond so dispatch terminates.
    pub fn schedule_repeating(&mut self, interval: Duration, task: T) -> TaskId {
        let interval = interval.max(Duration::from_millis(1));
        self.insert(task, TaskKind::Repeating, interval)
    }

    fn insert(&mut self, task: T, kind: TaskKind, interval: Duration) -> TaskId {
        let id = self.tasks.insert(TaskData { task, kind, interval });
        self.push_entry(id, self.now + interval);
        id
    }

    fn push_entry(&mut self, id: TaskId, fire_time: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(QueueEntry { id, fire_time, seq });
    }

    /// Cancels a task. Cancelling an unknown or already fired task is a no-op.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.queue.clear();
        self.held.clear();
    }

    /// Opens a dispatch round. Idle tasks scheduled while it is open wait
    /// for the next round, so an idle task that reschedules itself cannot
    /// spin forever.
    pub fn begin_round(&mut self) {
        self.round_start = Some(self.next_seq);
    }

    pub fn end_round(&mut self) {
        self.round_start = None;
        self.queue.extend(self.held.drain(..));
    }

    /// Time until the next live task fires, if any.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_sub(self.now))
    }

    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.tasks.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }

    /// Moves the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl<T: Clone> DeferredQueue<T> {
    /// Pops the next task due at or before `deadline`, moving the clock to its
    /// fire time. Repeating tasks are re-armed; others are retired.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<(TaskId, T)> {
        loop {
            self.discard_cancelled();
            let entry = *self.queue.peek()?;
            if entry.fire_time > deadline {
                return None;
            }
            self.queue.pop();

            let Some(data) = self.tasks.get(entry.id) else {
                continue;
            };
            if data.kind == TaskKind::Idle && self.round_start.is_some_and(|start| entry.seq >= start) {
                self.held.push(entry);
                continue;
            }
            self.now = self.now.max(entry.fire_time);
            let task = data.task.clone();

            match data.kind {
                TaskKind::Repeating => {
                    let next = entry.fire_time + data.interval;
                    self.push_entry(entry.id, next);
                }
                TaskKind::Idle | TaskKind::OneShot => {
                    self.tasks.remove(entry.id);
                }
            }
            return Some((entry.id, task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T: Clone>(queue: &mut DeferredQueue<T>, deadline: Duration) -> Vec<T> {
        let mut fired = Vec::new();
        while let Some((_, task)) = queue.pop_due(deadline) {
            fired.push(task);
        }
        queue.set_now(deadline);
        fired
    }

    #[test]
    fn test_idle_tasks_fire_in_schedule_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule_idle("a");
        queue.schedule_idle("b");
        queue.schedule_idle("c");
        assert_eq!(drain(&mut queue, Duration::ZERO), vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_timeout_waits_for_clock() {
        let mut queue = DeferredQueue::new();
        queue.schedule_once(Duration::from_millis(10), "reveal");
        assert!(drain(&mut queue, Duration::from_millis(9)).is_empty());
        assert_eq!(drain(&mut queue, Duration::from_millis(10)), vec!["reveal"]);
        assert_eq!(queue.now(), Duration::from_millis(10));
    }

    #[test]
    fn test_repeating_task_fires_each_interval() {
        let mut queue = DeferredQueue::new();
        let id = queue.schedule_repeating(Duration::from_millis(10), "tick");
        assert_eq!(drain(&mut queue, Duration::from_millis(35)).len(), 3);
        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(drain(&mut queue, Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut queue = DeferredQueue::new();
        let id = queue.schedule_once(Duration::from_millis(5), 1);
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));

        let fired = queue.schedule_idle(2);
        drain(&mut queue, Duration::ZERO);
        assert!(!queue.cancel(fired));
    }

    #[test]
    fn test_time_until_next_skips_cancelled() {
        let mut queue = DeferredQueue::new();
        let early = queue.schedule_once(Duration::from_millis(5), 1);
        queue.schedule_once(Duration::from_millis(20), 2);
        queue.cancel(early);
        assert_eq!(queue.time_until_next(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_idle_scheduled_during_round_waits() {
        let mut queue = DeferredQueue::new();
        queue.schedule_idle("first");
        queue.begin_round();
        assert_eq!(queue.pop_due(Duration::ZERO).map(|(_, t)| t), Some("first"));
        queue.schedule_idle("again");
        assert!(queue.pop_due(Duration::ZERO).is_none());
        queue.end_round();

        assert_eq!(drain(&mut queue, Duration::ZERO), vec!["again"]);
    }

    #[test]
    fn test_earlier_deadline_wins_over_schedule_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule_once(Duration::from_millis(30), "late");
        queue.schedule_once(Duration::from_millis(10), "early");
        assert_eq!(drain(&mut queue, Duration::from_millis(50)), vec!["early", "late"]);
    }
}
