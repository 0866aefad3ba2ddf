use serde::Serialize;

/// Delayed transitions the session can schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TimerKind {
    /// shaking -> result
    Reveal,
    /// burning -> idle
    Extinguish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Phase epoch that scheduled the timer.
    pub epoch: u64,
}

#[derive(Clone, Debug)]
struct PendingTimer {
    id: TimerId,
    kind: TimerKind,
    epoch: u64,
    remaining_ms: f64,
}

/// Cancellable one-shot timers driven by elapsed frame time.
/// Each timer is tagged with the phase epoch that scheduled it.
#[derive(Default)]
pub struct TimerQueue {
    pending: Vec<PendingTimer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, delay_ms: f64, epoch: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            kind,
            epoch,
            remaining_ms: delay_ms.max(0.0),
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Advance by `elapsed_ms` and return timers that came due, earliest first.
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<FiredTimer> {
        let mut due = Vec::new();
        for t in &mut self.pending {
            t.remaining_ms -= elapsed_ms;
        }
        self.pending.retain(|t| {
            if t.remaining_ms <= 0.0 {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.remaining_ms
                .total_cmp(&b.remaining_ms)
                .then(a.id.cmp(&b.id))
        });
        due.into_iter()
            .map(|t| FiredTimer {
                id: t.id,
                kind: t.kind,
                epoch: t.epoch,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(TimerKind::Reveal, 2000.0, 1);

        assert!(timers.advance(1999.0).is_empty());
        let fired = timers.advance(1.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert_eq!(fired[0].kind, TimerKind::Reveal);
        assert_eq!(fired[0].epoch, 1);
        assert!(timers.advance(5000.0).is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(TimerKind::Extinguish, 3000.0, 4);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance(10_000.0).is_empty());
    }

    #[test]
    fn cancelling_one_timer_leaves_the_others() {
        let mut timers = TimerQueue::new();
        let stale = timers.schedule(TimerKind::Reveal, 100.0, 1);
        let live = timers.schedule(TimerKind::Extinguish, 100.0, 2);

        assert!(timers.cancel(stale));
        assert_eq!(timers.len(), 1);
        let fired = timers.advance(200.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, live);
        assert_eq!(fired[0].epoch, 2);
    }

    #[test]
    fn due_timers_come_out_earliest_first() {
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKind::Extinguish, 300.0, 0);
        timers.schedule(TimerKind::Reveal, 100.0, 0);

        let fired = timers.advance(500.0);
        let kinds: Vec<_> = fired.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TimerKind::Reveal, TimerKind::Extinguish]);
    }
}
