//! Event queue with immediate and deferred delivery
//!
//! Deferred events are keyed to a simulation clock that the owner advances
//! once per frame, so "call this in 0.15 s" never depends on a host timer and
//! a whole session can be stepped deterministically.
//!
//! There is no cancellation. An event whose subject went away while it was
//! waiting is still delivered; receivers are expected to re-check liveness.

/// A deferred event waiting for its delivery time
#[derive(Debug, Clone)]
struct Pending<E> {
    delivery_time: f64,
    sequence: u64,
    event: E,
}

/// Event queue keyed to an explicit simulation clock
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    immediate_queue: Vec<E>,
    deferred_queue: Vec<Pending<E>>,
    current_time: f64,
    next_sequence: u64,
}

impl<E> EventQueue<E> {
    /// Create a new empty queue at time zero
    pub const fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            deferred_queue: Vec::new(),
            current_time: 0.0,
            next_sequence: 0,
        }
    }

    /// Current simulation time (seconds since creation or last reset)
    pub const fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Advance the simulation clock
    pub fn advance(&mut self, delta_time: f32) {
        self.current_time += f64::from(delta_time.max(0.0));
    }

    /// Send event for delivery on the next drain
    pub fn send(&mut self, event: E) {
        self.immediate_queue.push(event);
    }

    /// Post event for delivery `delay` seconds from now
    pub fn post(&mut self, delay: f32, event: E) {
        let delivery_time = self.current_time + f64::from(delay.max(0.0));
        self.deferred_queue.push(Pending {
            delivery_time,
            sequence: self.next_sequence,
            event,
        });
        self.next_sequence += 1;
    }

    /// Take every event that is due.
    ///
    /// Immediate events come first in send order, then due deferred events
    /// ordered by delivery time and, for equal times, post order.
    pub fn drain_due(&mut self) -> Vec<E> {
        let mut due: Vec<E> = std::mem::take(&mut self.immediate_queue);

        let now = self.current_time;
        let (mut ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred_queue)
            .into_iter()
            .partition(|pending| pending.delivery_time <= now);
        self.deferred_queue = waiting;

        ready.sort_by(|a, b| {
            a.delivery_time
                .total_cmp(&b.delivery_time)
                .then(a.sequence.cmp(&b.sequence))
        });
        due.extend(ready.into_iter().map(|pending| pending.event));
        due
    }

    /// Number of events not yet delivered
    pub fn pending_count(&self) -> usize {
        self.immediate_queue.len() + self.deferred_queue.len()
    }

    /// Whether nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.pending_count() == 0
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
        self.deferred_queue.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_dispatch() {
        let mut queue = EventQueue::new();
        queue.send("clicked");
        assert_eq!(queue.drain_due(), vec!["clicked"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_deferred_dispatch() {
        let mut queue = EventQueue::new();
        queue.post(1.0, 7_u32);

        // Event should not be delivered at t=0.5
        queue.advance(0.5);
        assert!(queue.drain_due().is_empty());
        assert_eq!(queue.pending_count(), 1);

        // Event should be delivered at t=1.0
        queue.advance(0.5);
        assert_eq!(queue.drain_due(), vec![7]);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_deferred_order_is_time_then_post_order() {
        let mut queue = EventQueue::new();
        queue.post(0.3, "late");
        queue.post(0.1, "first");
        queue.post(0.1, "second");
        queue.send("now");
        queue.advance(0.5);
        assert_eq!(queue.drain_due(), vec!["now", "first", "second", "late"]);
    }

    #[test]
    fn test_delay_is_relative_to_post_time() {
        let mut queue = EventQueue::new();
        queue.advance(2.0);
        queue.post(0.25, ());
        queue.advance(0.2);
        assert!(queue.drain_due().is_empty());
        queue.advance(0.05);
        assert_eq!(queue.drain_due().len(), 1);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut queue = EventQueue::new();
        queue.send(1);
        queue.post(0.5, 2);
        queue.clear();
        queue.advance(1.0);
        assert!(queue.drain_due().is_empty());
    }
}
