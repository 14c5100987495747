use std::time::Duration;

use web_time::Instant;

/// A pending computer move, stamped with the session generation it was
/// scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
}

/// Decides when a pending computer move becomes due. Whether it still
/// applies is up to the session.
pub trait Scheduler: Send {
    /// Arms `ticket` to become due after `delay`.
    fn schedule(&mut self, ticket: Ticket, delay: Duration);

    /// Removes and returns every ticket whose delay has elapsed, oldest first.
    fn take_due(&mut self) -> Vec<Ticket>;

    /// Time left until the earliest pending ticket is due.
    fn time_until_due(&self) -> Option<Duration>;

    fn cancel_all(&mut self);
}

/// Ignores the delay: tickets are due as soon as they are scheduled.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    queue: Vec<Ticket>,
}

impl Scheduler for ImmediateScheduler {
    fn schedule(&mut self, ticket: Ticket, _delay: Duration) {
        self.queue.push(ticket);
    }

    fn take_due(&mut self) -> Vec<Ticket> {
        std::mem::take(&mut self.queue)
    }

    fn time_until_due(&self) -> Option<Duration> {
        (!self.queue.is_empty()).then_some(Duration::ZERO)
    }

    fn cancel_all(&mut self) {
        self.queue.clear();
    }
}

/// Wall-clock scheduler. Works in the browser through `web_time`.
#[derive(Debug, Default)]
pub struct ClockScheduler {
    pending: Vec<(Instant, Ticket)>,
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ClockScheduler {
    fn schedule(&mut self, ticket: Ticket, delay: Duration) {
        self.pending.push((Instant::now() + delay, ticket));
    }

    fn take_due(&mut self) -> Vec<Ticket> {
        let now = Instant::now();
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(deadline, _)| *deadline <= now);
        self.pending = waiting;
        due.into_iter().map(|(_, ticket)| ticket).collect()
    }

    fn time_until_due(&self) -> Option<Duration> {
        let now = Instant::now();
        self.pending
            .iter()
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
            .min()
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}
