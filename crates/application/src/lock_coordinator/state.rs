use std::time::Duration;

/// Terminal state of one acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The entry was written and belongs to the returned token.
    Acquired,
    /// The wait timeout elapsed while another party held the lock.
    TimedOut,
    /// The caller cancelled while waiting. No entry was left behind.
    Cancelled,
}

/// What the poll loop does after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PollStep {
    Sleep(Duration),
    Finish(AcquireOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Polling,
    Finished(AcquireOutcome),
}

/// Bounded retry state machine behind `acquire`.
///
/// Transitions: `Polling -> Acquired | TimedOut | Cancelled`. The machine owns
/// no clock; callers report elapsed time with every attempt.
#[derive(Debug)]
pub(super) struct AcquireMachine {
    wait_timeout: Duration,
    poll_interval: Duration,
    attempts: u32,
    state: PollState,
}

impl AcquireMachine {
    pub(super) fn new(wait_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            wait_timeout,
            poll_interval,
            attempts: 0,
            state: PollState::Polling,
        }
    }

    /// Records the result of one set-if-absent attempt.
    pub(super) fn record_attempt(&mut self, acquired: bool, elapsed: Duration) -> PollStep {
        if let PollState::Finished(outcome) = self.state {
            return PollStep::Finish(outcome);
        }

        self.attempts = self.attempts.saturating_add(1);

        if acquired {
            return self.finish(AcquireOutcome::Acquired);
        }

        match self.wait_timeout.checked_sub(elapsed) {
            Some(remaining) if !remaining.is_zero() => {
                PollStep::Sleep(self.poll_interval.min(remaining))
            }
            _ => self.finish(AcquireOutcome::TimedOut),
        }
    }

    pub(super) fn cancel(&mut self) -> AcquireOutcome {
        match self.state {
            PollState::Finished(AcquireOutcome::TimedOut) => AcquireOutcome::TimedOut,
            _ => {
                self.state = PollState::Finished(AcquireOutcome::Cancelled);
                AcquireOutcome::Cancelled
            }
        }
    }

    pub(super) fn attempts(&self) -> u32 {
        self.attempts
    }

    fn finish(&mut self, outcome: AcquireOutcome) -> PollStep {
        self.state = PollState::Finished(outcome);
        PollStep::Finish(outcome)
    }
}
