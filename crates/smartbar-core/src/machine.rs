//! Caret synchronization state machine.
//!
//! One edit cycle runs at a time: intent sent, owner replies with a target
//! caret, owner's re-render lands, caret placed. Notifications arriving
//! mid-cycle wait in a FIFO queue. The machine only tracks state; the
//! [`CaretSync`](crate::CaretSync) orchestrator drives timers and placement.

use std::collections::VecDeque;

use web_time::Instant;

use crate::input::RawEdit;
use crate::platform::TimerToken;
use crate::types::LogicalOffset;

/// Where the current edit cycle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// Ready for the next edit notification.
    Idle,
    /// Intent sent; waiting for the owner's target caret.
    AwaitingOwner,
    /// Target known; waiting for the owner's re-render to land.
    AwaitingCommit { target: LogicalOffset },
}

impl MachineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingOwner => "awaitingOwner",
            Self::AwaitingCommit { .. } => "awaitingCommit",
        }
    }
}

#[derive(Debug)]
pub struct CaretMachine {
    state: MachineState,
    pending: VecDeque<RawEdit>,
    armed: Option<TimerToken>,
    next_token: u64,
    cycle_started: Option<Instant>,
}

impl Default for CaretMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CaretMachine {
    pub fn new() -> Self {
        Self {
            state: MachineState::Idle,
            pending: VecDeque::new(),
            armed: None,
            next_token: 0,
            cycle_started: None,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == MachineState::Idle
    }

    /// Hold a notification until the current cycle ends.
    pub fn enqueue(&mut self, raw: RawEdit) {
        self.pending.push_back(raw);
        tracing::debug!(
            target: "smartbar::machine",
            state = self.state.as_str(),
            queued = self.pending.len(),
            "cycle in flight, queueing edit"
        );
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Oldest queued notification. Only handed out while idle.
    pub fn pop_pending(&mut self) -> Option<RawEdit> {
        if !self.is_idle() {
            return None;
        }
        self.pending.pop_front()
    }

    /// `Idle → AwaitingOwner`. Returns false if a cycle is already in flight.
    pub fn begin(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = MachineState::AwaitingOwner;
        self.cycle_started = Some(Instant::now());
        true
    }

    /// `AwaitingOwner → AwaitingCommit`. Returns false (and changes nothing)
    /// if no intent is awaiting a reply.
    pub fn accept_target(&mut self, target: LogicalOffset) -> bool {
        if self.state != MachineState::AwaitingOwner {
            return false;
        }
        self.state = MachineState::AwaitingCommit { target };
        true
    }

    /// Allocate a fresh token for the timer guarding the current step.
    pub fn arm(&mut self) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.armed = Some(token);
        token
    }

    pub fn armed(&self) -> Option<TimerToken> {
        self.armed
    }

    /// Forget the armed timer, returning it so the caller can cancel it.
    pub fn take_armed(&mut self) -> Option<TimerToken> {
        self.armed.take()
    }

    /// Consume `token` if it is the armed one. A fired timer is no longer
    /// armed; any other token is stale.
    pub fn claim_fired(&mut self, token: TimerToken) -> bool {
        if self.armed == Some(token) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    /// `AwaitingCommit → Idle`, returning the target caret to place.
    pub fn finish(&mut self) -> Option<LogicalOffset> {
        let MachineState::AwaitingCommit { target } = self.state else {
            return None;
        };
        self.state = MachineState::Idle;
        if let Some(started) = self.cycle_started.take() {
            tracing::debug!(
                target: "smartbar::machine",
                caret = target,
                elapsed = ?started.elapsed(),
                queued = self.pending.len(),
                "edit cycle complete"
            );
        }
        Some(target)
    }

    /// Drop the in-flight cycle without placing a caret.
    pub fn abandon(&mut self) {
        self.state = MachineState::Idle;
        self.cycle_started = None;
    }
}
