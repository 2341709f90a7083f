//! The caret synchronization engine.
//!
//! `CaretSync` owns the surface, the timer, and the per-activation session.
//! Platform layers feed it native notifications; the owner feeds it target
//! carets. Messages for the owner collect in an outbox the host drains after
//! each call.

use std::collections::VecDeque;

use crate::bridge::{RenderCommitBridge, SurfaceMutation};
use crate::composition::CompositionBuffer;
use crate::config::SyncConfig;
use crate::error::PlacementError;
use crate::input::RawEdit;
use crate::machine::{CaretMachine, MachineState};
use crate::mapper;
use crate::normalizer::{self, BeforeInputResult};
use crate::platform::{RecoveryTimer, Surface, TimerToken};
use crate::tracker::{NavigationTracker, NavigationTrigger};
use crate::types::{LogicalOffset, OwnerMessage, SelectionRange, SpecialKey};

/// Result of a keydown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// A special key, forwarded to the owner. Prevent the native default.
    Handled,
    PassThrough,
}

/// State that lives from activation to teardown.
#[derive(Debug, Default)]
struct Session {
    machine: CaretMachine,
    composition: CompositionBuffer,
    tracker: NavigationTracker,
    bridge: RenderCommitBridge,
}

/// Why an edit cycle ended.
#[derive(Debug, Clone, Copy)]
enum Completion {
    RenderCommit,
    Recovery,
}

impl Completion {
    fn as_str(self) -> &'static str {
        match self {
            Self::RenderCommit => "renderCommit",
            Self::Recovery => "recoveryTimeout",
        }
    }
}

pub struct CaretSync<S: Surface, T: RecoveryTimer> {
    surface: S,
    timer: T,
    config: SyncConfig,
    session: Option<Session>,
    outbox: VecDeque<OwnerMessage>,
}

impl<S: Surface, T: RecoveryTimer> CaretSync<S, T> {
    pub fn new(surface: S, timer: T, config: SyncConfig) -> Self {
        Self {
            surface,
            timer,
            config,
            session: None,
            outbox: VecDeque::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Machine state, or None when not activated.
    pub fn state(&self) -> Option<MachineState> {
        self.session.as_ref().map(|s| s.machine.state())
    }

    pub fn tracked_selection(&self) -> Option<SelectionRange> {
        self.session.as_ref().map(|s| s.tracker.selection())
    }

    /// Notifications waiting for the current cycle to finish.
    pub fn pending_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.machine.pending_len())
    }

    pub fn is_composing(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.composition.is_active())
    }

    pub fn pop_message(&mut self) -> Option<OwnerMessage> {
        self.outbox.pop_front()
    }

    pub fn drain_messages(&mut self) -> Vec<OwnerMessage> {
        self.outbox.drain(..).collect()
    }

    fn send(&mut self, message: OwnerMessage) {
        tracing::debug!(target: "smartbar::machine", %message, "message for owner");
        self.outbox.push_back(message);
    }

    /// Start a fresh session. Re-activating discards the previous one.
    pub fn activate(&mut self) {
        if let Some(old) = self.session.take() {
            self.disarm_session_timer(old);
            tracing::debug!(
                target: "smartbar::machine",
                "re-activating, previous session dropped"
            );
        }
        self.session = Some(Session::default());
        tracing::info!(target: "smartbar::machine", "smart bar activated");
    }

    /// Tear down the session and tell the owner the surface may go.
    ///
    /// In-flight cycles and queued notifications are dropped. The detach
    /// message is sent even when nothing was active, so the owner never waits
    /// on it.
    pub fn deactivate(&mut self) {
        if let Some(session) = self.session.take() {
            let dropped = session.machine.pending_len();
            let state = session.machine.state();
            self.disarm_session_timer(session);
            tracing::info!(
                target: "smartbar::machine",
                state = state.as_str(),
                dropped,
                "smart bar deactivated"
            );
        }
        self.send(OwnerMessage::SurfaceDetached);
    }

    fn disarm_session_timer(&mut self, mut session: Session) {
        if let Some(token) = session.machine.take_armed() {
            self.timer.disarm(token);
        }
    }

    /// A native edit notification, before the platform applies it.
    pub fn before_input(&mut self, raw: RawEdit) -> BeforeInputResult {
        let Some(session) = self.session.as_mut() else {
            return BeforeInputResult::PassThrough;
        };
        let composing = session.composition.is_active();
        let result = normalizer::before_input_result(&raw.input_type, composing);
        // Composition collapses regardless of cycle state; only the released
        // edit takes a place in the queue.
        if composing && !raw.input_type.is_history() {
            session.composition.buffer(raw);
            return result;
        }
        if !session.machine.is_idle() {
            session.machine.enqueue(raw);
            return result;
        }
        self.process(raw);
        result
    }

    /// Handle one notification while idle.
    fn process(&mut self, raw: RawEdit) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if raw.input_type.is_history() {
            tracing::debug!(
                target: "smartbar::machine",
                input_type = ?raw.input_type,
                "history replay dropped"
            );
            return;
        }
        let Some(intent) = normalizer::normalize(&raw, session.tracker.selection()) else {
            tracing::trace!(
                target: "smartbar::machine",
                input_type = ?raw.input_type,
                "notification not forwarded"
            );
            return;
        };

        session.machine.begin();
        if let Some(timeout) = self.config.owner_reply_timeout {
            let token = session.machine.arm();
            self.timer.arm(token, timeout);
        }
        self.send(OwnerMessage::EditIntent(intent));
    }

    pub fn composition_start(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.composition.start(session.tracker.selection());
        }
    }

    /// Release the collapsed composition edit, if any, through the normal
    /// notification path.
    pub fn composition_end(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(raw) = session.composition.end() {
            self.before_input(raw);
        }
    }

    /// The owner applied the edit and wants the caret at `offset`.
    ///
    /// Ignored unless an intent is awaiting a reply.
    pub fn set_target_caret(&mut self, offset: LogicalOffset) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(
                target: "smartbar::machine",
                offset,
                "target caret while inactive"
            );
            return;
        };
        let state = session.machine.state();
        if !session.machine.accept_target(offset) {
            tracing::debug!(
                target: "smartbar::machine",
                offset,
                state = state.as_str(),
                "target caret out of step, ignored"
            );
            return;
        }
        if let Some(reply_timer) = session.machine.take_armed() {
            self.timer.disarm(reply_timer);
        }
        session.tracker.assume(SelectionRange::caret(offset));
        session.composition.rebase(SelectionRange::caret(offset));
        let token = session.machine.arm();
        self.timer.arm(token, self.config.recovery_delay);
    }

    /// A batch of mutation records from the surface.
    pub fn surface_mutated(&mut self, mutations: &[SurfaceMutation]) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let state = session.machine.state();
        if session.bridge.observe(mutations, state) {
            self.complete(Completion::RenderCommit);
        }
    }

    /// Shorthand for hosts that know a render landed without mutation records.
    pub fn render_committed(&mut self) {
        self.surface_mutated(&[SurfaceMutation::CharacterData]);
    }

    pub fn timer_fired(&mut self, token: TimerToken) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.machine.claim_fired(token) {
            tracing::trace!(target: "smartbar::machine", ?token, "stale timer ignored");
            return;
        }
        match session.machine.state() {
            MachineState::AwaitingCommit { .. } => self.complete(Completion::Recovery),
            MachineState::AwaitingOwner => {
                tracing::warn!(
                    target: "smartbar::machine",
                    "owner never replied to edit intent, abandoning cycle"
                );
                session.machine.abandon();
                self.drain_pending();
            }
            MachineState::Idle => {}
        }
    }

    /// End the cycle: place the caret, go idle, process what queued up.
    fn complete(&mut self, how: Completion) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(token) = session.machine.take_armed() {
            self.timer.disarm(token);
        }
        let Some(target) = session.machine.finish() else {
            return;
        };

        match place_caret(&mut self.surface, target) {
            Ok(()) => tracing::debug!(
                target: "smartbar::machine",
                caret = target,
                via = how.as_str(),
                "caret placed"
            ),
            Err(error) => tracing::warn!(
                target: "smartbar::machine",
                caret = target,
                via = how.as_str(),
                %error,
                "caret placement failed"
            ),
        }
        self.drain_pending();
    }

    /// Process queued notifications in arrival order until one starts a new
    /// cycle or the queue is empty.
    fn drain_pending(&mut self) {
        loop {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let Some(raw) = session.machine.pop_pending() else {
                return;
            };
            self.process(raw);
        }
    }

    /// A designated control key went down.
    pub fn key_down(&mut self, key: &str) -> KeydownResult {
        if self.session.is_none() || !self.surface.is_focused() || !self.config.is_special_key(key)
        {
            return KeydownResult::PassThrough;
        }
        self.send(OwnerMessage::SpecialKey(SpecialKey(key.into())));
        KeydownResult::Handled
    }

    /// Check for a caret move that did not come from an edit.
    ///
    /// Suspended while a cycle is in flight: the native selection is not
    /// authoritative until the caret is placed.
    pub fn navigate(&mut self, trigger: NavigationTrigger) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.machine.is_idle() || !self.surface.is_focused() {
            return;
        }
        if let NavigationTrigger::KeyUp(key) = &trigger {
            if !self.config.is_navigation_key(key) {
                return;
            }
        }
        let moving_right = trigger.is_right_arrow();
        if let Some(offset) = session.tracker.observe(&self.surface, moving_right) {
            self.send(OwnerMessage::NavigationCaretChanged(offset));
        }
    }
}

/// Map `target` onto the current render and collapse the native caret there.
pub fn place_caret<S: Surface>(
    surface: &mut S,
    target: LogicalOffset,
) -> Result<(), PlacementError> {
    let position = mapper::to_position(surface, target)?;
    surface.place_caret(&position)?;
    Ok(())
}
