//! The input queue: pending events, accepted history, and the current phase.
//!
//! The queue is the authority on whether an incoming event is legal given
//! the current phase. Admission is a silent pre-filter; popping consults
//! the phase's transition function and, on a real phase change, records the
//! event in newest-first history and reports the entered phase so the
//! session can run entry behavior.
//!
//! There is no error type here. Illegal or unrecognized events are dropped,
//! not reported — the state machine is a filter, not a validator that
//! surfaces user-facing errors.
//!
//! Reentrant calls into [`InputQueue::pop`] are not supported; the
//! single-threaded driving caller must finish one pop before starting the
//! next.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::input::{Input, InputKind};
use crate::phase::Phase;

/// The result of consuming one pending event.
#[derive(Debug, Clone, PartialEq)]
pub struct Popped {
    /// The consumed event.
    pub input: Input,
    /// The phase that was entered, when the transition actually changed
    /// phase; `None` for a self-transition.
    pub entered: Option<Phase>,
}

/// Ordered pending events, newest-first history, and the current phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputQueue {
    pending: VecDeque<Input>,
    history: VecDeque<Input>,
    phase: Phase,
}

impl InputQueue {
    /// Creates an empty queue starting in the given phase.
    #[must_use]
    pub fn new(initial: Phase) -> Self {
        Self {
            pending: VecDeque::new(),
            history: VecDeque::new(),
            phase: initial,
        }
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The pending events, oldest first.
    #[must_use]
    pub const fn pending(&self) -> &VecDeque<Input> {
        &self.pending
    }

    /// The accepted phase-changing events, newest first.
    #[must_use]
    pub const fn history(&self) -> &VecDeque<Input> {
        &self.history
    }

    /// Appends an event to the pending queue if the current phase admits
    /// it; otherwise the event is dropped silently.
    ///
    /// Returns whether the event was queued. This is a pre-filter, not a
    /// transition — admission never changes phase.
    pub fn admit(&mut self, input: Input) -> bool {
        if self.phase.admits(&input) {
            trace!(kind = ?input.kind(), phase = %self.phase, "event admitted");
            self.pending.push_back(input);
            true
        } else {
            trace!(kind = ?input.kind(), phase = %self.phase, "event dropped by admission filter");
            false
        }
    }

    /// Consumes the first pending event.
    ///
    /// - Empty queue: side-effect-free, returns `None`.
    /// - Head has no transition in the current phase: the event is
    ///   discarded (a legal-but-currently-ignored event) and `None` is
    ///   returned.
    /// - Otherwise the event is consumed and the phase replaced by the
    ///   transition's target. Iff the target differs from the prior phase,
    ///   the event is prepended to history and [`Popped::entered`] names
    ///   the new phase so the caller can run its entry behavior.
    pub fn pop(&mut self) -> Option<Popped> {
        let head = self.pending.front()?;
        match self.phase.transition(head) {
            None => {
                if let Some(ignored) = self.pending.pop_front() {
                    trace!(kind = ?ignored.kind(), phase = %self.phase, "ignored event discarded");
                }
                None
            }
            Some(target) => {
                let input = self.pending.pop_front()?;
                let entered = (target != self.phase).then_some(target);
                if entered.is_some() {
                    debug!(from = %self.phase, to = %target, kind = ?input.kind(), "phase change");
                    self.history.push_front(input.clone());
                }
                self.phase = target;
                Some(Popped { input, entered })
            }
        }
    }

    /// Clears pending queue and history and sets the phase.
    pub fn reset(&mut self, to: Phase) {
        self.pending.clear();
        self.history.clear();
        self.phase = to;
    }

    /// Walks history newest-first and returns the first touch-began event —
    /// unless a plain touch is encountered first, in which case the press
    /// was already finalized and nothing is returned.
    #[must_use]
    pub fn most_recent_touch_began(&self) -> Option<&Input> {
        for event in &self.history {
            match event.kind() {
                InputKind::Touch => return None,
                InputKind::TouchBegan => return Some(event),
                _ => {}
            }
        }
        None
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(Phase::Playing)
    }
}

impl fmt::Display for InputQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {} | pending [", self.phase)?;
        for (i, event) in self.pending.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{event}")?;
        }
        write!(f, "]")
    }
}
