//! Transient user messages that expire after a fixed delay.
//!
//! Posting a message returns an [`Action::ScheduleTimeout`]. Every armed timer
//! produces exactly one timer event, and all timers share the same delay, so
//! expiries arrive in posting order and a FIFO of pending ids is enough to know
//! which message a timer belongs to. A message is only cleared if it is still
//! the one that armed the timer; a newer message in the same slot survives.

use crate::app::actions::Action;
use std::collections::VecDeque;

/// Default lifetime of a transient message.
pub const DEFAULT_FLASH_SECONDS: f64 = 5.0;

/// Where a message is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashSlot {
    /// Next to the login form / session status.
    Auth,
    /// The general message line above the cafe list.
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: String,
    pub tone: Tone,
    id: u64,
}

#[derive(Debug, Clone)]
pub struct FlashBoard {
    auth: Option<Flash>,
    main: Option<Flash>,
    pending: VecDeque<(FlashSlot, u64)>,
    next_id: u64,
    lifetime: f64,
}

impl FlashBoard {
    #[must_use]
    pub fn new(lifetime: f64) -> Self {
        Self {
            auth: None,
            main: None,
            pending: VecDeque::new(),
            next_id: 0,
            lifetime,
        }
    }

    /// Shows `text` in `slot`, replacing what was there, and returns the timer
    /// action that will expire it.
    pub fn post(&mut self, slot: FlashSlot, tone: Tone, text: impl Into<String>) -> Action {
        self.next_id += 1;
        let flash = Flash {
            text: text.into(),
            tone,
            id: self.next_id,
        };
        tracing::debug!(slot = ?slot, tone = ?tone, text = %flash.text, "flash posted");
        *self.slot_mut(slot) = Some(flash);
        self.pending.push_back((slot, self.next_id));
        Action::ScheduleTimeout {
            seconds: self.lifetime,
        }
    }

    /// Handles one elapsed timer. Returns `true` if a visible message was cleared.
    pub fn expire_oldest(&mut self) -> bool {
        let Some((slot, id)) = self.pending.pop_front() else {
            return false;
        };
        let current = self.slot_mut(slot);
        if current.as_ref().is_some_and(|f| f.id == id) {
            *current = None;
            true
        } else {
            false
        }
    }

    /// Drops all visible messages. Timers still pending become no-ops.
    pub fn clear(&mut self) {
        self.auth = None;
        self.main = None;
    }

    #[must_use]
    pub const fn get(&self, slot: FlashSlot) -> Option<&Flash> {
        match slot {
            FlashSlot::Auth => self.auth.as_ref(),
            FlashSlot::Main => self.main.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: FlashSlot) -> &mut Option<Flash> {
        match slot {
            FlashSlot::Auth => &mut self.auth,
            FlashSlot::Main => &mut self.main,
        }
    }
}

impl Default for FlashBoard {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH_SECONDS)
    }
}
