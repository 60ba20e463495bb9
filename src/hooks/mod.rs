//! Data-fetch hooks: small state containers pairing one remote operation with
//! `loading` / `error` / `data` flags.
//!
//! Every call is stamped with a sequence number when issued. Only the most
//! recently issued call may write its outcome, so a slow early response can
//! never overwrite a later one. `loading` counts calls in flight.

pub mod appointments;
pub mod item;
pub mod list;
pub mod mutation;

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub use appointments::{today_appointments, today_appointments_on, upcoming_appointments, upcoming_appointments_on};
pub use item::{ItemQuery, ItemState};
pub use list::{ListQuery, ListState};
pub use mutation::{CreateMutation, DeleteMutation, MutationState, UpdateMutation};

#[derive(Debug)]
struct Slot<D> {
    data: D,
    error: Option<String>,
}

#[derive(Debug)]
pub(crate) struct HookCell<D> {
    slot: Mutex<Slot<D>>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
    detached: AtomicBool,
}

impl<D: Clone> HookCell<D> {
    pub(crate) fn new(data: D) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Slot { data, error: None }),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            detached: AtomicBool::new(false),
        })
    }

    /// Stamp a new call and clear the previous error.
    pub(crate) fn begin(self: &Arc<Self>) -> Ticket<D> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.lock().error = None;
        Ticket {
            cell: Arc::clone(self),
            seq,
        }
    }

    pub(crate) fn snapshot(&self) -> (D, bool, Option<String>) {
        let slot = self.lock();
        (
            slot.data.clone(),
            self.in_flight.load(Ordering::SeqCst) > 0,
            slot.error.clone(),
        )
    }

    pub(crate) fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot<D>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One issued call. Dropping it, applied or not, ends the call.
pub(crate) struct Ticket<D> {
    cell: Arc<HookCell<D>>,
    seq: u64,
}

impl<D> Ticket<D> {
    fn is_current(&self) -> bool {
        !self.cell.detached.load(Ordering::SeqCst) && self.cell.issued.load(Ordering::SeqCst) == self.seq
    }

    /// Write the data outcome if this is still the latest call.
    pub(crate) fn succeed(self, update: impl FnOnce(&mut D)) {
        if self.is_current() {
            let mut slot = self.cell.slot.lock().unwrap_or_else(|e| e.into_inner());
            update(&mut slot.data);
        } else {
            tracing::debug!("dropping superseded response #{}", self.seq);
        }
    }

    /// Record the error if this is still the latest call. Data is left alone.
    pub(crate) fn fail(self, message: String) {
        if self.is_current() {
            self.cell.slot.lock().unwrap_or_else(|e| e.into_inner()).error = Some(message);
        } else {
            tracing::debug!("dropping superseded error #{}", self.seq);
        }
    }
}

impl<D> Drop for Ticket<D> {
    fn drop(&mut self) {
        self.cell.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_applies() {
        let cell = HookCell::new(0u32);
        let first = cell.begin();
        let second = cell.begin();
        assert!(cell.snapshot().1);

        second.succeed(|d| *d = 2);
        first.succeed(|d| *d = 1);

        let (data, loading, error) = cell.snapshot();
        assert_eq!(data, 2);
        assert!(!loading);
        assert!(error.is_none());
    }

    #[test]
    fn failure_keeps_previous_data() {
        let cell = HookCell::new(vec![1, 2]);
        cell.begin().fail("Error al cargar pacientes".to_string());

        let (data, _, error) = cell.snapshot();
        assert_eq!(data, vec![1, 2]);
        assert_eq!(error.as_deref(), Some("Error al cargar pacientes"));

        let _next = cell.begin();
        assert!(cell.snapshot().2.is_none());
    }

    #[test]
    fn detached_cell_ignores_late_results() {
        let cell = HookCell::new(String::new());
        let ticket = cell.begin();
        cell.detach();
        ticket.succeed(|d| d.push_str("late"));

        assert_eq!(cell.snapshot().0, "");
        assert!(!cell.snapshot().1);
    }
}
