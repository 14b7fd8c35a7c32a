// ── Facility snapshot store ──
//
// Push-based storage for the latest fetched collections, distributed
// to views over `watch` channels. Every successful fetch replaces a
// collection wholesale and recomputes the derived summary from scratch;
// there is no incremental patching, so partial updates can never leave
// the counts out of sync with the rows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use aula_api::types::{Booking, Classroom, Device};

use crate::aggregate::{self, FacilitySummary};

/// Latest-known facility state plus the recomputed summary.
///
/// Transient fetch failures record an error message without touching
/// the data channels, so views degrade to a banner over last-known-good
/// data instead of a blank screen.
pub struct FacilityStore {
    classrooms: watch::Sender<Arc<Vec<Classroom>>>,
    devices: watch::Sender<Arc<Vec<Device>>>,
    bookings: watch::Sender<Arc<Vec<Booking>>>,
    summary: watch::Sender<FacilitySummary>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    last_error: watch::Sender<Option<String>>,
}

impl Default for FacilityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityStore {
    pub fn new() -> Self {
        let (classrooms, _) = watch::channel(Arc::new(Vec::new()));
        let (devices, _) = watch::channel(Arc::new(Vec::new()));
        let (bookings, _) = watch::channel(Arc::new(Vec::new()));
        let (summary, _) = watch::channel(FacilitySummary::default());
        let (last_refresh, _) = watch::channel(None);
        let (last_error, _) = watch::channel(None);

        Self {
            classrooms,
            devices,
            bookings,
            summary,
            last_refresh,
            last_error,
        }
    }

    // ── Snapshot application ─────────────────────────────────────────

    /// Replace the classroom collection and recompute the summary.
    pub fn apply_classrooms(&self, classrooms: Vec<Classroom>) {
        self.classrooms.send_replace(Arc::new(classrooms));
        self.recompute();
        self.mark_fresh();
    }

    /// Replace the device collection and recompute the summary.
    pub fn apply_devices(&self, devices: Vec<Device>) {
        self.devices.send_replace(Arc::new(devices));
        self.recompute();
        self.mark_fresh();
    }

    /// Replace classrooms and devices from one fetch cycle together.
    pub fn apply_facility(&self, classrooms: Vec<Classroom>, devices: Vec<Device>) {
        self.classrooms.send_replace(Arc::new(classrooms));
        self.devices.send_replace(Arc::new(devices));
        self.recompute();
        self.mark_fresh();
    }

    /// Replace the booking collection. Bookings do not feed the
    /// summary, so nothing is recomputed.
    pub fn apply_bookings(&self, bookings: Vec<Booking>) {
        self.bookings.send_replace(Arc::new(bookings));
        self.mark_fresh();
    }

    /// Record a transient fetch failure. Data channels are untouched.
    pub fn record_error(&self, message: String) {
        self.last_error.send_replace(Some(message));
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn classrooms(&self) -> Arc<Vec<Classroom>> {
        self.classrooms.borrow().clone()
    }

    pub fn devices(&self) -> Arc<Vec<Device>> {
        self.devices.borrow().clone()
    }

    pub fn bookings(&self) -> Arc<Vec<Booking>> {
        self.bookings.borrow().clone()
    }

    pub fn summary(&self) -> FacilitySummary {
        *self.summary.borrow()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_classrooms(&self) -> watch::Receiver<Arc<Vec<Classroom>>> {
        self.classrooms.subscribe()
    }

    pub fn subscribe_devices(&self) -> watch::Receiver<Arc<Vec<Device>>> {
        self.devices.subscribe()
    }

    pub fn subscribe_bookings(&self) -> watch::Receiver<Arc<Vec<Booking>>> {
        self.bookings.subscribe()
    }

    pub fn subscribe_summary(&self) -> watch::Receiver<FacilitySummary> {
        self.summary.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Full recomputation from the raw collections, never a delta.
    fn recompute(&self) {
        let summary = aggregate::aggregate(&self.classrooms.borrow(), &self.devices.borrow());
        self.summary.send_replace(summary);
    }

    fn mark_fresh(&self) {
        self.last_refresh.send_replace(Some(Utc::now()));
        self.last_error.send_replace(None);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aula_api::types::RoomStatus;

    fn classroom(id: i64, occupied: bool) -> Classroom {
        Classroom {
            id,
            name: format!("Room {id}"),
            location: None,
            capacity: None,
            is_active: true,
            esp_device_id: None,
            status: Some(RoomStatus {
                is_occupied: occupied,
                ..RoomStatus::default()
            }),
        }
    }

    #[test]
    fn apply_replaces_wholesale_and_recomputes() {
        let store = FacilityStore::new();

        store.apply_classrooms(vec![classroom(1, true), classroom(2, false)]);
        assert_eq!(store.summary().total_classrooms, 2);
        assert_eq!(store.summary().occupied, 1);

        // A later cycle with one room must fully replace, not merge.
        store.apply_classrooms(vec![classroom(3, false)]);
        assert_eq!(store.classrooms().len(), 1);
        assert_eq!(store.summary().total_classrooms, 1);
        assert_eq!(store.summary().occupied, 0);
    }

    #[test]
    fn error_preserves_last_known_good_data() {
        let store = FacilityStore::new();
        store.apply_classrooms(vec![classroom(1, true)]);

        store.record_error("backend unreachable".into());
        assert_eq!(store.last_error().as_deref(), Some("backend unreachable"));
        assert_eq!(store.classrooms().len(), 1, "data survives a transient failure");
        assert_eq!(store.summary().occupied, 1);
    }

    #[test]
    fn successful_apply_clears_error_banner() {
        let store = FacilityStore::new();
        store.record_error("timeout".into());

        store.apply_classrooms(vec![classroom(1, false)]);
        assert!(store.last_error().is_none());
        assert!(store.last_refresh().is_some());
    }

    #[tokio::test]
    async fn subscribers_observe_new_snapshots() {
        let store = FacilityStore::new();
        let mut rx = store.subscribe_summary();

        store.apply_classrooms(vec![classroom(1, true)]);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().occupied, 1);
    }
}
