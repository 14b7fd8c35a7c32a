// ── Facility state aggregation ──
//
// Pure derivation of dashboard counts from the latest classroom and
// device snapshots. Recomputed wholesale on every fetch cycle; nothing
// here is cached or incrementally patched, which is what keeps the
// admin and staff dashboards from drifting apart.

use chrono::NaiveDateTime;

use aula_api::types::{Classroom, Device};

/// Derived counts for one render cycle. Ephemeral: recomputed from the
/// raw collections after every successful fetch, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacilitySummary {
    pub total_classrooms: usize,
    pub occupied: usize,
    pub powered_on: usize,
    pub total_devices: usize,
    pub connected_devices: usize,
}

/// Three-way connectivity classification used for visual grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceActivity {
    AllOnline,
    AllOffline,
    Partial,
}

impl FacilitySummary {
    pub fn device_activity(&self) -> DeviceActivity {
        if self.connected_devices == self.total_devices && self.total_devices > 0 {
            DeviceActivity::AllOnline
        } else if self.connected_devices == 0 {
            DeviceActivity::AllOffline
        } else {
            DeviceActivity::Partial
        }
    }
}

/// Derive the facility summary from the current snapshots.
///
/// Referentially pure: identical inputs always yield identical output.
/// A classroom without a status snapshot counts as neither occupied
/// nor powered on.
pub fn aggregate(classrooms: &[Classroom], devices: &[Device]) -> FacilitySummary {
    FacilitySummary {
        total_classrooms: classrooms.len(),
        occupied: classrooms
            .iter()
            .filter(|c| c.status.as_ref().is_some_and(|s| s.is_occupied))
            .count(),
        powered_on: classrooms
            .iter()
            .filter(|c| c.status.as_ref().is_some_and(|s| s.is_power_on))
            .count(),
        total_devices: devices.len(),
        connected_devices: devices.iter().filter(|d| d.is_connected).count(),
    }
}

/// Human-readable "time since last seen" label, bucketed with floor
/// division at the usual 60 s / 3600 s / 86400 s boundaries.
///
/// `None` renders as `"never"` -- a device that has never reported is
/// not the same as one seen zero seconds ago.
pub fn time_since(last_seen: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(seen) = last_seen else {
        return "never".into();
    };

    let secs = (now - seen).num_seconds().max(0);
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
