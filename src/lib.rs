#![forbid(unsafe_code)]
//! Careplan — planification locale pour programmes d'accompagnement (sans BD).
//!
//! - Emplois du temps générés en round-robin à partir de templates d'activité.
//! - Allocation du personnel en first-fit, double réservations signalées.
//! - Stockage fichiers (JSON/CSV), journaux de progrès.
//! - Textes narratifs via un backend externe, avec cache et repli hors-ligne.

/// Événement `tracing::debug!`, compilé seulement avec la feature `logging`.
macro_rules! debug_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::debug!($($arg)*);
    }};
}
pub(crate) use debug_event;

pub mod clock;
pub mod io;
pub mod model;
pub mod narrative;
pub mod progress;
pub mod scheduler;
pub mod storage;

pub use clock::{ClockError, ClockTime};
pub use model::{
    ActivityTemplate, CarePlan, ChildId, ChildProfile, ProgressLog, RecordId,
    StaffAllocationRecord, StaffId, StaffProfile, TemplateId, TimetableEntry,
};
pub use narrative::{
    anonymize_logs, Narrative, NarrativeBackend, NarrativeCache, NarrativeKind, NarrativeRequest,
    NarrativeSource, Narrator, OfflineBackend,
};
pub use progress::{recent_logs, ProgressStats};
pub use scheduler::{
    allocate, detect_conflicts, generate_schedule, generate_schedule_with, ActivityTemplateInput,
    Allocation, Conflict, ConflictKind, GeneratedBlock, PlanError, ScheduleOptions,
    StaffIdentity, TimeBlock, TimeWindow,
};
pub use storage::{JsonStorage, Storage};
