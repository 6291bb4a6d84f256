//! Moteur hors-ligne : génération d'emploi du temps et allocation du personnel.
//!
//! Fonctions pures, sans état partagé : chaque appel travaille sur son propre
//! jeu de données local, rendu à la fin de l'appel.

mod allocation;
mod conflicts;
mod timetable;
mod types;
mod util;

pub use types::{
    ActivityTemplateInput, Allocation, Conflict, ConflictKind, GeneratedBlock, PlanError,
    ScheduleOptions, StaffIdentity, TimeBlock, TimeWindow,
};

/// Remplit `window` avec les templates pris en round-robin, sans bloc partiel.
pub fn generate_schedule(
    window: TimeWindow,
    templates: &[ActivityTemplateInput],
) -> Vec<GeneratedBlock> {
    timetable::generate(window, templates, ScheduleOptions::default())
}

pub fn generate_schedule_with(
    window: TimeWindow,
    templates: &[ActivityTemplateInput],
    opts: ScheduleOptions,
) -> Vec<GeneratedBlock> {
    timetable::generate(window, templates, opts)
}

/// Assigne un membre par créneau (first-fit dans l'ordre de `staff`).
///
/// Les créneaux sont traités par (date, début) croissants, tri stable. Si personne
/// n'est libre, le créneau part sur `staff[0]` avec `conflict = true`. Sans
/// personnel, aucun créneau n'est assigné.
pub fn allocate(staff: &[StaffIdentity], blocks: &[TimeBlock]) -> Vec<Allocation> {
    allocation::allocate(staff, blocks)
}

/// Audit d'un ensemble d'allocations : chevauchements par membre et par jour,
/// plus les assignations forcées.
pub fn detect_conflicts(allocations: &[Allocation]) -> Vec<Conflict> {
    conflicts::detect_conflicts(allocations)
}
