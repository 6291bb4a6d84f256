use crate::clock::ClockTime;
use crate::model::{ChildId, StaffId, TemplateId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fenêtre horaire [start, end] dans laquelle on génère un emploi du temps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeWindow {
    /// Crée une fenêtre en validant que `start <= end`.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, PlanError> {
        if end < start {
            return Err(PlanError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn length_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

/// Vue minimale d'un template d'activité consommée par le générateur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTemplateInput {
    pub id: TemplateId,
    pub title: String,
    pub duration_mins: u32,
}

impl ActivityTemplateInput {
    pub fn new<T: Into<String>>(
        id: TemplateId,
        title: T,
        duration_mins: u32,
    ) -> Result<Self, PlanError> {
        if duration_mins == 0 {
            return Err(PlanError::InvalidDuration(duration_mins));
        }
        Ok(Self {
            id,
            title: title.into(),
            duration_mins,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedBlock {
    pub start: ClockTime,
    pub end: ClockTime,
    pub activity: String,
}

impl GeneratedBlock {
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes() - self.start.minutes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffIdentity {
    pub id: StaffId,
    pub name: String,
}

/// Créneau d'un enfant à couvrir par un membre du personnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub child_id: ChildId,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub child_id: ChildId,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Assignation forcée sur un membre déjà pris sur ce créneau.
    #[serde(default)]
    pub conflict: bool,
}

/// Options de génération
#[derive(Debug, Clone, Copy)]
pub struct ScheduleOptions {
    /// Plafond de blocs acceptés ; au-delà la sortie est tronquée sans erreur.
    pub max_blocks: usize,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self { max_blocks: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Deux allocations du même membre se chevauchent le même jour.
    Overlap,
    /// Allocation marquée `conflict` par l'allocateur.
    Forced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub staff: StaffId,
    pub date: NaiveDate,
    pub child_a: ChildId,
    pub child_b: Option<ChildId>,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid time window: {start} is after {end}")]
    InvalidWindow { start: ClockTime, end: ClockTime },
    #[error("invalid activity duration: {0} minutes (must be > 0)")]
    InvalidDuration(u32),
    #[error("unknown child: {0}")]
    UnknownChild(ChildId),
    #[error("unknown staff member: {0}")]
    UnknownStaff(StaffId),
}
