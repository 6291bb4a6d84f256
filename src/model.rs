use crate::clock::ClockTime;
use crate::scheduler::{
    ActivityTemplateInput, Allocation, GeneratedBlock, PlanError, StaffIdentity, TimeBlock,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifiant d'un enfant (attribué par le plan).
    ChildId
);
numeric_id!(
    /// Identifiant d'un membre du personnel.
    StaffId
);
numeric_id!(TemplateId);

/// Identifiant fort pour les enregistrements (entrées, allocations, journaux)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: ChildId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    pub id: StaffId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StaffProfile {
    pub fn identity(&self) -> StaffIdentity {
        StaffIdentity {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTemplate {
    pub id: TemplateId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_mins: u32,
    pub created_at: DateTime<Utc>,
}

impl ActivityTemplate {
    pub fn input(&self) -> ActivityTemplateInput {
        ActivityTemplateInput {
            id: self.id,
            title: self.title.clone(),
            duration_mins: self.duration_mins,
        }
    }
}

/// Entrée d'emploi du temps d'un enfant pour un jour donné
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: RecordId,
    pub child_id: ChildId,
    pub date: NaiveDate,
    pub activity: String,
    pub start: ClockTime,
    pub end: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
    pub created_at: DateTime<Utc>,
}

impl TimetableEntry {
    /// Crée une entrée en validant que `end > start`.
    pub fn new(
        child_id: ChildId,
        date: NaiveDate,
        activity: String,
        start: ClockTime,
        end: ClockTime,
    ) -> Result<Self, String> {
        if end <= start {
            return Err("entry end must be strictly after start".to_string());
        }
        Ok(Self {
            id: RecordId::random(),
            child_id,
            date,
            activity,
            start,
            end,
            staff_id: None,
            created_at: Utc::now(),
        })
    }

    pub fn from_block(child_id: ChildId, date: NaiveDate, block: &GeneratedBlock) -> Result<Self, String> {
        Self::new(child_id, date, block.activity.clone(), block.start, block.end)
    }

    pub fn block(&self) -> TimeBlock {
        TimeBlock {
            child_id: self.child_id,
            date: self.date,
            start: self.start,
            end: self.end,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes() - self.start.minutes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAllocationRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub allocation: Allocation,
    pub created_at: DateTime<Utc>,
}

impl StaffAllocationRecord {
    pub fn new(allocation: Allocation) -> Self {
        Self {
            id: RecordId::random(),
            allocation,
            created_at: Utc::now(),
        }
    }
}

/// Score d'engagement maximal d'un journal de progrès.
pub const MAX_ENGAGEMENT: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLog {
    pub id: RecordId,
    pub child_id: ChildId,
    pub date: NaiveDate,
    pub completed: bool,
    pub engagement: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProgressLog {
    pub fn new(
        child_id: ChildId,
        date: NaiveDate,
        completed: bool,
        engagement: u8,
        notes: Option<String>,
    ) -> Result<Self, String> {
        if engagement > MAX_ENGAGEMENT {
            return Err(format!("engagement must be within 0..={MAX_ENGAGEMENT}"));
        }
        Ok(Self {
            id: RecordId::random(),
            child_id,
            date,
            completed,
            engagement,
            notes: notes.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
        })
    }
}

/// Plan de prise en charge complet (ce que le stockage persiste)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CarePlan {
    #[serde(default)]
    pub children: Vec<ChildProfile>,
    #[serde(default)]
    pub staff: Vec<StaffProfile>,
    #[serde(default)]
    pub templates: Vec<ActivityTemplate>,
    #[serde(default)]
    pub timetable: Vec<TimetableEntry>,
    #[serde(default)]
    pub allocations: Vec<StaffAllocationRecord>,
    #[serde(default)]
    pub progress: Vec<ProgressLog>,
}

impl CarePlan {
    pub fn add_child<N: Into<String>>(
        &mut self,
        name: N,
        birth_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> ChildId {
        let id = ChildId(next_id(self.children.iter().map(|c| c.id.0)));
        self.children.push(ChildProfile {
            id,
            name: name.into(),
            birth_date,
            notes,
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_staff<N: Into<String>>(&mut self, name: N, role: Option<String>) -> StaffId {
        let id = StaffId(next_id(self.staff.iter().map(|s| s.id.0)));
        self.staff.push(StaffProfile {
            id,
            name: name.into(),
            role,
            created_at: Utc::now(),
        });
        id
    }

    /// Ajoute un template en validant `duration_mins > 0`.
    pub fn add_template<T: Into<String>>(
        &mut self,
        title: T,
        duration_mins: u32,
        description: Option<String>,
    ) -> Result<TemplateId, String> {
        if duration_mins == 0 {
            return Err("template duration must be > 0".to_string());
        }
        let id = TemplateId(next_id(self.templates.iter().map(|t| t.id.0)));
        self.templates.push(ActivityTemplate {
            id,
            title: title.into(),
            description,
            duration_mins,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    pub fn find_child(&self, id: ChildId) -> Option<&ChildProfile> {
        self.children.iter().find(|c| c.id == id)
    }
    pub fn find_staff(&self, id: StaffId) -> Option<&StaffProfile> {
        self.staff.iter().find(|s| s.id == id)
    }

    pub fn child(&self, id: ChildId) -> Result<&ChildProfile, PlanError> {
        self.find_child(id).ok_or(PlanError::UnknownChild(id))
    }

    pub fn staff_member(&self, id: StaffId) -> Result<&StaffProfile, PlanError> {
        self.find_staff(id).ok_or(PlanError::UnknownStaff(id))
    }

    /// Sous-ensemble du personnel, dans l'ordre donné (ordre du first-fit).
    pub fn staff_subset(&self, ids: &[StaffId]) -> Result<Vec<StaffIdentity>, PlanError> {
        ids.iter()
            .map(|&id| self.staff_member(id).map(StaffProfile::identity))
            .collect()
    }

    /// Templates dans leur ordre de création (ordre du round-robin).
    pub fn template_inputs(&self) -> Vec<ActivityTemplateInput> {
        let mut templates: Vec<&ActivityTemplate> = self.templates.iter().collect();
        templates.sort_by_key(|t| t.created_at);
        templates.into_iter().map(ActivityTemplate::input).collect()
    }

    pub fn staff_identities(&self) -> Vec<StaffIdentity> {
        let mut staff: Vec<&StaffProfile> = self.staff.iter().collect();
        staff.sort_by_key(|s| s.created_at);
        staff.into_iter().map(StaffProfile::identity).collect()
    }

    pub fn timetable_for(&self, date: NaiveDate) -> Vec<&TimetableEntry> {
        let mut entries: Vec<&TimetableEntry> =
            self.timetable.iter().filter(|e| e.date == date).collect();
        entries.sort_by_key(|e| (e.start, e.child_id));
        entries
    }

    /// Créneaux à couvrir pour une date, dans l'ordre de stockage.
    pub fn blocks_for(&self, date: NaiveDate) -> Vec<TimeBlock> {
        self.timetable
            .iter()
            .filter(|e| e.date == date)
            .map(TimetableEntry::block)
            .collect()
    }

    pub fn allocations_for(&self, date: NaiveDate) -> Vec<&StaffAllocationRecord> {
        self.allocations
            .iter()
            .filter(|r| r.allocation.date == date)
            .collect()
    }

    /// Remplace les allocations d'une date par celles fournies et reporte le
    /// membre assigné sur les entrées d'emploi du temps correspondantes.
    pub fn replace_allocations(&mut self, date: NaiveDate, allocations: Vec<Allocation>) {
        self.allocations.retain(|r| r.allocation.date != date);
        for entry in self.timetable.iter_mut().filter(|e| e.date == date) {
            entry.staff_id = allocations
                .iter()
                .find(|a| a.date == entry.date && a.child_id == entry.child_id && a.start == entry.start)
                .map(|a| a.staff_id);
        }
        self.allocations
            .extend(allocations.into_iter().map(StaffAllocationRecord::new));
    }

    pub fn progress_for(&self, child: ChildId) -> Vec<&ProgressLog> {
        let mut logs: Vec<&ProgressLog> =
            self.progress.iter().filter(|l| l.child_id == child).collect();
        logs.sort_by_key(|l| (l.date, l.created_at));
        logs
    }
}

fn next_id(existing: impl Iterator<Item = u32>) -> u32 {
    existing.max().map_or(1, |max| max + 1)
}
