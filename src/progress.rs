use crate::model::{CarePlan, ChildId, ProgressLog};
use serde::Serialize;

/// Nombre de journaux récents transmis aux synthèses hebdomadaires.
pub const WEEKLY_LOG_WINDOW: usize = 20;

/// Agrégats sur une série de journaux de progrès.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStats {
    pub logs: usize,
    pub completed: usize,
    /// Dans [0, 1] ; `None` sans journal.
    pub completion_rate: Option<f64>,
    pub mean_engagement: Option<f64>,
}

impl ProgressStats {
    pub fn from_logs<'a, I>(logs: I) -> Self
    where
        I: IntoIterator<Item = &'a ProgressLog>,
    {
        let (mut total, mut completed, mut engagement) = (0usize, 0usize, 0u32);
        for log in logs {
            total += 1;
            completed += usize::from(log.completed);
            engagement += u32::from(log.engagement);
        }
        if total == 0 {
            return Self { logs: 0, completed: 0, completion_rate: None, mean_engagement: None };
        }
        Self {
            logs: total,
            completed,
            completion_rate: Some(completed as f64 / total as f64),
            mean_engagement: Some(f64::from(engagement) / total as f64),
        }
    }
}

/// Les `limit` derniers journaux d'un enfant, par (date, création) croissantes.
pub fn recent_logs(plan: &CarePlan, child: ChildId, limit: usize) -> Vec<&ProgressLog> {
    let logs = plan.progress_for(child);
    let skip = logs.len().saturating_sub(limit);
    logs.into_iter().skip(skip).collect()
}
