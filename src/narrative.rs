//! Textes narratifs (résumés, justification d'emploi du temps, conseils).
//!
//! La génération elle-même est déléguée à un [`NarrativeBackend`] ; la crate ne
//! fait aucun appel réseau. Chaque requête se résout en texte frais, en texte
//! mis en cache, ou en texte de repli statique : la narration n'échoue jamais.

use crate::model::{ChildProfile, ProgressLog};
use crate::scheduler::{GeneratedBlock, StaffIdentity, TimeBlock};
use crate::storage::write_atomic;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Longueur maximale du contexte repris dans une clé de cache.
const CONTEXT_KEY_CHARS: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeKind {
    DailySummary,
    MicroCoach,
    TimetableRationale,
    WeeklyInsights,
}

impl NarrativeKind {
    pub fn fallback_text(self) -> &'static str {
        match self {
            Self::DailySummary => {
                "Today we focused on routine and engagement. We will build on strengths tomorrow."
            }
            Self::MicroCoach => "Give one clear instruction and praise specific effort.",
            Self::TimetableRationale => {
                "We alternated focus and movement, kept routines predictable, and aligned with known peak times."
            }
            Self::WeeklyInsights => {
                "Observations: steady engagement. Next steps: maintain routines, add short movement breaks."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    pub kind: NarrativeKind,
    pub cache_key: String,
    pub payload: Value,
}

/// Résumé du jour pour les familles.
pub fn summary_request(
    child: &ChildProfile,
    date: NaiveDate,
    logs: &[&ProgressLog],
) -> NarrativeRequest {
    NarrativeRequest {
        kind: NarrativeKind::DailySummary,
        cache_key: format!("summarize:{}:{}", child.id, date),
        payload: json!({
            "childProfile": child,
            "daySummary": { "date": date, "entries": logs },
        }),
    }
}

pub fn microcoach_request(context: Value) -> NarrativeRequest {
    let prefix: String = context.to_string().chars().take(CONTEXT_KEY_CHARS).collect();
    NarrativeRequest {
        kind: NarrativeKind::MicroCoach,
        cache_key: format!("microcoach:{prefix}"),
        payload: json!({ "context": context }),
    }
}

/// Contexte de conseil après une séance : date et dernier journal de progrès.
pub fn session_context(date: NaiveDate, last_log: Option<&ProgressLog>) -> Value {
    json!({ "date": date, "lastLog": last_log })
}

/// Contexte « pourquoi cette répartition » : personnel et créneaux d'une date.
pub fn mapping_context(date: NaiveDate, staff: &[StaffIdentity], blocks: &[TimeBlock]) -> Value {
    json!({ "date": date, "staff": staff, "blocks": blocks })
}

pub fn rationale_request(
    child: &ChildProfile,
    date: NaiveDate,
    blocks: &[GeneratedBlock],
) -> NarrativeRequest {
    let entries: Vec<Value> = blocks
        .iter()
        .map(|b| json!({ "date": date, "start": b.start, "end": b.end, "activity": b.activity }))
        .collect();
    NarrativeRequest {
        kind: NarrativeKind::TimetableRationale,
        cache_key: format!("rationale:{}:{}", child.id, entries.len()),
        payload: json!({ "childProfile": child, "entries": entries }),
    }
}

pub fn weekly_request(logs: &[&ProgressLog], audience: &str) -> NarrativeRequest {
    NarrativeRequest {
        kind: NarrativeKind::WeeklyInsights,
        cache_key: format!("weekly:{audience}:{}", logs.len()),
        payload: json!({ "logs": logs, "audience": audience }),
    }
}

/// Point d'extension vers un service de génération de texte.
pub trait NarrativeBackend {
    fn generate(&self, request: &NarrativeRequest) -> Result<String>;
}

/// Backend par défaut : aucun service configuré, toujours en échec.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

impl NarrativeBackend for OfflineBackend {
    fn generate(&self, _request: &NarrativeRequest) -> Result<String> {
        bail!("no narrative backend configured")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeSource {
    Fresh,
    Cached { stored_at: DateTime<Utc> },
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    pub kind: NarrativeKind,
    pub text: String,
    pub source: NarrativeSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedText {
    pub stored_at: DateTime<Utc>,
    pub text: String,
}

/// Cache clé → dernier texte obtenu, dans un fichier JSON.
#[derive(Debug, Clone)]
pub struct NarrativeCache {
    path: PathBuf,
}

impl NarrativeCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Cache rangé sous `dir/narratives.json`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("creating cache directory {}", dir.display()))?;
        Ok(Self::new(dir.join("narratives.json")))
    }

    fn read_all(&self) -> Result<BTreeMap<String, CachedText>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", self.path.display()))
    }

    pub fn get(&self, key: &str) -> Result<Option<CachedText>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Un fichier illisible est remplacé : la réécriture repart d'un cache vide.
    pub fn put(&self, key: &str, text: &str, now: DateTime<Utc>) -> Result<()> {
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(_) => {
                crate::debug_event!(path = %self.path.display(), "discarding unreadable narrative cache");
                BTreeMap::new()
            }
        };
        all.insert(key.to_string(), CachedText { stored_at: now, text: text.to_string() });
        write_atomic(&self.path, &serde_json::to_vec_pretty(&all)?)
    }
}

pub struct Narrator<B> {
    backend: B,
    cache: Option<NarrativeCache>,
}

impl<B: NarrativeBackend> Narrator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, cache: None }
    }

    pub fn with_cache(mut self, cache: NarrativeCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Texte frais si le backend répond, sinon dernier texte en cache, sinon repli.
    pub fn narrate(&self, request: &NarrativeRequest, now: DateTime<Utc>) -> Narrative {
        let reason = match self.backend.generate(request) {
            Ok(text) => {
                let stored = self
                    .cache
                    .as_ref()
                    .map_or(true, |cache| cache.put(&request.cache_key, &text, now).is_ok());
                if !stored {
                    crate::debug_event!(key = %request.cache_key, "narrative cache write failed");
                }
                return Narrative { kind: request.kind, text, source: NarrativeSource::Fresh };
            }
            Err(err) => err.to_string(),
        };

        crate::debug_event!(kind = ?request.kind, %reason, "narrative backend unavailable");
        let cached = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(&request.cache_key).ok().flatten());
        match cached {
            Some(hit) => Narrative {
                kind: request.kind,
                text: hit.text,
                source: NarrativeSource::Cached { stored_at: hit.stored_at },
            },
            None => Narrative {
                kind: request.kind,
                text: request.kind.fallback_text().to_string(),
                source: NarrativeSource::Fallback { reason },
            },
        }
    }
}

/// Journal de progrès sans donnée identifiante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymizedLog {
    pub child_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub engagement: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Anonymisation locale : enfant remplacé par `anon`, notes présentes masquées.
pub fn anonymize_logs(logs: &[&ProgressLog]) -> Vec<AnonymizedLog> {
    logs.iter()
        .map(|l| AnonymizedLog {
            child_id: "anon".to_string(),
            date: l.date,
            completed: l.completed,
            engagement: l.engagement,
            notes: l.notes.as_ref().map(|_| "[redacted]".to_string()),
        })
        .collect()
}
