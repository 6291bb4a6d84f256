use crate::model::CarePlan;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un plan depuis un support.
    fn load(&self) -> anyhow::Result<CarePlan>;
    /// Sauvegarde de manière atomique.
    fn save(&self, plan: &CarePlan) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Charge le plan, ou un plan vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<CarePlan> {
        if !self.path.exists() {
            return Ok(CarePlan::default());
        }
        self.load()
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<CarePlan> {
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let plan: CarePlan = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        crate::debug_event!(
            children = plan.children.len(),
            staff = plan.staff.len(),
            entries = plan.timetable.len(),
            "care plan loaded"
        );
        Ok(plan)
    }

    fn save(&self, plan: &CarePlan) -> anyhow::Result<()> {
        write_atomic(&self.path, &serde_json::to_vec_pretty(plan)?)
    }
}

/// Écrit via un fichier temporaire voisin puis rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}
