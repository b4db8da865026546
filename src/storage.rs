use crate::holidays::HolidayStore;
use crate::model::{Holiday, Roster};
use anyhow::{bail, Context};
use chrono::Datelike;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un roster depuis un support.
    fn load(&self) -> anyhow::Result<Roster>;
    /// Sauvegarde de manière atomique.
    fn save(&self, roster: &Roster) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Roster> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let roster: Roster =
            serde_json::from_slice(&data).with_context(|| "parsing roster.json")?;
        Ok(roster)
    }

    fn save(&self, roster: &Roster) -> anyhow::Result<()> {
        write_atomic(&self.path, &serde_json::to_vec_pretty(roster)?)
    }
}

/// Fériés persistés dans un fichier JSON, réécrit en entier à chaque `flush`.
pub struct JsonHolidayStore {
    path: PathBuf,
    holidays: Vec<Holiday>,
}

impl JsonHolidayStore {
    /// Ouvre le fichier s'il existe, sinon part d'une liste vide.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let holidays = if path.exists() {
            let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&data).with_context(|| "parsing holidays.json")?
        } else {
            Vec::new()
        };
        Ok(Self { path, holidays })
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn for_year(&self, year: i32) -> Vec<Holiday> {
        self.holidays
            .iter()
            .filter(|h| h.date.year() == year)
            .cloned()
            .collect()
    }
}

impl HolidayStore for JsonHolidayStore {
    fn remove_year(&mut self, year: i32) -> anyhow::Result<usize> {
        let before = self.holidays.len();
        self.holidays.retain(|h| h.date.year() != year);
        Ok(before - self.holidays.len())
    }

    fn insert(&mut self, holiday: &Holiday) -> anyhow::Result<()> {
        if self
            .holidays
            .iter()
            .any(|h| h.date == holiday.date && h.scope == holiday.scope)
        {
            bail!(
                "duplicate {:?} holiday on {}",
                holiday.scope,
                holiday.date
            );
        }
        self.holidays.push(holiday.clone());
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.holidays.sort_by_key(|h| (h.date, h.scope));
        write_atomic(&self.path, &serde_json::to_vec_pretty(&self.holidays)?)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))
        .with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}
