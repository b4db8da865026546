//! Résolution des fériés d'une année.
//!
//! - Sources nationales classées, repli sur la suivante en cas d'échec ou de réponse vide.
//! - Source régionale indépendante, repli statique.
//! - Liste statique minimale si toutes les sources nationales échouent.
//! - Dédoublonnage par (date, portée) : la première insertion gagne.

pub mod fallback;
mod source;
mod sync;

pub use source::{HolidaySource, JsonFileSource, RawHoliday, SourceError};
pub use sync::{sync_holidays, HolidayStore, SyncReport};

use crate::calendar;
use crate::model::{Holiday, HolidayScope, Obligation};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Enchaîne les sources de fériés avec leurs replis.
pub struct HolidayResolver {
    national: Vec<Box<dyn HolidaySource>>,
    state: Option<Box<dyn HolidaySource>>,
    state_fallback: fn(i32) -> Vec<Holiday>,
}

impl Default for HolidayResolver {
    fn default() -> Self {
        Self::offline()
    }
}

impl HolidayResolver {
    /// `national` est classé : l'index 0 est interrogé en premier.
    pub fn new(
        national: Vec<Box<dyn HolidaySource>>,
        state: Option<Box<dyn HolidaySource>>,
    ) -> Self {
        Self {
            national,
            state,
            state_fallback: fallback::sao_paulo,
        }
    }

    /// Sans aucune source : uniquement les listes statiques.
    pub fn offline() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn with_state_fallback(mut self, fallback: fn(i32) -> Vec<Holiday>) -> Self {
        self.state_fallback = fallback;
        self
    }

    /// Fériés nationaux puis régionaux de `year`, dédoublonnés et triés par date.
    ///
    /// Ne renvoie jamais d'erreur : les échecs de source sont absorbés par les replis.
    pub fn resolve(&self, year: i32) -> Vec<Holiday> {
        let mut all = self.resolve_national(year);
        all.extend(self.resolve_state(year));
        let mut out = dedup(all);
        out.sort_by_key(|h| (h.date, h.scope));
        out
    }

    fn resolve_national(&self, year: i32) -> Vec<Holiday> {
        for src in &self.national {
            match src.fetch(year) {
                Ok(records) => {
                    let holidays = normalize_all(&records, year, HolidayScope::National);
                    if !holidays.is_empty() {
                        debug!(source = src.name(), year, count = holidays.len(), "national holidays fetched");
                        return holidays;
                    }
                    warn!(source = src.name(), year, "holiday source returned nothing, trying next");
                }
                Err(err) => {
                    warn!(source = src.name(), year, error = %err, "holiday source failed, trying next");
                }
            }
        }
        warn!(year, "every national holiday source failed, using static list");
        fallback::national(year)
    }

    fn resolve_state(&self, year: i32) -> Vec<Holiday> {
        let Some(src) = &self.state else {
            return (self.state_fallback)(year);
        };
        match src.fetch(year) {
            Ok(records) => normalize_all(&records, year, HolidayScope::State),
            Err(err) => {
                warn!(source = src.name(), year, error = %err, "state holiday source failed, using static list");
                (self.state_fallback)(year)
            }
        }
    }
}

fn normalize_all(records: &[RawHoliday], year: i32, scope: HolidayScope) -> Vec<Holiday> {
    records
        .iter()
        .filter_map(|raw| {
            let normalized = normalize(raw, year, scope);
            if normalized.is_none() {
                debug!(?raw, year, "dropping holiday record without usable date");
            }
            normalized
        })
        .collect()
}

/// Ramène un enregistrement brut à la forme canonique ; `None` si la date est inutilisable.
pub fn normalize(raw: &RawHoliday, year: i32, scope: HolidayScope) -> Option<Holiday> {
    let date_raw = raw
        .variable_dates
        .get(&year.to_string())
        .or(raw.date.as_ref())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())?;
    let date = parse_record_date(date_raw, year)?;
    if date.year() != year {
        return None;
    }

    let name = raw
        .name
        .as_deref()
        .or(raw.title.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| calendar::format_date(date));

    let obligation = match raw.kind.as_deref().map(|k| k.trim().to_ascii_lowercase()) {
        Some(k) if k == "facultativo" || k == "optional" => Obligation::Optional,
        _ => Obligation::Mandatory,
    };

    Some(Holiday::new(date, name, scope, obligation))
}

/// `YYYY-MM-DD`, date-heure ISO (partie date), ou `dd/mm` complété par `year`.
fn parse_record_date(raw: &str, year: i32) -> Option<NaiveDate> {
    if let Some(d) = calendar::parse_date(raw) {
        return Some(d);
    }
    if let Some(d) = raw.get(..10).and_then(calendar::parse_date) {
        return Some(d);
    }
    let (day, month) = raw.split_once('/')?;
    let month = month.split('/').next()?;
    NaiveDate::from_ymd_opt(year, month.trim().parse().ok()?, day.trim().parse().ok()?)
}

/// Garde le premier férié inséré pour chaque (date, portée).
pub fn dedup(holidays: Vec<Holiday>) -> Vec<Holiday> {
    let mut seen = HashSet::new();
    holidays
        .into_iter()
        .filter(|h| seen.insert((h.date, h.scope)))
        .collect()
}
