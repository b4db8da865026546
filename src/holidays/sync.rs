use super::HolidayResolver;
use crate::model::Holiday;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

/// Support de persistance des fériés (remplacement annuel).
pub trait HolidayStore {
    /// Supprime les fériés de `year` ; renvoie le nombre supprimé.
    fn remove_year(&mut self, year: i32) -> Result<usize>;
    fn insert(&mut self, holiday: &Holiday) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// Bilan d'une synchronisation : insertions réussies + erreurs par enregistrement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub year: i32,
    pub removed: usize,
    pub inserted: usize,
    pub errors: Vec<String>,
}

/// Résout les fériés de `year` et remplace ceux du store.
///
/// Une insertion ratée est consignée dans le bilan sans interrompre le lot ;
/// seuls `remove_year` et `flush` sont fatals.
pub fn sync_holidays<S: HolidayStore + ?Sized>(
    resolver: &HolidayResolver,
    store: &mut S,
    year: i32,
) -> Result<SyncReport> {
    let holidays = resolver.resolve(year);
    let removed = store
        .remove_year(year)
        .with_context(|| format!("clearing holidays of {year}"))?;

    let mut report = SyncReport {
        year,
        removed,
        ..SyncReport::default()
    };
    for holiday in &holidays {
        match store.insert(holiday) {
            Ok(()) => report.inserted += 1,
            Err(err) => {
                warn!(holiday = %holiday.name, date = %holiday.date, error = %err, "holiday insert failed");
                report
                    .errors
                    .push(format!("failed to insert holiday {} ({}): {err:#}", holiday.name, holiday.date));
            }
        }
    }
    store.flush().context("persisting holidays")?;

    info!(year, inserted = report.inserted, errors = report.errors.len(), "holidays synchronised");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[derive(Default)]
    struct MemoryStore {
        rows: Vec<Holiday>,
        reject: Vec<&'static str>,
        flushed: bool,
    }

    impl HolidayStore for MemoryStore {
        fn remove_year(&mut self, year: i32) -> Result<usize> {
            use chrono::Datelike;
            let before = self.rows.len();
            self.rows.retain(|h| h.date.year() != year);
            Ok(before - self.rows.len())
        }
        fn insert(&mut self, holiday: &Holiday) -> Result<()> {
            if self.reject.contains(&holiday.name.as_str()) {
                bail!("constraint violation");
            }
            self.rows.push(holiday.clone());
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn per_record_errors_do_not_abort_batch() {
        let resolver = HolidayResolver::offline();
        let mut store = MemoryStore {
            reject: vec!["Natal"],
            ..MemoryStore::default()
        };
        let report = sync_holidays(&resolver, &mut store, 2025).unwrap();
        // 11 nationaux + 1 régional, dont Natal refusé
        assert_eq!(report.inserted, 11);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Natal"));
        assert!(store.flushed);
        assert_eq!(store.rows.len(), 11);
    }

    #[test]
    fn resync_replaces_previous_year() {
        let resolver = HolidayResolver::offline();
        let mut store = MemoryStore::default();
        sync_holidays(&resolver, &mut store, 2025).unwrap();
        let report = sync_holidays(&resolver, &mut store, 2025).unwrap();
        assert_eq!(report.removed, 12);
        assert_eq!(store.rows.len(), 12);
    }
}
