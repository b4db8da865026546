use super::days;
use super::Run;
use crate::model::{Role, ShiftType};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Folgas hebdomadaires des repositores.
///
/// Par semaine (lundi–dimanche, tronquée au mois) : `max(days_off_per_week,
/// ⌈7 / (max_consecutive + 1)⌉)` jours de repos au prorata, moins les
/// dimanches/fériés non travaillés. Un jour n'est retenu que s'il laisse
/// assez de repositores pour le quota de semaine.
pub(super) fn plan(run: &mut Run<'_>) {
    let policy = &run.rules.day_off.value;
    let max_streak = run.rules.rest.value.max_consecutive_days;
    let per_week = policy
        .days_off_per_week
        .max(7u32.div_ceil(max_streak.saturating_add(1)));
    let quota = run.rules.weekday.value.quota(Role::Stocker) as usize;

    let stockers: Vec<usize> = (0..run.staff.len())
        .filter(|&i| run.staff[i].role == Role::Stocker)
        .collect();

    for week in days::weeks(&run.days) {
        let prorated = (per_week as usize * week.len() + 3) / 7;
        for &i in &stockers {
            let crew_off = week
                .iter()
                .filter(|d| d.kind.is_reduced())
                .filter(|d| {
                    !run.reduced_crew
                        .get(&d.date)
                        .is_some_and(|crew| crew.contains(&i))
                })
                .count();
            let needed = prorated.saturating_sub(crew_off);

            for _ in 0..needed {
                let resting = |date: NaiveDate| {
                    stockers
                        .iter()
                        .filter(|&&s| run.rest_plan[s].contains(&date))
                        .count()
                };
                let choice = week
                    .iter()
                    .filter(|d| d.kind == ShiftType::Weekday)
                    .filter(|d| !run.rest_plan[i].contains(&d.date))
                    .filter(|d| stockers.len() - resting(d.date) > quota)
                    .min_by_key(|d| {
                        let rank = policy
                            .preferred_weekdays
                            .iter()
                            .position(|w| *w == d.date.weekday());
                        (rank.is_none(), resting(d.date), rank, d.date)
                    })
                    .map(|d| d.date);
                match choice {
                    Some(date) => {
                        run.rest_plan[i].insert(date);
                    }
                    None => {
                        debug!(
                            employee = %run.staff[i].name,
                            week = %week[0].date,
                            "no weekday left for a day off"
                        );
                        break;
                    }
                }
            }
        }
    }
}
