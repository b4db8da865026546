use super::types::{Infeasibility, InfeasibleReason};
use super::util::contains;
use super::{Draft, Run};
use crate::model::ShiftType;
use chrono::{Duration, NaiveTime};

/// Place les pauses déjeuner des créneaux de semaine, jour par jour.
///
/// Chaque collaborateur (ordre du run) essaie les fenêtres en tourniquet à
/// partir de son rang et garde celle qui minimise l'absence simultanée ;
/// une fenêtre qui ferait tomber le rayon sous `min_on_floor` est exclue.
pub(super) fn place_lunches(run: &mut Run<'_>) {
    let policy = run.rules.lunch.value.clone();
    let rule = run.rules.lunch.rule.clone();
    if policy.windows.is_empty() {
        return;
    }
    let duration = Duration::minutes(i64::from(policy.duration_minutes));
    let dates: Vec<_> = run
        .days
        .iter()
        .filter(|d| d.kind == ShiftType::Weekday)
        .map(|d| d.date)
        .collect();

    for date in dates {
        let on_date: Vec<usize> = (0..run.drafts.len())
            .filter(|&d| run.drafts[d].date == date)
            .collect();
        let mut eligible: Vec<usize> = on_date
            .iter()
            .copied()
            .filter(|&d| run.drafts[d].has_lunch)
            .collect();
        eligible.sort_by_key(|&d| run.drafts[d].staff);

        for (turn, &d) in eligible.iter().enumerate() {
            let draft = &run.drafts[d];
            let best = (0..policy.windows.len())
                .map(|j| policy.windows[(turn + j) % policy.windows.len()])
                .map(|w| (w.start, w.start + duration))
                .filter(|&(s, e)| s >= draft.start && e <= draft.end)
                .filter_map(|lunch| {
                    peak_absence(&run.drafts, &on_date, d, lunch, policy.min_on_floor)
                        .map(|peak| (peak, lunch))
                })
                .min_by_key(|&(peak, _)| peak)
                .map(|(_, lunch)| lunch);

            match best {
                Some(lunch) => run.drafts[d].lunch = Some(lunch),
                None => {
                    let staff = run.drafts[d].staff;
                    run.issues.push(
                        Infeasibility::on(
                            date,
                            rule.as_ref(),
                            InfeasibleReason::LunchCoverage {
                                min_on_floor: policy.min_on_floor,
                            },
                        )
                        .for_employee(run.staff[staff]),
                    );
                }
            }
        }
    }
}

/// Nombre maximal de personnes en pause pendant `lunch` si `candidate` la
/// prend ; `None` si l'effectif en rayon passe sous `min_on_floor`.
fn peak_absence(
    drafts: &[Draft],
    on_date: &[usize],
    candidate: usize,
    (start, end): (NaiveTime, NaiveTime),
    min_on_floor: u32,
) -> Option<u32> {
    let mut checkpoints = vec![start];
    for &d in on_date {
        let other = &drafts[d];
        let mut bounds = vec![other.start, other.end];
        if let Some((s, e)) = other.lunch {
            bounds.extend([s, e]);
        }
        checkpoints.extend(bounds.into_iter().filter(|&t| start < t && t < end));
    }

    let mut peak = 0;
    for t in checkpoints {
        let mut working = 0u32;
        let mut out = 0u32;
        for &d in on_date {
            let other = &drafts[d];
            if !contains(other.start, other.end, t) {
                continue;
            }
            let at_lunch = if d == candidate {
                contains(start, end, t)
            } else {
                other.lunch.is_some_and(|(s, e)| contains(s, e, t))
            };
            if at_lunch {
                out += 1;
            } else {
                working += 1;
            }
        }
        if working < min_on_floor {
            return None;
        }
        peak = peak.max(out);
    }
    Some(peak)
}
