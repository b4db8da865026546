use super::types::{Infeasibility, InfeasibleReason};
use super::{Draft, Run};
use crate::model::ShiftType;
use chrono::{Duration, NaiveTime};
use tracing::debug;

/// Repos minimal entre la fin d'un créneau et le début du suivant.
///
/// Un créneau de semaine (hors horaire fixe) trop proche du suivant est avancé
/// à la plus tardive des heures de début autorisées qui rétablit le repos avec
/// ses deux voisins ; sinon l'écart est signalé.
pub(super) fn enforce_min_rest(run: &mut Run<'_>) {
    let min_rest = Duration::hours(i64::from(run.rules.rest.value.min_rest_hours));
    let required_hours = run.rules.rest.value.min_rest_hours;
    let rule = run.rules.rest.rule.clone();

    let mut options: Vec<NaiveTime> = run.rules.weekday.value.start_options.clone();
    options.push(run.rules.weekday.value.start);
    options.sort_unstable();
    options.dedup();

    for staff in 0..run.staff.len() {
        let own: Vec<usize> = (0..run.drafts.len())
            .filter(|&d| run.drafts[d].staff == staff)
            .collect();
        for (pos, pair) in own.windows(2).enumerate() {
            let (cur, next) = (pair[0], pair[1]);
            let gap = run.drafts[next].start_at() - run.drafts[cur].end_at();
            if gap >= min_rest {
                continue;
            }
            let prev = pos.checked_sub(1).map(|p| &run.drafts[own[p]]);
            let moved = if movable(run, &run.drafts[cur]) {
                earlier_start(&run.drafts[cur], prev, &run.drafts[next], &options, min_rest)
            } else {
                None
            };
            match moved {
                Some((start, end)) => {
                    let draft = &mut run.drafts[cur];
                    debug!(
                        employee = %run.staff[staff].name,
                        date = %draft.date,
                        from = %draft.start,
                        to = %start,
                        "shift moved to restore rest"
                    );
                    draft.start = start;
                    draft.end = end;
                }
                None => {
                    let (previous, next) = (run.drafts[cur].date, run.drafts[next].date);
                    run.issues.push(
                        Infeasibility::on(
                            previous,
                            rule.as_ref(),
                            InfeasibleReason::RestViolation {
                                previous,
                                next,
                                gap_minutes: gap.num_minutes(),
                                required_hours,
                            },
                        )
                        .for_employee(run.staff[staff]),
                    );
                }
            }
        }
    }
}

fn movable(run: &Run<'_>, draft: &Draft) -> bool {
    draft.shift_type == ShiftType::Weekday && !run.staff[draft.staff].has_fixed_schedule()
}

/// Plus tardive des heures de début antérieures à l'actuelle qui respecte le
/// repos avec le créneau précédent et le suivant.
fn earlier_start(
    draft: &Draft,
    prev: Option<&Draft>,
    next: &Draft,
    options: &[NaiveTime],
    min_rest: Duration,
) -> Option<(NaiveTime, NaiveTime)> {
    let duration = draft.end - draft.start;
    options
        .iter()
        .rev()
        .filter(|&&start| start < draft.start)
        .map(|&start| (start, start + duration))
        .find(|&(start, end)| {
            let after_prev = prev.map_or(true, |p| {
                super::util::at(draft.date, start) - p.end_at() >= min_rest
            });
            let before_next = next.start_at() - super::util::at(draft.date, end) >= min_rest;
            after_prev && before_next
        })
}
