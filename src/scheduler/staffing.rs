use super::days::Day;
use super::types::{Infeasibility, InfeasibleReason};
use super::{Draft, Run};
use crate::model::ShiftType;
use tracing::debug;

/// Dimanches et fériés : tout collaborateur en bloc « travail » est planifié ;
/// le quota par fonction est un plancher.
pub(super) fn assign_reduced_days(run: &mut Run<'_>) {
    let rule = run.rules.sunday.rule.clone();
    for day in run.days.iter().filter(|d| d.kind.is_reduced()) {
        let crew: Vec<usize> = (0..run.staff.len())
            .filter(|&i| run.rotation[i].is_some_and(|r| r.is_working()))
            .collect();
        for state in run.rotation.iter_mut().flatten() {
            state.advance();
        }

        for (&role, &quota) in &run.rules.sunday.value.headcount {
            let available = crew.iter().filter(|&&i| run.staff[i].role == role).count() as u32;
            if available < quota {
                run.issues.push(Infeasibility::on(
                    day.date,
                    rule.as_ref(),
                    InfeasibleReason::QuotaUnmet {
                        role,
                        required: quota,
                        available,
                    },
                ));
            }
        }
        debug!(date = %day.date, crew = crew.len(), "sunday/holiday crew");
        run.reduced_crew.insert(day.date, crew);
    }
}

/// Passe chronologique : équipes du dimanche déjà fixées, quotas de semaine
/// remplis au plus juste, plafond de jours consécutifs appliqué jour par jour.
pub(super) fn assign_weekdays(run: &mut Run<'_>) {
    let n = run.staff.len();
    let max_streak = run.rules.rest.value.max_consecutive_days;
    let rest_rule = run.rules.rest.rule.clone();
    let weekday_rule = run.rules.weekday.rule.clone();
    let mut streak = vec![0u32; n];
    let mut worked = vec![0u32; n];

    for idx in 0..run.days.len() {
        let day = run.days[idx];
        let crew = if day.kind.is_reduced() {
            let crew = run.reduced_crew.get(&day.date).cloned().unwrap_or_default();
            for &i in &crew {
                if streak[i] >= max_streak {
                    run.issues.push(
                        Infeasibility::on(
                            day.date,
                            rest_rule.as_ref(),
                            InfeasibleReason::ConsecutiveDays { limit: max_streak },
                        )
                        .for_employee(run.staff[i]),
                    );
                }
            }
            crew
        } else {
            let mut crew = Vec::new();
            for (&role, &quota) in &run.rules.weekday.value.headcount {
                if quota == 0 {
                    continue;
                }
                let mut pool: Vec<usize> = (0..n)
                    .filter(|&i| run.staff[i].role == role)
                    .filter(|&i| !run.rest_plan[i].contains(&day.date))
                    .filter(|&i| streak[i] < max_streak)
                    .collect();
                pool.sort_by_key(|&i| (streak[i], worked[i], i));
                if pool.len() < quota as usize {
                    run.issues.push(Infeasibility::on(
                        day.date,
                        weekday_rule.as_ref(),
                        InfeasibleReason::QuotaUnmet {
                            role,
                            required: quota,
                            available: pool.len() as u32,
                        },
                    ));
                }
                pool.truncate(quota as usize);
                crew.extend(pool);
            }
            for &i in &crew {
                worked[i] += 1;
            }
            crew.sort_unstable();
            crew
        };

        for (i, s) in streak.iter_mut().enumerate() {
            *s = if crew.contains(&i) { *s + 1 } else { 0 };
        }
        for i in crew {
            let draft = draft_for(run, day, i);
            run.drafts.push(draft);
        }
    }
}

/// Horaires d'un créneau : fenêtre réduite le dimanche/férié (sans déjeuner),
/// horaire fixe en semaine s'il existe, sinon fenêtre de semaine de la règle.
fn draft_for(run: &Run<'_>, day: Day, staff: usize) -> Draft {
    let employee = run.staff[staff];
    let (start, end, has_lunch) = match (day.kind, employee.fixed_hours) {
        (ShiftType::Weekday, Some(fixed)) => (fixed.start, fixed.end, false),
        (ShiftType::Weekday, None) => {
            let rule = &run.rules.weekday.value;
            (rule.start, rule.end, rule.has_lunch)
        }
        (_, _) => {
            let rule = &run.rules.sunday.value;
            (rule.start, rule.end, false)
        }
    };
    Draft {
        date: day.date,
        staff,
        start,
        end,
        shift_type: day.kind,
        has_lunch,
        lunch: None,
    }
}
