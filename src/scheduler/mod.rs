//! Génération de l'escala mensuelle.
//!
//! Un run est un calcul pur : classement des jours, rotation dimanche/férié,
//! planification des repos hebdomadaires, effectifs par fonction, horaires,
//! repos minimal entre deux journées, puis placement des pauses déjeuner.
//! Toute contrainte non satisfaite fait échouer le run sans escala partielle.

mod days;
mod lunch;
mod rest;
mod rest_days;
mod rotation;
mod staffing;
mod types;
mod util;

pub use days::shift_type_for;
pub use types::{
    GenerateError, GenerationRequest, Infeasibility, InfeasibilityReport, InfeasibleReason,
    RotationCarry, Schedule, SundayRotation,
};

use crate::model::{Employee, Role, ShiftAssignment, ShiftType};
use crate::rules::RuleSet;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Créneau en cours de construction ; `staff` indexe `Run::staff`.
#[derive(Debug, Clone)]
struct Draft {
    date: NaiveDate,
    staff: usize,
    start: NaiveTime,
    end: NaiveTime,
    shift_type: ShiftType,
    has_lunch: bool,
    lunch: Option<(NaiveTime, NaiveTime)>,
}

impl Draft {
    fn start_at(&self) -> NaiveDateTime {
        util::at(self.date, self.start)
    }
    fn end_at(&self) -> NaiveDateTime {
        util::at(self.date, self.end)
    }
}

/// État d'un run : un enregistrement par collaborateur (même index que `staff`),
/// jeté en fin de génération.
struct Run<'a> {
    staff: Vec<&'a Employee>,
    days: Vec<days::Day>,
    rules: RuleSet,
    rotation: Vec<Option<SundayRotation>>,
    reduced_crew: BTreeMap<NaiveDate, Vec<usize>>,
    rest_plan: Vec<BTreeSet<NaiveDate>>,
    drafts: Vec<Draft>,
    issues: Vec<Infeasibility>,
}

/// Génère l'escala de `request.month`/`request.year`.
///
/// Déterministe : mêmes entrées, même sortie (triée par date puis par nom).
pub fn generate(request: &GenerationRequest<'_>) -> Result<Schedule, GenerateError> {
    let invalid = GenerateError::InvalidPeriod {
        month: request.month,
        year: request.year,
    };
    if request.year < 1583 {
        return Err(invalid);
    }
    let days = days::classify(request.year, request.month, request.holidays).ok_or(invalid)?;

    let mut staff: Vec<&Employee> = request.employees.iter().filter(|e| e.active).collect();
    if staff.is_empty() {
        return Err(GenerateError::NoEligibleWorkforce);
    }
    if !request.rules.iter().any(|r| r.active) {
        return Err(GenerateError::NoActiveRules);
    }
    let rules = RuleSet::from_rules(request.rules)?;
    staff.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    let sunday_quota = rules.sunday.value.quota(Role::Stocker);
    let rotation = rotation::seed(&staff, sunday_quota, request.carry_over);
    let mut run = Run {
        rest_plan: vec![BTreeSet::new(); staff.len()],
        staff,
        days,
        rules,
        rotation,
        reduced_crew: BTreeMap::new(),
        drafts: Vec::new(),
        issues: Vec::new(),
    };

    staffing::assign_reduced_days(&mut run);
    rest_days::plan(&mut run);
    staffing::assign_weekdays(&mut run);
    rest::enforce_min_rest(&mut run);
    lunch::place_lunches(&mut run);

    if !run.issues.is_empty() {
        let mut issues = run.issues;
        issues.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.employee_name.cmp(&b.employee_name))
        });
        warn!(
            month = request.month,
            year = request.year,
            issues = issues.len(),
            "schedule infeasible"
        );
        return Err(GenerateError::Infeasible(InfeasibilityReport { issues }));
    }

    let mut assignments: Vec<ShiftAssignment> = run
        .drafts
        .iter()
        .map(|d| {
            let employee = run.staff[d.staff];
            ShiftAssignment {
                date: d.date,
                employee: employee.id.clone(),
                employee_name: employee.name.clone(),
                role: employee.role,
                start: d.start,
                end: d.end,
                shift_type: d.shift_type,
                has_lunch: d.has_lunch,
                lunch_start: d.lunch.map(|(s, _)| s),
                lunch_end: d.lunch.map(|(_, e)| e),
            }
        })
        .collect();
    assignments.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.employee_name.cmp(&b.employee_name))
            .then_with(|| a.employee.cmp(&b.employee))
    });

    let rotation = run
        .staff
        .iter()
        .zip(&run.rotation)
        .filter_map(|(employee, state)| {
            state.map(|rotation| RotationCarry {
                employee: employee.id.clone(),
                rotation,
            })
        })
        .collect();

    info!(
        month = request.month,
        year = request.year,
        assignments = assignments.len(),
        "schedule generated"
    );
    Ok(Schedule {
        month: request.month,
        year: request.year,
        assignments,
        rotation,
    })
}
