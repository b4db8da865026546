use crate::model::{Employee, EmployeeId, Holiday, Role, ShiftAssignment};
use crate::rules::{Rule, RuleError, RuleId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Entrées d'un run de génération (instantané immuable).
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub month: u32,
    pub year: i32,
    pub employees: &'a [Employee],
    pub holidays: &'a [Holiday],
    pub rules: &'a [Rule],
    /// États de rotation du dimanche hérités du mois précédent.
    pub carry_over: &'a [RotationCarry],
}

impl<'a> GenerationRequest<'a> {
    pub fn new(
        month: u32,
        year: i32,
        employees: &'a [Employee],
        holidays: &'a [Holiday],
        rules: &'a [Rule],
    ) -> Self {
        Self {
            month,
            year,
            employees,
            holidays,
            rules,
            carry_over: &[],
        }
    }

    pub fn with_carry_over(mut self, carry_over: &'a [RotationCarry]) -> Self {
        self.carry_over = carry_over;
        self
    }
}

/// Compteur de rotation dimanche/férié d'un collaborateur.
///
/// `remaining` occurrences restent dans le bloc courant (travail ou repos),
/// chaque bloc durant `block` occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SundayRotation {
    pub block: u8,
    pub working: bool,
    pub remaining: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationCarry {
    pub employee: EmployeeId,
    pub rotation: SundayRotation,
}

/// Escala générée pour un mois.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub month: u32,
    pub year: i32,
    /// Triés par date puis par nom.
    pub assignments: Vec<ShiftAssignment>,
    /// États de rotation en fin de mois, à repasser au mois suivant.
    pub rotation: Vec<RotationCarry>,
}

impl Schedule {
    pub fn for_date(&self, date: NaiveDate) -> impl Iterator<Item = &ShiftAssignment> {
        self.assignments.iter().filter(move |a| a.date == date)
    }

    pub fn for_employee<'s>(
        &'s self,
        employee: &'s EmployeeId,
    ) -> impl Iterator<Item = &'s ShiftAssignment> {
        self.assignments.iter().filter(move |a| &a.employee == employee)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfeasibleReason {
    QuotaUnmet {
        role: Role,
        required: u32,
        available: u32,
    },
    RestViolation {
        previous: NaiveDate,
        next: NaiveDate,
        gap_minutes: i64,
        required_hours: u32,
    },
    ConsecutiveDays {
        limit: u32,
    },
    LunchCoverage {
        min_on_floor: u32,
    },
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfeasibleReason::QuotaUnmet {
                role,
                required,
                available,
            } => write!(
                f,
                "{role} quota unmet: required {required}, available {available}"
            ),
            InfeasibleReason::RestViolation {
                previous,
                next,
                gap_minutes,
                required_hours,
            } => write!(
                f,
                "rest between {previous} and {next} is {}h{:02}, below the {required_hours}h minimum",
                gap_minutes / 60,
                gap_minutes % 60
            ),
            InfeasibleReason::ConsecutiveDays { limit } => {
                write!(f, "more than {limit} consecutive working days")
            }
            InfeasibleReason::LunchCoverage { min_on_floor } => write!(
                f,
                "no lunch window keeps {min_on_floor} employee(s) on the floor"
            ),
        }
    }
}

/// Contrainte non satisfaite, localisée (date, collaborateur, règle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Infeasibility {
    pub date: Option<NaiveDate>,
    pub employee: Option<EmployeeId>,
    pub employee_name: Option<String>,
    pub rule: Option<RuleId>,
    pub reason: InfeasibleReason,
}

impl Infeasibility {
    pub(super) fn on(date: NaiveDate, rule: Option<&RuleId>, reason: InfeasibleReason) -> Self {
        Self {
            date: Some(date),
            employee: None,
            employee_name: None,
            rule: rule.cloned(),
            reason,
        }
    }

    pub(super) fn for_employee(mut self, employee: &Employee) -> Self {
        self.employee = Some(employee.id.clone());
        self.employee_name = Some(employee.name.clone());
        self
    }
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = self.date {
            write!(f, "{date}: ")?;
        }
        write!(f, "{}", self.reason)?;
        match (&self.employee_name, &self.employee) {
            (Some(name), _) => write!(f, " [employee {name}]")?,
            (None, Some(id)) => write!(f, " [employee {id}]")?,
            _ => {}
        }
        if let Some(rule) = &self.rule {
            write!(f, " [rule {}]", rule.as_str())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfeasibilityReport {
    pub issues: Vec<Infeasibility>,
}

impl InfeasibilityReport {
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.issues.iter().filter_map(|i| i.date).collect();
        dates.dedup();
        dates
    }
}

impl fmt::Display for InfeasibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schedule infeasible ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n- {issue}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("invalid period: month {month} of year {year}")]
    InvalidPeriod { month: u32, year: i32 },
    #[error("no eligible workforce: no active employee")]
    NoEligibleWorkforce,
    #[error("no active rules")]
    NoActiveRules,
    #[error("invalid rules: {0}")]
    InvalidRules(#[from] RuleError),
    #[error("{0}")]
    Infeasible(InfeasibilityReport),
}
