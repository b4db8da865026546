use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::rules::Rule;

/// Identifiant fort pour Employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fonction dans le rayon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Leader,
    Stocker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "leader",
            Role::Stocker => "stocker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leader" | "lider" => Ok(Role::Leader),
            "stocker" | "repositor" => Ok(Role::Stocker),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Rotation des dimanches/fériés : N travaillés puis N de repos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SundayPattern {
    #[serde(rename = "1x1")]
    OneByOne,
    #[serde(rename = "2x2")]
    TwoByTwo,
    #[default]
    #[serde(rename = "0x0")]
    Never,
}

impl SundayPattern {
    /// Longueur d'un bloc (travail ou repos) ; 0 pour `0x0`.
    pub fn block_len(&self) -> u8 {
        match self {
            SundayPattern::OneByOne => 1,
            SundayPattern::TwoByTwo => 2,
            SundayPattern::Never => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SundayPattern::OneByOne => "1x1",
            SundayPattern::TwoByTwo => "2x2",
            SundayPattern::Never => "0x0",
        }
    }
}

impl std::str::FromStr for SundayPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1x1" => Ok(SundayPattern::OneByOne),
            "2x2" => Ok(SundayPattern::TwoByTwo),
            "0x0" | "" => Ok(SundayPattern::Never),
            other => Err(format!("unknown sunday pattern: {other}")),
        }
    }
}

/// Horaire fixe d'un collaborateur (jours de semaine uniquement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedHours {
    #[serde(with = "crate::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "crate::hhmm")]
    pub end: NaiveTime,
}

/// Collaborateur du rayon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_hours: Option<FixedHours>,
    #[serde(default)]
    pub works_sundays: bool,
    #[serde(default)]
    pub sunday_pattern: SundayPattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Employee {
    pub fn new<N: Into<String>>(name: N, role: Role) -> Self {
        Self {
            id: EmployeeId::random(),
            name: name.into(),
            role,
            active: true,
            fixed_hours: None,
            works_sundays: false,
            sunday_pattern: SundayPattern::Never,
            contact: None,
        }
    }

    pub fn with_fixed_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.fixed_hours = Some(FixedHours { start, end });
        self
    }

    pub fn with_sundays(mut self, pattern: SundayPattern) -> Self {
        self.works_sundays = pattern != SundayPattern::Never;
        self.sunday_pattern = pattern;
        self
    }

    pub fn has_fixed_schedule(&self) -> bool {
        self.fixed_hours.is_some()
    }

    /// Peut être planifié sur un dimanche ou un férié.
    pub fn eligible_for_sundays(&self) -> bool {
        self.role == Role::Stocker && self.works_sundays && self.sunday_pattern != SundayPattern::Never
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayScope {
    National,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Obligation {
    Mandatory,
    Optional,
}

/// Jour férié résolu pour une année.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub scope: HolidayScope,
    pub obligation: Obligation,
}

impl Holiday {
    pub fn new<N: Into<String>>(
        date: NaiveDate,
        name: N,
        scope: HolidayScope,
        obligation: Obligation,
    ) -> Self {
        Self {
            date,
            name: name.into(),
            scope,
            obligation,
        }
    }
}

/// Type de journée, entièrement déterminé par la date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Weekday,
    Sunday,
    Holiday,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Weekday => "weekday",
            ShiftType::Sunday => "sunday",
            ShiftType::Holiday => "holiday",
        }
    }

    pub fn is_reduced(&self) -> bool {
        !matches!(self, ShiftType::Weekday)
    }
}

/// Créneau généré pour un collaborateur sur une date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub date: NaiveDate,
    pub employee: EmployeeId,
    pub employee_name: String,
    pub role: Role,
    #[serde(with = "crate::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "crate::hhmm")]
    pub end: NaiveTime,
    pub shift_type: ShiftType,
    pub has_lunch: bool,
    #[serde(default, with = "crate::hhmm::option", skip_serializing_if = "Option::is_none")]
    pub lunch_start: Option<NaiveTime>,
    #[serde(default, with = "crate::hhmm::option", skip_serializing_if = "Option::is_none")]
    pub lunch_end: Option<NaiveTime>,
}

impl ShiftAssignment {
    /// Durée en minutes (pause déjeuner comprise).
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Roster complet : équipe + règles
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}
