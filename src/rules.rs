use crate::model::Role;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Identifiant fort pour Rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
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

/// Règle d'escala nommée, fournie entière pour un run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub kind: RuleKind,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    WeekdayShift(ShiftRule),
    SundayHolidayShift(ShiftRule),
    Lunch(LunchPolicy),
    Rest(RestPolicy),
    DayOff(DayOffPolicy),
}

impl RuleKind {
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::WeekdayShift(_) => "weekday_shift",
            RuleKind::SundayHolidayShift(_) => "sunday_holiday_shift",
            RuleKind::Lunch(_) => "lunch",
            RuleKind::Rest(_) => "rest",
            RuleKind::DayOff(_) => "day_off",
        }
    }
}

/// Fenêtre horaire d'un type de journée et effectif minimal par fonction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRule {
    #[serde(with = "crate::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "crate::hhmm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub has_lunch: bool,
    #[serde(default)]
    pub headcount: BTreeMap<Role, u32>,
    /// Autres heures de début possibles (même durée), utilisées pour
    /// rétablir le repos minimal entre deux journées.
    #[serde(default, with = "crate::hhmm::vec", skip_serializing_if = "Vec::is_empty")]
    pub start_options: Vec<NaiveTime>,
}

impl ShiftRule {
    pub fn quota(&self, role: Role) -> u32 {
        self.headcount.get(&role).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchWindow {
    #[serde(with = "crate::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "crate::hhmm")]
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchPolicy {
    pub duration_minutes: u32,
    /// Effectif minimal restant en rayon pendant les pauses.
    pub min_on_floor: u32,
    pub windows: Vec<LunchWindow>,
}

impl Default for LunchPolicy {
    fn default() -> Self {
        let w = |s: u32, e: u32| LunchWindow {
            start: NaiveTime::from_hms_opt(s, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(e, 0, 0).unwrap_or_default(),
        };
        Self {
            duration_minutes: 120,
            min_on_floor: 2,
            windows: vec![w(11, 13), w(12, 14), w(13, 15)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestPolicy {
    pub min_rest_hours: u32,
    pub max_consecutive_days: u32,
}

impl Default for RestPolicy {
    fn default() -> Self {
        Self {
            min_rest_hours: 11,
            max_consecutive_days: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOffPolicy {
    #[serde(default)]
    pub preferred_weekdays: Vec<Weekday>,
    #[serde(default = "default_days_off")]
    pub days_off_per_week: u32,
}

fn default_days_off() -> u32 {
    1
}

impl Default for DayOffPolicy {
    fn default() -> Self {
        Self {
            preferred_weekdays: vec![Weekday::Tue, Weekday::Thu],
            days_off_per_week: 1,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule {0} has an empty name")]
    EmptyName(String),
    #[error("rule {rule}: end {end} must be after start {start}")]
    InvalidWindow {
        rule: String,
        start: NaiveTime,
        end: NaiveTime,
    },
    #[error("rule {0}: leaders are never scheduled on sundays or holidays")]
    LeaderOnSundays(String),
    #[error("rule {rule}: {reason}")]
    InvalidPolicy { rule: String, reason: &'static str },
    #[error("no active {0} rule")]
    MissingRule(&'static str),
    #[error("rule {0}: no lunch window fits inside the weekday shift")]
    LunchOutsideShift(String),
}

impl Rule {
    pub fn new<N: Into<String>>(name: N, kind: RuleKind) -> Self {
        Self {
            id: RuleId::random(),
            name: name.into(),
            active: true,
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        let id = || self.id.as_str().to_string();
        if self.name.trim().is_empty() {
            return Err(RuleError::EmptyName(id()));
        }
        match &self.kind {
            RuleKind::WeekdayShift(shift) => validate_window(&id(), shift.start, shift.end),
            RuleKind::SundayHolidayShift(shift) => {
                validate_window(&id(), shift.start, shift.end)?;
                if shift.quota(Role::Leader) > 0 {
                    return Err(RuleError::LeaderOnSundays(id()));
                }
                Ok(())
            }
            RuleKind::Lunch(lunch) => {
                if lunch.duration_minutes == 0 {
                    return Err(invalid(id(), "lunch duration must be > 0"));
                }
                if lunch.windows.is_empty() {
                    return Err(invalid(id(), "lunch policy needs at least one window"));
                }
                let duration = Duration::minutes(i64::from(lunch.duration_minutes));
                for w in &lunch.windows {
                    validate_window(&id(), w.start, w.end)?;
                    if w.end - w.start < duration {
                        return Err(invalid(id(), "lunch window shorter than lunch duration"));
                    }
                }
                Ok(())
            }
            RuleKind::Rest(rest) => {
                if rest.max_consecutive_days == 0 {
                    return Err(invalid(id(), "max_consecutive_days must be > 0"));
                }
                if rest.min_rest_hours >= 24 {
                    return Err(invalid(id(), "min_rest_hours must be < 24"));
                }
                Ok(())
            }
            RuleKind::DayOff(day_off) => {
                if day_off.days_off_per_week > 6 {
                    return Err(invalid(id(), "days_off_per_week must be <= 6"));
                }
                if day_off.preferred_weekdays.contains(&Weekday::Sun) {
                    return Err(invalid(id(), "sunday cannot be a preferred weekday off"));
                }
                Ok(())
            }
        }
    }
}

fn invalid(rule: String, reason: &'static str) -> RuleError {
    RuleError::InvalidPolicy { rule, reason }
}

fn validate_window(rule: &str, start: NaiveTime, end: NaiveTime) -> Result<(), RuleError> {
    if end <= start {
        return Err(RuleError::InvalidWindow {
            rule: rule.to_string(),
            start,
            end,
        });
    }
    Ok(())
}

/// Valeur d'une politique avec la règle dont elle provient (None = défaut).
#[derive(Debug, Clone, PartialEq)]
pub struct Configured<T> {
    pub rule: Option<RuleId>,
    pub value: T,
}

/// Instantané immuable des règles actives, consommé par un run.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub weekday: Configured<ShiftRule>,
    pub sunday: Configured<ShiftRule>,
    pub lunch: Configured<LunchPolicy>,
    pub rest: Configured<RestPolicy>,
    pub day_off: Configured<DayOffPolicy>,
}

impl RuleSet {
    /// Ne garde que les règles actives ; à type égal, la première gagne.
    pub fn from_rules(rules: &[Rule]) -> Result<Self, RuleError> {
        let active: Vec<&Rule> = rules.iter().filter(|r| r.active).collect();
        for rule in &active {
            rule.validate()?;
        }

        let pick = |label: &str| active.iter().find(|r| r.kind.label() == label).copied();

        let weekday = match pick("weekday_shift") {
            Some(Rule {
                id,
                kind: RuleKind::WeekdayShift(shift),
                ..
            }) => configured(id, shift.clone()),
            _ => return Err(RuleError::MissingRule("weekday_shift")),
        };
        let sunday = match pick("sunday_holiday_shift") {
            Some(Rule {
                id,
                kind: RuleKind::SundayHolidayShift(shift),
                ..
            }) => configured(id, shift.clone()),
            _ => return Err(RuleError::MissingRule("sunday_holiday_shift")),
        };
        let lunch = match pick("lunch") {
            Some(Rule {
                id,
                kind: RuleKind::Lunch(lunch),
                ..
            }) => configured(id, lunch.clone()),
            _ => defaulted(),
        };
        let rest = match pick("rest") {
            Some(Rule {
                id,
                kind: RuleKind::Rest(rest),
                ..
            }) => configured(id, *rest),
            _ => defaulted(),
        };
        let day_off = match pick("day_off") {
            Some(Rule {
                id,
                kind: RuleKind::DayOff(day_off),
                ..
            }) => configured(id, day_off.clone()),
            _ => defaulted(),
        };

        if weekday.value.has_lunch {
            let duration = Duration::minutes(i64::from(lunch.value.duration_minutes));
            let fits = lunch.value.windows.iter().any(|w| {
                w.start >= weekday.value.start && w.start + duration <= weekday.value.end
            });
            if !fits {
                let rule = lunch
                    .rule
                    .as_ref()
                    .or(weekday.rule.as_ref())
                    .map(|r| r.as_str().to_string())
                    .unwrap_or_default();
                return Err(RuleError::LunchOutsideShift(rule));
            }
        }

        Ok(Self {
            weekday,
            sunday,
            lunch,
            rest,
            day_off,
        })
    }
}

fn configured<T>(id: &RuleId, value: T) -> Configured<T> {
    Configured {
        rule: Some(id.clone()),
        value,
    }
}

fn defaulted<T: Default>() -> Configured<T> {
    Configured {
        rule: None,
        value: T::default(),
    }
}

/// Règles de départ du rayon (turno semana, domingo/feriado, folga).
pub fn default_rules() -> Vec<Rule> {
    let hm = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
    vec![
        Rule {
            id: RuleId::new("weekday-shift"),
            name: "Turno Padrão Semana".into(),
            active: true,
            kind: RuleKind::WeekdayShift(ShiftRule {
                start: hm(7, 0),
                end: hm(15, 20),
                has_lunch: true,
                headcount: BTreeMap::from([(Role::Leader, 2), (Role::Stocker, 3)]),
                start_options: Vec::new(),
            }),
        },
        Rule {
            id: RuleId::new("sunday-holiday-shift"),
            name: "Turno Domingo/Feriado".into(),
            active: true,
            kind: RuleKind::SundayHolidayShift(ShiftRule {
                start: hm(7, 0),
                end: hm(13, 0),
                has_lunch: false,
                headcount: BTreeMap::from([(Role::Stocker, 2)]),
                start_options: Vec::new(),
            }),
        },
        Rule {
            id: RuleId::new("weekly-day-off"),
            name: "Folga Semanal".into(),
            active: true,
            kind: RuleKind::DayOff(DayOffPolicy::default()),
        },
    ]
}

/// Charge et valide un fichier JSON de règles (`Rule[]`).
pub fn load_rules_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Rule>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading rules {}", path.display()))?;
    let rules: Vec<Rule> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing rules {}", path.display()))?;
    for rule in &rules {
        rule.validate()
            .with_context(|| format!("invalid rule {} ({})", rule.name, rule.id.as_str()))?;
    }
    Ok(rules)
}

pub fn export_rules_json<P: AsRef<Path>>(path: P, rules: &[Rule]) -> Result<()> {
    let json = serde_json::to_string_pretty(rules)?;
    fs::write(path, json)?;
    Ok(())
}
