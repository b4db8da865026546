#![forbid(unsafe_code)]
//! Escala : génération locale de l'escala mensuelle d'un rayon (sans BD).
//!
//! - Fériés nationaux et régionaux, sources classées avec replis statiques.
//! - Rotation dimanche/férié `NxN`, folgas hebdomadaires, quotas par fonction.
//! - Repos minimal entre journées, pauses déjeuner sous contrainte d'effectif.
//! - Stockage fichiers (JSON/CSV) ; un run infaisable ne produit rien.

pub mod calendar;
pub mod hhmm;
pub mod holidays;
pub mod io;
pub mod model;
pub mod rules;
pub mod scheduler;
pub mod storage;

pub use holidays::{
    sync_holidays, HolidayResolver, HolidaySource, HolidayStore, JsonFileSource, RawHoliday,
    SourceError, SyncReport,
};
pub use model::{
    Employee, EmployeeId, FixedHours, Holiday, HolidayScope, Obligation, Role, Roster,
    ShiftAssignment, ShiftType, SundayPattern,
};
pub use rules::{
    default_rules, load_rules_from_file, DayOffPolicy, LunchPolicy, LunchWindow, RestPolicy, Rule,
    RuleError, RuleId, RuleKind, RuleSet, ShiftRule,
};
pub use scheduler::{
    generate, GenerateError, GenerationRequest, Infeasibility, InfeasibilityReport,
    InfeasibleReason, RotationCarry, Schedule, SundayRotation,
};
pub use storage::{JsonHolidayStore, JsonStorage, Storage};
