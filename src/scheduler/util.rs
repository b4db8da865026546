use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Intervalle semi-ouvert `[start, end)` contenant `t`.
pub(super) fn contains(start: NaiveTime, end: NaiveTime, t: NaiveTime) -> bool {
    start <= t && t < end
}

pub(super) fn at(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Lundi de la semaine de `date`.
pub(super) fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
