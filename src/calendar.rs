//! Arithmétique de calendrier civil (sans fuseau horaire).
//!
//! - Dimanche de Pâques (algorithme grégorien anonyme, dit de Meeus/Jones/Butcher).
//! - Fêtes mobiles dérivées : Vendredi saint, Carnaval, Corpus Christi.
//! - Format ISO `YYYY-MM-DD` aller-retour exact.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Format ISO utilisé partout dans la lib.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Dimanche de Pâques pour `year` (grégorien, valable pour `year >= 1583`).
///
/// `None` uniquement si chrono ne sait pas représenter l'année.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Vendredi saint : Pâques − 2 jours.
pub fn good_friday(year: i32) -> Option<NaiveDate> {
    easter_sunday(year).map(|e| e - Duration::days(2))
}

/// Mardi gras (Carnaval) : Pâques − 47 jours.
pub fn carnival(year: i32) -> Option<NaiveDate> {
    easter_sunday(year).map(|e| e - Duration::days(47))
}

/// Corpus Christi : Pâques + 60 jours.
pub fn corpus_christi(year: i32) -> Option<NaiveDate> {
    easter_sunday(year).map(|e| e + Duration::days(60))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE).ok()
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Tous les jours du mois `month` (1–12) de `year`, dans l'ordre.
pub fn month_days(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first.iter_days().take_while(|d| *d < next).collect())
}
