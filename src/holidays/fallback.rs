//! Listes statiques utilisées quand aucune source ne répond.

use crate::calendar;
use crate::model::{Holiday, HolidayScope, Obligation};
use chrono::NaiveDate;

const FIXED_NATIONAL: [(u32, u32, &str); 8] = [
    (1, 1, "Confraternização Universal"),
    (4, 21, "Tiradentes"),
    (5, 1, "Dia do Trabalhador"),
    (9, 7, "Independência do Brasil"),
    (10, 12, "Nossa Senhora Aparecida"),
    (11, 2, "Finados"),
    (11, 15, "Proclamação da República"),
    (12, 25, "Natal"),
];

/// Fériés nationaux fixes + fêtes mobiles (Vendredi saint, Carnaval, Corpus Christi).
pub fn national(year: i32) -> Vec<Holiday> {
    let mut out: Vec<Holiday> = FIXED_NATIONAL
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|d| Holiday::new(d, name, HolidayScope::National, Obligation::Mandatory))
        })
        .collect();

    let movable = [
        (calendar::good_friday(year), "Sexta-feira Santa", Obligation::Mandatory),
        (calendar::carnival(year), "Carnaval", Obligation::Optional),
        (calendar::corpus_christi(year), "Corpus Christi", Obligation::Optional),
    ];
    out.extend(movable.into_iter().filter_map(|(date, name, obligation)| {
        date.map(|d| Holiday::new(d, name, HolidayScope::National, obligation))
    }));
    out
}

/// Férié régional de São Paulo (9 juillet).
pub fn sao_paulo(year: i32) -> Vec<Holiday> {
    NaiveDate::from_ymd_opt(year, 7, 9)
        .map(|d| {
            vec![Holiday::new(
                d,
                "Revolução Constitucionalista",
                HolidayScope::State,
                Obligation::Mandatory,
            )]
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_list_has_fixed_and_movable_days() {
        let list = national(2025);
        assert_eq!(list.len(), 11);
        let carnival = list.iter().find(|h| h.name == "Carnaval").unwrap();
        assert_eq!(carnival.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(carnival.obligation, Obligation::Optional);
        assert!(list.iter().all(|h| h.scope == HolidayScope::National));
    }

    #[test]
    fn regional_list_is_single_state_day() {
        let list = sao_paulo(2024);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].scope, HolidayScope::State);
    }
}
