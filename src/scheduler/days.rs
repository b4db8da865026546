use super::util;
use crate::calendar;
use crate::model::{Holiday, ShiftType};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Day {
    pub date: NaiveDate,
    pub kind: ShiftType,
}

/// Type de journée : férié > dimanche > semaine.
pub fn shift_type_for(date: NaiveDate, holidays: &[Holiday]) -> ShiftType {
    if holidays.iter().any(|h| h.date == date) {
        ShiftType::Holiday
    } else if calendar::is_sunday(date) {
        ShiftType::Sunday
    } else {
        ShiftType::Weekday
    }
}

/// Jours du mois classés ; `None` si la période n'existe pas.
pub(super) fn classify(year: i32, month: u32, holidays: &[Holiday]) -> Option<Vec<Day>> {
    let in_month: Vec<Holiday> = holidays
        .iter()
        .filter(|h| h.date.year() == year && h.date.month() == month)
        .cloned()
        .collect();
    let days = calendar::month_days(year, month)?
        .into_iter()
        .map(|date| Day {
            date,
            kind: shift_type_for(date, &in_month),
        })
        .collect();
    Some(days)
}

/// Découpe en semaines lundi–dimanche (tronquées aux bords du mois).
pub(super) fn weeks(days: &[Day]) -> impl Iterator<Item = &[Day]> {
    days.chunk_by(|a, b| util::week_start(a.date) == util::week_start(b.date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HolidayScope, Obligation};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn holiday_takes_precedence_over_sunday() {
        // 2025-11-02 (Finados) tombe un dimanche
        let finados = Holiday::new(
            date(2025, 11, 2),
            "Finados",
            HolidayScope::National,
            Obligation::Mandatory,
        );
        let days = classify(2025, 11, &[finados.clone()]).unwrap();
        assert_eq!(days.len(), 30);
        assert_eq!(days[1].kind, ShiftType::Holiday);
        assert_eq!(days[8].kind, ShiftType::Sunday);
        assert_eq!(days[0].kind, ShiftType::Weekday);
        assert_eq!(shift_type_for(date(2025, 11, 2), &[finados]), ShiftType::Holiday);
    }

    #[test]
    fn optional_and_state_holidays_also_count() {
        let carnival = Holiday::new(
            date(2025, 3, 4),
            "Carnaval",
            HolidayScope::National,
            Obligation::Optional,
        );
        let state = Holiday::new(
            date(2025, 7, 9),
            "Revolução Constitucionalista",
            HolidayScope::State,
            Obligation::Mandatory,
        );
        assert_eq!(classify(2025, 3, &[carnival]).unwrap()[3].kind, ShiftType::Holiday);
        assert_eq!(classify(2025, 7, &[state]).unwrap()[8].kind, ShiftType::Holiday);
    }

    #[test]
    fn weeks_are_cut_at_month_edges() {
        // mars 2025 : commence un samedi, finit un lundi
        let days = classify(2025, 3, &[]).unwrap();
        let lens: Vec<usize> = weeks(&days).map(<[Day]>::len).collect();
        assert_eq!(lens, [2, 7, 7, 7, 7, 1]);
    }
}
