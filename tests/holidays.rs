#![forbid(unsafe_code)]
use chrono::NaiveDate;
use escala::{
    sync_holidays, Holiday, HolidayResolver, HolidayScope, HolidaySource, HolidayStore,
    JsonFileSource, JsonHolidayStore, Obligation, RawHoliday, SourceError,
};
use std::cell::Cell;
use std::rc::Rc;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Source de test : réponse fixe, compteur d'appels partagé.
struct Fixed {
    name: &'static str,
    answer: Result<Vec<RawHoliday>, SourceError>,
    calls: Rc<Cell<u32>>,
}

impl Fixed {
    fn boxed(
        name: &'static str,
        answer: Result<Vec<RawHoliday>, SourceError>,
    ) -> (Box<dyn HolidaySource>, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let source = Fixed {
            name,
            answer,
            calls: Rc::clone(&calls),
        };
        (Box::new(source), calls)
    }
}

impl HolidaySource for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn fetch(&self, _year: i32) -> Result<Vec<RawHoliday>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        self.answer.clone()
    }
}

fn down(name: &str) -> SourceError {
    SourceError::Unavailable(name.to_string(), "connection refused".to_string())
}

#[test]
fn first_successful_source_wins() {
    let (primary, primary_calls) = Fixed::boxed("primary", Err(down("primary")));
    let (secondary, _) = Fixed::boxed(
        "secondary",
        Ok(vec![
            RawHoliday::new("2025-01-01", "Confraternização Universal"),
            RawHoliday::new("2025-12-25", "Natal"),
        ]),
    );
    let (tertiary, tertiary_calls) = Fixed::boxed("tertiary", Ok(Vec::new()));

    let resolver = HolidayResolver::new(vec![primary, secondary, tertiary], None);
    let holidays = resolver.resolve(2025);

    assert_eq!(primary_calls.get(), 1);
    assert_eq!(tertiary_calls.get(), 0);
    let national: Vec<&str> = holidays
        .iter()
        .filter(|h| h.scope == HolidayScope::National)
        .map(|h| h.name.as_str())
        .collect();
    assert_eq!(national, ["Confraternização Universal", "Natal"]);
    // pas de source régionale : repli São Paulo
    assert!(holidays
        .iter()
        .any(|h| h.scope == HolidayScope::State && h.date == date(2025, 7, 9)));
}

#[test]
fn empty_answer_falls_through_to_static_list() {
    let (empty, _) = Fixed::boxed("empty", Ok(Vec::new()));
    let (broken, _) = Fixed::boxed(
        "broken",
        Err(SourceError::Status("broken".to_string(), 503)),
    );
    let resolver = HolidayResolver::new(vec![empty, broken], None);
    let holidays = resolver.resolve(2026);

    let national: Vec<&Holiday> = holidays
        .iter()
        .filter(|h| h.scope == HolidayScope::National)
        .collect();
    assert_eq!(national.len(), 11);
    let good_friday = national.iter().find(|h| h.date == date(2026, 4, 3)).unwrap();
    assert_eq!(good_friday.obligation, Obligation::Mandatory);
    let carnival = national.iter().find(|h| h.date == date(2026, 2, 17)).unwrap();
    assert_eq!(carnival.obligation, Obligation::Optional);
    assert!(national.iter().any(|h| h.date == date(2026, 6, 4)));
}

#[test]
fn state_source_is_independent_from_national() {
    let (national, _) = Fixed::boxed(
        "national",
        Ok(vec![RawHoliday::new("2025-11-20", "Consciência Negra")]),
    );
    let (state, _) = Fixed::boxed(
        "state",
        Ok(vec![
            RawHoliday::new("25/01", "Aniversário de São Paulo"),
            RawHoliday::new("2025-11-20", "Consciência Negra"),
        ]),
    );
    let holidays = HolidayResolver::new(vec![national], Some(state)).resolve(2025);

    // même date, portées différentes : les deux restent, triés par date puis portée
    let names: Vec<(NaiveDate, HolidayScope)> =
        holidays.iter().map(|h| (h.date, h.scope)).collect();
    assert_eq!(
        names,
        [
            (date(2025, 1, 25), HolidayScope::State),
            (date(2025, 11, 20), HolidayScope::National),
            (date(2025, 11, 20), HolidayScope::State),
        ]
    );
}

#[test]
fn failing_state_source_uses_configured_fallback() {
    fn none(_: i32) -> Vec<Holiday> {
        Vec::new()
    }
    let (state, _) = Fixed::boxed("state", Err(down("state")));
    let holidays = HolidayResolver::new(Vec::new(), Some(state))
        .with_state_fallback(none)
        .resolve(2025);
    assert!(holidays.iter().all(|h| h.scope == HolidayScope::National));
}

#[test]
fn duplicate_records_keep_the_first() {
    let (source, _) = Fixed::boxed(
        "dup",
        Ok(vec![
            RawHoliday::new("2025-04-21", "Tiradentes"),
            RawHoliday::new("21/04", "Dia de Tiradentes"),
        ]),
    );
    let holidays = HolidayResolver::new(vec![source], None).resolve(2025);
    let april: Vec<&Holiday> = holidays
        .iter()
        .filter(|h| h.date == date(2025, 4, 21))
        .collect();
    assert_eq!(april.len(), 1);
    assert_eq!(april[0].name, "Tiradentes");
}

#[test]
fn json_file_source_reads_year_template() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("br-2025.json"),
        r#"[{"date":"2025-05-01","name":"Dia do Trabalho","type":"national"},
            {"title":"Carnaval","type":"facultativo","variableDates":{"2025":"2025-03-04"}}]"#,
    )
    .unwrap();
    let template = dir.path().join("br-{year}.json");
    let source: Box<dyn HolidaySource> =
        Box::new(JsonFileSource::new("file", template.to_string_lossy()));

    let holidays = HolidayResolver::new(vec![source], None).resolve(2025);
    let carnival = holidays.iter().find(|h| h.name == "Carnaval").unwrap();
    assert_eq!(carnival.date, date(2025, 3, 4));
    assert_eq!(carnival.obligation, Obligation::Optional);
    assert!(holidays.iter().any(|h| h.name == "Dia do Trabalho"));
}

#[test]
fn sync_replaces_the_year_in_a_json_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.json");
    let mut store = JsonHolidayStore::open(&path).unwrap();
    let old = Holiday::new(
        date(2025, 3, 19),
        "São José",
        HolidayScope::State,
        Obligation::Mandatory,
    );
    let other_year = Holiday::new(
        date(2024, 12, 25),
        "Natal",
        HolidayScope::National,
        Obligation::Mandatory,
    );
    store.insert(&old).unwrap();
    store.insert(&other_year).unwrap();

    let report = sync_holidays(&HolidayResolver::offline(), &mut store, 2025).unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.inserted, 12);
    assert!(report.errors.is_empty());

    let reopened = JsonHolidayStore::open(&path).unwrap();
    assert_eq!(reopened.for_year(2025).len(), 12);
    assert_eq!(reopened.for_year(2024), [other_year]);
    assert!(reopened.for_year(2025).iter().all(|h| h.name != "São José"));
}
