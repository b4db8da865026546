#![forbid(unsafe_code)]
use chrono::Weekday;
use escala::rules::export_rules_json;
use escala::{
    default_rules, load_rules_from_file, DayOffPolicy, LunchPolicy, Role, Rule, RuleKind, RuleSet,
};
use tempfile::tempdir;

#[test]
fn export_and_reload_rules() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.json");
    let mut rules = default_rules();
    rules.push(Rule::new("Almoço", RuleKind::Lunch(LunchPolicy::default())));
    export_rules_json(&path, &rules).unwrap();

    let loaded = load_rules_from_file(&path).unwrap();
    assert_eq!(loaded, rules);

    let set = RuleSet::from_rules(&loaded).unwrap();
    assert_eq!(set.lunch.value.windows.len(), 3);
    assert_eq!(set.lunch.rule.as_ref(), Some(&rules[3].id));
    assert_eq!(
        set.day_off.value,
        DayOffPolicy {
            preferred_weekdays: vec![Weekday::Tue, Weekday::Thu],
            days_off_per_week: 1,
        }
    );
    assert_eq!(set.weekday.value.quota(Role::Stocker), 3);
}

#[test]
fn invalid_rule_file_is_rejected_with_context() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(
        &path,
        r#"[{"id":"bad","name":"Turno invertido","kind":"weekday_shift","start":"15:00","end":"07:00"}]"#,
    )
    .unwrap();
    let err = load_rules_from_file(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("invalid rule Turno invertido (bad)"), "{msg}");
    assert!(msg.contains("end 07:00:00 must be after start 15:00:00"), "{msg}");
}

#[test]
fn first_active_rule_of_a_kind_wins() {
    let mut rules = default_rules();
    let mut late = rules[0].clone();
    late.id = escala::RuleId::new("weekday-late");
    if let RuleKind::WeekdayShift(shift) = &mut late.kind {
        shift.headcount.insert(Role::Stocker, 1);
    }
    rules.insert(0, late.clone());
    assert_eq!(
        RuleSet::from_rules(&rules).unwrap().weekday.rule,
        Some(late.id.clone())
    );

    rules[0].active = false;
    let set = RuleSet::from_rules(&rules).unwrap();
    assert_eq!(set.weekday.rule, Some(escala::RuleId::new("weekday-shift")));
    assert_eq!(set.weekday.value.quota(Role::Stocker), 3);
}
