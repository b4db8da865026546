use crate::hhmm;
use crate::model::{Employee, Role, SundayPattern};
use crate::scheduler::Schedule;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de collaborateurs depuis CSV, header
/// `name,role[,active][,fixed_start][,fixed_end][,works_sundays][,sunday_pattern][,contact]`.
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let role = rec.get(1).context("missing role")?.trim();
        if name.is_empty() || role.is_empty() {
            bail!("invalid employee row (empty)");
        }
        let role: Role = role
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid role for {name}"))?;
        let mut employee = Employee::new(name, role);

        let field = |i: usize| rec.get(i).map(str::trim).filter(|s| !s.is_empty());
        if let Some(flag) = field(2) {
            employee.active =
                parse_bool(flag).with_context(|| format!("invalid active value for {name}"))?;
        }
        match (field(3), field(4)) {
            (Some(start), Some(end)) => {
                let start = hhmm::parse_time(start)
                    .with_context(|| format!("invalid fixed_start for {name}"))?;
                let end = hhmm::parse_time(end)
                    .with_context(|| format!("invalid fixed_end for {name}"))?;
                if end <= start {
                    bail!("fixed hours of {name} end before they start");
                }
                employee = employee.with_fixed_hours(start, end);
            }
            (None, None) => {}
            _ => bail!("fixed hours of {name} need both fixed_start and fixed_end"),
        }
        if let Some(pattern) = field(6) {
            let pattern: SundayPattern = pattern
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid sunday_pattern for {name}"))?;
            employee = employee.with_sundays(pattern);
        }
        if let Some(flag) = field(5) {
            employee.works_sundays = parse_bool(flag)
                .with_context(|| format!("invalid works_sundays value for {name}"))?;
        }
        employee.contact = field(7).map(str::to_string);
        out.push(employee);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "sim" | "s" => Ok(true),
        "false" | "0" | "no" | "n" | "nao" | "não" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON de l'escala (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des créneaux: header
/// `date,employee,role,shift_type,start,end,lunch_start,lunch_end`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "date",
        "employee",
        "role",
        "shift_type",
        "start",
        "end",
        "lunch_start",
        "lunch_end",
    ])?;
    for a in &schedule.assignments {
        let date = a.date.to_string();
        let start = hhmm::format_time(a.start);
        let end = hhmm::format_time(a.end);
        let lunch_start = a.lunch_start.map(hhmm::format_time).unwrap_or_default();
        let lunch_end = a.lunch_end.map(hhmm::format_time).unwrap_or_default();
        w.write_record([
            date.as_str(),
            a.employee_name.as_str(),
            a.role.as_str(),
            a.shift_type.as_str(),
            start.as_str(),
            end.as_str(),
            lunch_start.as_str(),
            lunch_end.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::io::Write;

    #[test]
    fn employees_csv_reads_optional_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.csv");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            "name,role,active,fixed_start,fixed_end,works_sundays,sunday_pattern,contact"
        )
        .unwrap();
        writeln!(f, "Amanda,repositor,sim,10:00,19:20,,1x1,amanda@loja").unwrap();
        writeln!(f, "Carlos,stocker,,,,,2x2,").unwrap();
        writeln!(f, "Lia,lider,false,,,,,").unwrap();
        drop(f);

        let team = import_employees_csv(&path).unwrap();
        assert_eq!(team.len(), 3);
        let amanda = &team[0];
        assert_eq!(amanda.role, Role::Stocker);
        assert_eq!(
            amanda.fixed_hours.map(|h| h.end),
            NaiveTime::from_hms_opt(19, 20, 0)
        );
        assert!(amanda.eligible_for_sundays());
        assert_eq!(amanda.contact.as_deref(), Some("amanda@loja"));
        assert_eq!(team[1].sunday_pattern, SundayPattern::TwoByTwo);
        assert!(!team[2].active);
        assert_eq!(team[2].role, Role::Leader);
    }

    #[test]
    fn half_fixed_hours_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.csv");
        fs::write(&path, "name,role,active,fixed_start,fixed_end\nAna,stocker,,10:00,\n").unwrap();
        let err = import_employees_csv(&path).unwrap_err();
        assert!(err.to_string().contains("fixed_start and fixed_end"));
    }
}
