use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Enregistrement brut tel que renvoyé par une source, avant normalisation.
///
/// Couvre les deux formes connues : `{date, name, type}` et
/// `{date | "dd/mm", title, type, variableDates: {"<année>": date}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawHoliday {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "variableDates")]
    pub variable_dates: BTreeMap<String, String>,
}

impl RawHoliday {
    pub fn new<D: Into<String>, N: Into<String>>(date: D, name: N) -> Self {
        Self {
            date: Some(date.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_kind<K: Into<String>>(mut self, kind: K) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("holiday source {0} unavailable: {1}")]
    Unavailable(String, String),
    #[error("holiday source {0} answered with status {1}")]
    Status(String, u16),
    #[error("holiday source {0} returned an invalid payload: {1}")]
    Payload(String, String),
}

/// Capacité « récupérer les fériés de l'année Y depuis la source S ».
///
/// Le transport réel (HTTP, cache disque…) reste hors de la lib.
pub trait HolidaySource {
    fn name(&self) -> &str;
    fn fetch(&self, year: i32) -> Result<Vec<RawHoliday>, SourceError>;
}

/// Source lue depuis un fichier JSON (`RawHoliday[]`), chemin paramétré par `{year}`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    name: String,
    path_template: String,
}

impl JsonFileSource {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, path_template: P) -> Self {
        Self {
            name: name.into(),
            path_template: path_template.into(),
        }
    }

    pub fn path_for(&self, year: i32) -> PathBuf {
        PathBuf::from(self.path_template.replace("{year}", &year.to_string()))
    }
}

impl HolidaySource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, year: i32) -> Result<Vec<RawHoliday>, SourceError> {
        let path = self.path_for(year);
        let data = fs::read(&path).map_err(|err| {
            SourceError::Unavailable(self.name.clone(), format!("{}: {err}", path.display()))
        })?;
        serde_json::from_slice(&data)
            .map_err(|err| SourceError::Payload(self.name.clone(), err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_payload_shapes() {
        let national = r#"[{"date":"2025-04-21","name":"Tiradentes","type":"national"}]"#;
        let parsed: Vec<RawHoliday> = serde_json::from_str(national).unwrap();
        assert_eq!(parsed[0].name.as_deref(), Some("Tiradentes"));

        let community = r#"[{"date":"","title":"Carnaval","type":"facultativo",
            "variableDates":{"2025":"2025-03-04"}}]"#;
        let parsed: Vec<RawHoliday> = serde_json::from_str(community).unwrap();
        assert_eq!(parsed[0].title.as_deref(), Some("Carnaval"));
        assert_eq!(parsed[0].variable_dates["2025"], "2025-03-04");
    }

    #[test]
    fn missing_file_is_unavailable() {
        let src = JsonFileSource::new("cache", "/nonexistent/escala/{year}.json");
        assert_eq!(
            src.path_for(2025),
            PathBuf::from("/nonexistent/escala/2025.json")
        );
        assert!(matches!(src.fetch(2025), Err(SourceError::Unavailable(..))));
    }
}
