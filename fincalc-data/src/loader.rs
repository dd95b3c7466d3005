use std::collections::BTreeMap;
use std::io::Read;

use fincalc_core::calculations::{BracketError, validate_brackets};
use fincalc_core::{Country, FilingStatus, TaxBracket, TaxTables};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket overrides.
#[derive(Debug, Error)]
pub enum TableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown country '{0}'")]
    UnknownCountry(String),

    #[error("unknown schedule '{schedule}' for {country}")]
    UnknownSchedule { country: Country, schedule: String },

    #[error("no {0} tables loaded to override")]
    MissingProfile(Country),

    #[error("schedule {schedule}: {source}")]
    InvalidSchedule {
        schedule: String,
        #[source]
        source: BracketError,
    },
}

impl From<csv::Error> for TableLoaderError {
    fn from(err: csv::Error) -> Self {
        TableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket override file.
///
/// - `country`: `IN`, `CA` or `US` (display names are accepted too)
/// - `schedule`: which schedule the row belongs to
///
///   | country | schedule examples |
///   |---------|-------------------|
///   | IN      | `old`, `new` |
///   | CA      | `federal`, `provincial:ON` |
///   | US      | `federal:MFJ`, `ltcg:S`, `state:NY` |
///
/// - `min_income`: lower bound of the bracket
/// - `max_income`: upper bound, empty for the open-ended top bracket
/// - `rate`: marginal rate as a fraction (e.g. 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub country: String,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A schedule inside [`TaxTables`] that a group of rows replaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ScheduleTarget {
    IndiaOld,
    IndiaNew,
    CanadaFederal,
    CanadaProvincial(String),
    UsaFederal(FilingStatus),
    UsaLongTermGains(FilingStatus),
    UsaState(String),
}

impl ScheduleTarget {
    fn parse(
        country: Country,
        schedule: &str,
    ) -> Option<Self> {
        let schedule = schedule.trim();
        let (kind, qualifier) = match schedule.split_once(':') {
            Some((kind, qualifier)) => (kind, Some(qualifier.trim())),
            None => (schedule, None),
        };
        let region = |q: &str| (!q.is_empty()).then(|| q.to_ascii_uppercase());

        match (country, kind.to_ascii_lowercase().as_str(), qualifier) {
            (Country::India, "old", None) => Some(Self::IndiaOld),
            (Country::India, "new", None) => Some(Self::IndiaNew),
            (Country::Canada, "federal", None) => Some(Self::CanadaFederal),
            (Country::Canada, "provincial", Some(q)) => region(q).map(Self::CanadaProvincial),
            (Country::UnitedStates, "federal", Some(q)) => {
                FilingStatus::parse(q).map(Self::UsaFederal)
            }
            (Country::UnitedStates, "ltcg", Some(q)) => {
                FilingStatus::parse(q).map(Self::UsaLongTermGains)
            }
            (Country::UnitedStates, "state", Some(q)) => region(q).map(Self::UsaState),
            _ => None,
        }
    }

    fn country(&self) -> Country {
        match self {
            Self::IndiaOld | Self::IndiaNew => Country::India,
            Self::CanadaFederal | Self::CanadaProvincial(_) => Country::Canada,
            Self::UsaFederal(_) | Self::UsaLongTermGains(_) | Self::UsaState(_) => {
                Country::UnitedStates
            }
        }
    }

    /// Same labels as [`TaxTables::schedules`].
    fn label(&self) -> String {
        match self {
            Self::IndiaOld => "IN:old".to_string(),
            Self::IndiaNew => "IN:new".to_string(),
            Self::CanadaFederal => "CA:federal".to_string(),
            Self::CanadaProvincial(code) => format!("CA:provincial:{code}"),
            Self::UsaFederal(status) => format!("US:federal:{}", status.as_str()),
            Self::UsaLongTermGains(status) => format!("US:ltcg:{}", status.as_str()),
            Self::UsaState(code) => format!("US:state:{code}"),
        }
    }

    /// Replaces this schedule in `tables`. Provinces and states not yet
    /// present are added.
    fn replace(
        &self,
        tables: &mut TaxTables,
        brackets: Vec<TaxBracket>,
    ) -> Result<(), TableLoaderError> {
        let missing = || TableLoaderError::MissingProfile(self.country());
        match self {
            Self::IndiaOld => tables.india.as_mut().ok_or_else(missing)?.old_regime.brackets = brackets,
            Self::IndiaNew => tables.india.as_mut().ok_or_else(missing)?.new_regime.brackets = brackets,
            Self::CanadaFederal => tables.canada.as_mut().ok_or_else(missing)?.federal = brackets,
            Self::CanadaProvincial(code) => {
                tables
                    .canada
                    .as_mut()
                    .ok_or_else(missing)?
                    .provincial
                    .insert(code.clone(), brackets);
            }
            Self::UsaFederal(status) => {
                *tables.usa.as_mut().ok_or_else(missing)?.federal.get_mut(*status) = brackets
            }
            Self::UsaLongTermGains(status) => {
                *tables
                    .usa
                    .as_mut()
                    .ok_or_else(missing)?
                    .long_term_capital_gains
                    .get_mut(*status) = brackets
            }
            Self::UsaState(code) => {
                tables
                    .usa
                    .as_mut()
                    .ok_or_else(missing)?
                    .state
                    .insert(code.clone(), brackets);
            }
        }
        Ok(())
    }
}

/// Loader for bracket overrides from CSV files.
///
/// Rows are grouped by `(country, schedule)`; each group replaces the whole
/// schedule it names, so a file only needs the schedules it changes.
pub struct BracketCsvLoader;

impl BracketCsvLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Apply records to `tables`, returning how many schedules were replaced.
    ///
    /// Every group is validated before anything is written, so a failed
    /// apply leaves `tables` untouched.
    pub fn apply(
        tables: &mut TaxTables,
        records: &[BracketRecord],
    ) -> Result<usize, TableLoaderError> {
        let mut groups: BTreeMap<ScheduleTarget, Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            let country = Country::parse(&record.country)
                .ok_or_else(|| TableLoaderError::UnknownCountry(record.country.clone()))?;
            let target = ScheduleTarget::parse(country, &record.schedule).ok_or_else(|| {
                TableLoaderError::UnknownSchedule {
                    country,
                    schedule: record.schedule.clone(),
                }
            })?;

            groups.entry(target).or_default().push(TaxBracket {
                min_income: record.min_income,
                max_income: record.max_income,
                tax_rate: record.rate,
            });
        }

        for (target, brackets) in groups.iter_mut() {
            brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
            validate_brackets(brackets).map_err(|source| TableLoaderError::InvalidSchedule {
                schedule: target.label(),
                source,
            })?;
            if !tables.has_profile(target.country()) {
                return Err(TableLoaderError::MissingProfile(target.country()));
            }
        }

        let replaced = groups.len();
        for (target, brackets) in groups {
            debug!(schedule = %target.label(), brackets = brackets.len(), "replacing schedule");
            target.replace(tables, brackets)?;
        }

        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use fincalc_core::calculations::compute_bracket_tax;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::builtin::builtin_tables;

    const HEADER: &str = "country,schedule,min_income,max_income,rate\n";

    fn parse(rows: &str) -> Vec<BracketRecord> {
        BracketCsvLoader::parse(format!("{HEADER}{rows}").as_bytes()).expect("Failed to parse CSV")
    }

    #[test]
    fn test_parse_csv_single_bracket() {
        let records = parse("US,state:TX,0,,0");

        assert_eq!(
            records,
            vec![BracketRecord {
                country: "US".to_string(),
                schedule: "state:TX".to_string(),
                min_income: dec!(0),
                max_income: None,
                rate: dec!(0),
            }]
        );
    }

    #[test]
    fn test_parse_csv_bounded_bracket() {
        let records = parse("CA,provincial:ON,0,51446,0.0505");

        assert_eq!(records[0].max_income, Some(dec!(51446)));
        assert_eq!(records[0].rate, dec!(0.0505));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "country,schedule,min_income\nUS,state:TX,0";

        let err = BracketCsvLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");
        let TableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "Expected 'missing field' in error, got: {}", msg);
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = format!("{HEADER}US,state:TX,abc,,0");

        let err = BracketCsvLoader::parse(csv.as_bytes()).expect_err("Should fail for invalid decimal");
        assert!(matches!(err, TableLoaderError::CsvParse(_)));
    }

    #[test]
    fn schedule_target_parses_every_kind() {
        let cases = [
            (Country::India, "old", ScheduleTarget::IndiaOld),
            (Country::India, "NEW", ScheduleTarget::IndiaNew),
            (Country::Canada, "federal", ScheduleTarget::CanadaFederal),
            (
                Country::Canada,
                "provincial:on",
                ScheduleTarget::CanadaProvincial("ON".to_string()),
            ),
            (
                Country::UnitedStates,
                "federal:MFJ",
                ScheduleTarget::UsaFederal(FilingStatus::MarriedFilingJointly),
            ),
            (
                Country::UnitedStates,
                "ltcg:S",
                ScheduleTarget::UsaLongTermGains(FilingStatus::Single),
            ),
            (
                Country::UnitedStates,
                "state:ny",
                ScheduleTarget::UsaState("NY".to_string()),
            ),
        ];

        for (country, schedule, expected) in cases {
            assert_eq!(ScheduleTarget::parse(country, schedule), Some(expected));
        }
    }

    #[test]
    fn schedule_target_rejects_mismatched_country() {
        assert_eq!(ScheduleTarget::parse(Country::India, "federal"), None);
        assert_eq!(ScheduleTarget::parse(Country::Canada, "state:ON"), None);
        assert_eq!(ScheduleTarget::parse(Country::UnitedStates, "federal"), None);
        assert_eq!(ScheduleTarget::parse(Country::UnitedStates, "state:"), None);
    }

    #[test]
    fn apply_replaces_existing_state() {
        let mut tables = builtin_tables();
        let records = parse("US,state:IL,0,,0.05\n");

        let replaced = BracketCsvLoader::apply(&mut tables, &records).unwrap();

        assert_eq!(replaced, 1);
        let il = &tables.usa.as_ref().unwrap().state["IL"];
        assert_eq!(compute_bracket_tax(dec!(100000), il), dec!(5000));
    }

    #[test]
    fn apply_adds_new_region_and_sorts_rows() {
        let mut tables = builtin_tables();
        let records = parse(
            "CA,provincial:PE,32656,,0.1375\n\
             CA,provincial:PE,0,32656,0.0965\n",
        );

        BracketCsvLoader::apply(&mut tables, &records).unwrap();

        assert!(tables.regions(Country::Canada).contains(&"PE".to_string()));
        assert_eq!(
            tables.canada.as_ref().unwrap().provincial["PE"][0],
            TaxBracket::bounded(dec!(0), dec!(32656), dec!(0.0965))
        );
    }

    #[test]
    fn apply_groups_multiple_schedules() {
        let mut tables = builtin_tables();
        let records = parse(
            "IN,new,0,400000,0\n\
             IN,new,400000,,0.05\n\
             US,federal:HOH,0,,0.10\n",
        );

        let replaced = BracketCsvLoader::apply(&mut tables, &records).unwrap();

        assert_eq!(replaced, 2);
        assert_eq!(tables.india.as_ref().unwrap().new_regime.brackets.len(), 2);
        assert_eq!(tables.usa.as_ref().unwrap().federal.head_of_household.len(), 1);
    }

    #[test]
    fn apply_rejects_gap_without_touching_tables() {
        let mut tables = builtin_tables();
        let records = parse(
            "US,state:TX,0,,0\n\
             US,state:CA,0,1000,0.01\n\
             US,state:CA,2000,,0.02\n",
        );

        let err = BracketCsvLoader::apply(&mut tables, &records).unwrap_err();

        let TableLoaderError::InvalidSchedule { schedule, .. } = err else {
            panic!("Expected InvalidSchedule, got: {:?}", err);
        };
        assert_eq!(schedule, "US:state:CA");
        assert_eq!(tables, builtin_tables());
    }

    #[test]
    fn apply_rejects_unknown_country() {
        let mut tables = builtin_tables();
        let records = parse("FR,federal,0,,0.1\n");

        assert!(matches!(
            BracketCsvLoader::apply(&mut tables, &records),
            Err(TableLoaderError::UnknownCountry(code)) if code == "FR"
        ));
    }

    #[test]
    fn apply_rejects_unknown_schedule() {
        let mut tables = builtin_tables();
        let records = parse("IN,legacy,0,,0.1\n");

        assert!(matches!(
            BracketCsvLoader::apply(&mut tables, &records),
            Err(TableLoaderError::UnknownSchedule { country: Country::India, .. })
        ));
    }

    #[test]
    fn apply_requires_profile() {
        let mut tables = TaxTables::default();
        let records = parse("CA,federal,0,,0.15\n");

        assert!(matches!(
            BracketCsvLoader::apply(&mut tables, &records),
            Err(TableLoaderError::MissingProfile(Country::Canada))
        ));
    }
}
