//! CSV loading of the two input tables.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use wildlife_analysis::record::{FactorRow, SurvivalRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TableKind {
    #[display("factor")]
    Factor,
    #[display("survival")]
    Survival,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum InputError {
    /// The table file is absent or cannot be opened.
    #[display("missing {kind} table {}: {source}", path.display())]
    MissingInput {
        kind: TableKind,
        path: PathBuf,
        source: io::Error,
    },
    /// A row or cell does not match the table schema.
    #[display("malformed {kind} table {}: {source}", path.display())]
    Malformed {
        kind: TableKind,
        path: PathBuf,
        source: csv::Error,
    },
}

impl InputError {
    #[must_use]
    pub fn kind(&self) -> TableKind {
        match self {
            Self::MissingInput { kind, .. } | Self::Malformed { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputTables {
    pub factors: Vec<FactorRow>,
    pub survival: Vec<SurvivalRow>,
}

/// Reads both tables.
///
/// Both files are opened before either is parsed, so a missing second table
/// is reported without any parsing work.
pub fn load_tables(factors: &Path, survival: &Path) -> Result<InputTables, InputError> {
    let factor_file = open(TableKind::Factor, factors)?;
    let survival_file = open(TableKind::Survival, survival)?;
    Ok(InputTables {
        factors: read_rows(TableKind::Factor, factors, factor_file)?,
        survival: read_rows(TableKind::Survival, survival, survival_file)?,
    })
}

/// Opens a table file; anything but a readable regular file is missing input.
fn open(kind: TableKind, path: &Path) -> Result<File, InputError> {
    let missing = |source: io::Error| InputError::MissingInput {
        kind,
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(missing)?;
    if !file.metadata().map_err(missing)?.is_file() {
        return Err(missing(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(file)
}

fn read_rows<T>(kind: TableKind, path: &Path, file: File) -> Result<Vec<T>, InputError>
where
    T: DeserializeOwned,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| InputError::Malformed {
            kind,
            path: path.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const FACTORS: &str = "\
AirQuality,Temperature,DeforestationRate,SpeciesDiversity,ReproductiveRates
71.5,14.2,0.12,0.64,2.4
65.0,-3.5,0.30,,2.1
";

    const SURVIVAL: &str = "\
Habitat,Survival_Time,Censoring_Status
Forest,120.5,1
Wetland,365,0
Forest, 80 ,true
";

    #[test]
    fn test_load_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let factors = dir.path().join("factor_data.csv");
        let survival = dir.path().join("survival_data.csv");
        fs::write(&factors, FACTORS).unwrap();
        fs::write(&survival, SURVIVAL).unwrap();

        let tables = load_tables(&factors, &survival).unwrap();
        assert_eq!(tables.factors.len(), 2);
        assert_eq!(tables.factors[0].temperature, Some(14.2));
        assert_eq!(tables.factors[1].species_diversity, None);
        assert_eq!(
            tables.survival,
            [
                SurvivalRow::new("Forest", 120.5, true),
                SurvivalRow::new("Wetland", 365.0, false),
                SurvivalRow::new("Forest", 80.0, true),
            ]
        );
    }

    #[test]
    fn test_missing_table_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let factors = dir.path().join("factor_data.csv");
        let survival = dir.path().join("survival_data.csv");

        let err = load_tables(&factors, &survival).unwrap_err();
        assert!(matches!(err, InputError::MissingInput { .. }));
        assert_eq!(err.kind(), TableKind::Factor);

        fs::write(&factors, FACTORS).unwrap();
        let err = load_tables(&factors, &survival).unwrap_err();
        assert!(matches!(err, InputError::MissingInput { .. }));
        assert_eq!(err.kind(), TableKind::Survival);
        assert!(err.to_string().contains("survival_data.csv"));
    }

    #[test]
    fn test_directory_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let survival = dir.path().join("survival_data.csv");
        fs::write(&survival, SURVIVAL).unwrap();

        let err = load_tables(dir.path(), &survival).unwrap_err();
        assert!(matches!(
            err,
            InputError::MissingInput {
                kind: TableKind::Factor,
                ..
            }
        ));
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_malformed_cell_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let factors = dir.path().join("factor_data.csv");
        let survival = dir.path().join("survival_data.csv");
        fs::write(&factors, FACTORS).unwrap();
        fs::write(
            &survival,
            "Habitat,Survival_Time,Censoring_Status\nForest,12,2\n",
        )
        .unwrap();

        let err = load_tables(&factors, &survival).unwrap_err();
        assert!(matches!(
            err,
            InputError::Malformed {
                kind: TableKind::Survival,
                ..
            }
        ));
    }
}
