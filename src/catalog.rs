//! # Spot Catalog
//!
//! Loads the kite spots from a CSV file with the header
//! `region,name,latitude,longitude,min_knots,max_knots,best_directions,tide_notes`.
//!
//! `best_directions` is a semicolon-separated list of compass labels (`"N;NE;E"`).
//! The catalog is trusted input: any malformed row fails the whole load, and the
//! error names the offending line.

use crate::{Octant, Spot};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the spot catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be opened
    #[error("cannot open catalog {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV structure or numeric field could not be parsed
    #[error("malformed catalog row: {0}")]
    Csv(#[from] csv::Error),

    /// A best-direction label is not one of the eight octants
    #[error("line {line}: {source}")]
    Direction {
        line: u64,
        #[source]
        source: crate::UnknownOctant,
    },

    /// Wind window is empty (`min_knots > max_knots`)
    #[error("line {line}: min_knots {min} exceeds max_knots {max}")]
    Window { line: u64, min: i32, max: i32 },
}

/// One CSV row as written in the file.
#[derive(Debug, Deserialize)]
struct SpotRow {
    region: String,
    name: String,
    latitude: f64,
    longitude: f64,
    min_knots: i32,
    max_knots: i32,
    best_directions: String,
    #[serde(default)]
    tide_notes: String,
}

/// Load the catalog from a CSV file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Spot>, CatalogError> {
    let file = File::open(&path).map_err(|source| CatalogError::Open {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    from_reader(file)
}

/// Parse a catalog from any reader, keeping row order.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Spot>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut spots = Vec::new();
    while csv_reader.read_record(&mut record)? {
        // Line where the record starts; blank lines and quoted newlines count
        let line = record.position().map_or(0, |position| position.line());
        let row: SpotRow = record.deserialize(Some(&headers))?;
        spots.push(row.into_spot(line)?);
    }
    Ok(spots)
}

impl SpotRow {
    fn into_spot(self, line: u64) -> Result<Spot, CatalogError> {
        if self.min_knots > self.max_knots {
            return Err(CatalogError::Window {
                line,
                min: self.min_knots,
                max: self.max_knots,
            });
        }

        let best_directions = self
            .best_directions
            .split(';')
            .filter(|label| !label.trim().is_empty())
            .map(|label| label.parse::<Octant>())
            .collect::<Result<_, _>>()
            .map_err(|source| CatalogError::Direction { line, source })?;

        Ok(Spot {
            name: self.name,
            region: self.region,
            latitude: self.latitude,
            longitude: self.longitude,
            min_knots: self.min_knots,
            max_knots: self.max_knots,
            best_directions,
            tide_notes: self.tide_notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "region,name,latitude,longitude,min_knots,max_knots,best_directions,tide_notes\n";

    #[test]
    fn test_parse_keeps_order_and_fields() {
        let csv = format!(
            "{HEADER}\
             Tarifa,Los Lances,36.03,-5.63,14,30,E;W;SE,Any tide\n\
             Tarifa,Valdevaqueros,36.06,-5.68,14,28,E,\"Mid to high, watch rocks\"\n\
             Algarve,Lagoa,37.13,-8.45,12,25,N;NW,\n"
        );

        let spots = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(spots.len(), 3);
        assert_eq!(spots[0].name, "Los Lances");
        assert_eq!(spots[1].name, "Valdevaqueros");
        assert_eq!(spots[2].region, "Algarve");
        assert_eq!(spots[0].min_knots, 14);
        assert_eq!(spots[0].max_knots, 30);
        assert_eq!(spots[0].latitude, 36.03);
        assert_eq!(
            spots[0].best_directions,
            [Octant::E, Octant::W, Octant::SE].into_iter().collect()
        );
        assert_eq!(spots[1].tide_notes, "Mid to high, watch rocks");
        assert_eq!(spots[2].tide_notes, "");
    }

    #[test]
    fn test_bad_number_fails() {
        let csv = format!("{HEADER}Tarifa,Los Lances,36.03,-5.63,fourteen,30,E,\n");
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Csv(_)), "got {err:?}");
    }

    #[test]
    fn test_unknown_direction_fails_with_line() {
        let csv = format!(
            "{HEADER}\
             Tarifa,Los Lances,36.03,-5.63,14,30,E,\n\
             Tarifa,Balneario,36.01,-5.61,14,30,E;ENE,\n"
        );
        let err = from_reader(csv.as_bytes()).unwrap_err();
        match err {
            CatalogError::Direction { line, source } => {
                assert_eq!(line, 3);
                assert_eq!(source.0, "ENE");
            }
            other => panic!("expected direction error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_line_counts_blank_lines_and_quoted_newlines() {
        let csv = format!(
            "{HEADER}\n\
             Tarifa,Los Lances,36.03,-5.63,14,30,E,\"High tide:\nwatch the rocks\"\n\
             Tarifa,Balneario,36.01,-5.61,14,30,ENE,\n"
        );
        let err = from_reader(csv.as_bytes()).unwrap_err();
        match err {
            CatalogError::Direction { line, .. } => assert_eq!(line, 5),
            other => panic!("expected direction error, got {other:?}"),
        }
    }

    #[test]
    fn test_inverted_window_fails() {
        let csv = format!("{HEADER}Tarifa,Los Lances,36.03,-5.63,30,14,E,\n");
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Window {
                line: 2,
                min: 30,
                max: 14
            }
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{HEADER}Tarifa,Los Lances,36.03,-5.63,14,30,E,Any tide\n").unwrap();

        let spots = load(file.path()).unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].tide_notes, "Any tide");
    }

    #[test]
    fn test_missing_file() {
        let err = load("/nonexistent/spots.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/spots.csv"));
    }
}
