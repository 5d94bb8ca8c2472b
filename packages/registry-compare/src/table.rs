//! Side-by-side comparison table and its CSV export.

use std::io;
use std::path::{Path, PathBuf};

use registry_common::Siren;
use serde::Serialize;
use serde_json::Value;

use crate::flatten::{compare, flatten, ComparisonRow};

pub const CSV_HEADER: [&str; 3] = ["champ", "legalmap", "pappers"];

/// Default export file name for `siren`.
pub fn default_csv_path(siren: &Siren) -> PathBuf {
    PathBuf::from(format!("comparaison_{siren}.csv"))
}

/// One row per flattened key of either payload, LegalMap on the left.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComparisonTable {
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn from_payloads(legalmap: &Value, pappers: &Value) -> Self {
        Self {
            rows: compare(&flatten(legalmap), &flatten(pappers)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where both sources show the same value.
    pub fn matching(&self) -> usize {
        self.rows.iter().filter(|row| row.is_match()).count()
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(CSV_HEADER)?;
        for row in &self.rows {
            csv.write_record([row.key.clone(), row.left_display(), row.right_display()])?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> csv::Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn save_csv(&self, path: &Path) -> csv::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_header_and_rows() {
        let table = ComparisonTable::from_payloads(
            &json!({"siren": "552100554", "nom": "EXAMPLE, SA"}),
            &json!({"siren": "552100554", "capital": 1000}),
        );

        let csv = table.to_csv_string().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "champ,legalmap,pappers");
        assert_eq!(lines[1], "capital,,1000");
        assert_eq!(lines[2], "nom,\"EXAMPLE, SA\",");
        assert_eq!(lines[3], "siren,552100554,552100554");
        assert_eq!(lines.len(), 4);
        assert_eq!(table.matching(), 1);
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let table = ComparisonTable::from_payloads(&json!({}), &json!({}));
        assert!(table.is_empty());
        assert_eq!(table.to_csv_string().unwrap(), "champ,legalmap,pappers\n");
    }

    #[test]
    fn test_default_csv_path() {
        let siren = Siren::parse("552100554").unwrap();
        assert_eq!(default_csv_path(&siren), PathBuf::from("comparaison_552100554.csv"));
    }
}
