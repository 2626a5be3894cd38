//! Sheet readers: where raw score tables come from.
//!
//! A workbook on disk is a directory of CSV exports, one file per sheet.
//! Sheets are enumerated in file-name order unless a `sheets.txt` manifest in
//! the directory lists the sheet names (one per line) in the desired order.

use crate::error::{Result, WondersError};
use crate::table::RawTable;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "sheets.txt";

/// Anything that can list sheets and hand back one sheet as a raw table.
pub trait SheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Result<Vec<String>>;

    fn read_sheet(&self, name: &str) -> Result<RawTable>;
}

/// A directory of `<sheet>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(WondersError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("workbook directory not found: {}", dir.display()),
            )));
        }
        Ok(CsvWorkbook { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }

    fn read_manifest(&self) -> Result<Option<Vec<String>>> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&path)?);
        let mut names = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let name = line.trim();
            if !name.is_empty() && !name.starts_with('#') {
                names.push(name.to_string());
            }
        }
        Ok(Some(names))
    }
}

impl SheetSource for CsvWorkbook {
    fn sheet_names(&self) -> Result<Vec<String>> {
        if let Some(names) = self.read_manifest()? {
            log::debug!("Using sheet order from {}", MANIFEST_FILE);
            return Ok(names);
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_sheet(&self, name: &str) -> Result<RawTable> {
        let file = File::open(self.sheet_path(name))?;
        RawTable::from_csv_reader(file)
    }
}

/// Sheets held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, RawTable)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, name: &str, table: RawTable) {
        self.sheets.push((name.to_string(), table));
    }

    pub fn with_sheet(mut self, name: &str, table: RawTable) -> Self {
        self.add_sheet(name, table);
        self
    }

    /// Add a sheet given as CSV text.
    pub fn add_csv(&mut self, name: &str, csv: &str) -> Result<()> {
        let table = RawTable::from_csv_reader(csv.as_bytes())?;
        self.add_sheet(name, table);
        Ok(())
    }
}

impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.sheets.iter().map(|(n, _)| n.clone()).collect())
    }

    fn read_sheet(&self, name: &str) -> Result<RawTable> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.clone())
            .ok_or_else(|| WondersError::NotFound {
                key: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SHEET: &str = "\
,alice,bob
Red,1,2
Coins,1,2
Wonders,1,2
Blue,1,2
Yellow,1,2
Purple,1,2
Green,1,2
";

    fn write_sheet(dir: &Path, name: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(SHEET.as_bytes()).unwrap();
    }

    #[test]
    fn test_csv_workbook_sheet_order() {
        let dir = tempfile::tempdir().unwrap();
        write_sheet(dir.path(), "2024-02-01.csv");
        write_sheet(dir.path(), "2024-01-15.csv");
        std::fs::write(dir.path().join("notes.txt"), "not a sheet").unwrap();

        let workbook = CsvWorkbook::open(dir.path()).unwrap();
        assert_eq!(workbook.sheet_names().unwrap(), vec!["2024-01-15", "2024-02-01"]);

        let table = workbook.read_sheet("2024-01-15").unwrap();
        assert_eq!(table.players, vec!["alice", "bob"]);
    }

    #[test]
    fn test_csv_workbook_manifest_order() {
        let dir = tempfile::tempdir().unwrap();
        write_sheet(dir.path(), "b.csv");
        write_sheet(dir.path(), "a.csv");
        std::fs::write(dir.path().join(MANIFEST_FILE), "# played order\nb\n\na\n").unwrap();

        let workbook = CsvWorkbook::open(dir.path()).unwrap();
        assert_eq!(workbook.sheet_names().unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_csv_workbook_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CsvWorkbook::open(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_memory_workbook() {
        let mut workbook = MemoryWorkbook::new();
        workbook.add_csv("Game 2", SHEET).unwrap();
        workbook.add_csv("Game 1", SHEET).unwrap();

        assert_eq!(workbook.sheet_names().unwrap(), vec!["Game 2", "Game 1"]);
        assert!(workbook.read_sheet("Game 1").is_ok());
        assert!(matches!(
            workbook.read_sheet("Game 3"),
            Err(WondersError::NotFound { .. })
        ));
    }
}
