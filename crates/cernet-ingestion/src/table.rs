//! In-memory interaction table.
//!
//! `source` and `target` are typed fields on every record; everything else a
//! database ships (scores, evidence, transcript ids…) rides along as ordered
//! optional text columns so it can be written back out untouched.

pub const SOURCE_COLUMN: &str = "source";
pub const TARGET_COLUMN: &str = "target";
pub const SOURCE_DB_COLUMN: &str = "source_db";

/// Cell values treated as missing, following the usual dataframe readers.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// One (source, target) interaction plus its extra columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub source: String,
    pub target: String,
    /// Aligned with [`RecordSet::columns`].
    pub fields: Vec<Option<String>>,
}

impl InteractionRecord {
    pub fn edge(&self) -> (&str, &str) {
        (&self.source, &self.target)
    }
}

/// An ordered set of interaction records sharing one column layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    records: Vec<InteractionRecord>,
}

impl RecordSet {
    /// Empty set with the given extra columns (excluding `source`/`target`).
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, records: Vec::new() }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<InteractionRecord>) {
        (self.columns, self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record; short rows are padded with nulls.
    pub fn push(&mut self, mut record: InteractionRecord) {
        record.fields.resize(self.columns.len(), None);
        self.records.push(record);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == SOURCE_COLUMN || name == TARGET_COLUMN || self.column_index(name).is_some()
    }

    /// Output header: `source`, `target`, then the extra columns.
    pub fn header(&self) -> Vec<&str> {
        let mut header = vec![SOURCE_COLUMN, TARGET_COLUMN];
        header.extend(self.columns.iter().map(String::as_str));
        header
    }

    /// Value of a named column for a record of this set.
    pub fn value<'a>(&self, record: &'a InteractionRecord, column: &str) -> Option<&'a str> {
        match column {
            SOURCE_COLUMN => Some(record.source.as_str()),
            TARGET_COLUMN => Some(record.target.as_str()),
            _ => {
                let idx = self.column_index(column)?;
                record.fields.get(idx).and_then(|v| v.as_deref())
            }
        }
    }

    /// Set a column on every record, appending it if it does not exist yet.
    pub fn with_column<F>(mut self, name: &str, mut value: F) -> Self
    where
        F: FnMut(&InteractionRecord) -> Option<String>,
    {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                self.columns.len() - 1
            }
        };
        let width = self.columns.len();
        for record in &mut self.records {
            let v = value(record);
            record.fields.resize(width, None);
            record.fields[idx] = v;
        }
        self
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&InteractionRecord) -> bool,
    {
        self.records.retain(keep);
    }

    pub fn records_mut(&mut self) -> &mut [InteractionRecord] {
        &mut self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(s: &str, t: &str, fields: &[Option<&str>]) -> InteractionRecord {
        InteractionRecord {
            source: s.to_string(),
            target: t.to_string(),
            fields: fields.iter().map(|f| f.map(str::to_string)).collect(),
        }
    }

    #[test]
    fn test_missing_tokens() {
        assert!(is_missing(""));
        assert!(is_missing("NA"));
        assert!(is_missing("NaN"));
        assert!(!is_missing("0"));
        assert!(!is_missing("na_gene"));
    }

    #[test]
    fn test_value_lookup() {
        let mut set = RecordSet::new(vec!["score".into()]);
        set.push(rec("miR-21", "PTEN", &[Some("0.9")]));
        let r = &set.records()[0];
        assert_eq!(set.value(r, "source"), Some("miR-21"));
        assert_eq!(set.value(r, "score"), Some("0.9"));
        assert_eq!(set.value(r, "absent"), None);
        assert_eq!(set.header(), vec!["source", "target", "score"]);
    }

    #[test]
    fn test_with_column_appends_and_overwrites() {
        let mut set = RecordSet::new(vec![]);
        set.push(rec("a", "b", &[]));
        let set = set.with_column("source_db", |_| Some("x".into()));
        assert_eq!(set.columns(), &["source_db".to_string()]);
        let set = set.with_column("source_db", |_| Some("y".into()));
        assert_eq!(set.columns().len(), 1);
        assert_eq!(set.value(&set.records()[0], "source_db"), Some("y"));
    }

    #[test]
    fn test_push_pads_short_rows() {
        let mut set = RecordSet::new(vec!["a".into(), "b".into()]);
        set.push(rec("x", "y", &[Some("1")]));
        assert_eq!(set.records()[0].fields, vec![Some("1".to_string()), None]);
    }
}
