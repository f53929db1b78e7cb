//! The `type,path` manifest.
//!
//! A manifest drives load order when building and is produced as a
//! by-product of unpacking. There is no header row.

use std::fmt;

/// One `type,path` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ManifestRow {
    /// Codec name such as `rawfile` or `localize`
    pub type_name: String,
    /// Source-relative path
    pub path: String,
}

impl ManifestRow {
    pub fn new(type_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ManifestRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.type_name, self.path)
    }
}

/// An ordered list of manifest rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    rows: Vec<ManifestRow>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest text.
    ///
    /// All whitespace is removed from each line before splitting on the
    /// first comma. Blank lines and lines without a comma are skipped.
    pub fn parse(text: &str) -> Self {
        let rows = text
            .lines()
            .filter_map(|line| {
                let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
                let (type_name, path) = compact.split_once(',')?;
                Some(ManifestRow::new(type_name, path))
            })
            .collect();

        Self { rows }
    }

    #[inline]
    pub fn push(&mut self, row: ManifestRow) {
        self.rows.push(row);
    }

    #[inline]
    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestRow> {
        self.rows.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as manifest text, one row per line.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.type_name);
            out.push(',');
            out.push_str(&row.path);
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestRow;
    type IntoIter = std::slice::Iter<'a, ManifestRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_and_commaless_lines() {
        let manifest = Manifest::parse("rawfile,maps/mp/mod.gsc\n\n  \njunk\r\nlocalize,mod\n");

        assert_eq!(
            manifest.rows(),
            &[
                ManifestRow::new("rawfile", "maps/mp/mod.gsc"),
                ManifestRow::new("localize", "mod"),
            ]
        );
    }

    #[test]
    fn test_parse_strips_all_whitespace() {
        let manifest = Manifest::parse(" string table , mp/my table.csv \r\n");
        assert_eq!(manifest.rows(), &[ManifestRow::new("stringtable", "mp/mytable.csv")]);
    }

    #[test]
    fn test_parse_splits_on_first_comma() {
        let manifest = Manifest::parse("rawfile,a,b");
        assert_eq!(manifest.rows()[0].path, "a,b");
    }

    #[test]
    fn test_to_csv_round_trip() {
        let mut manifest = Manifest::new();
        manifest.push(ManifestRow::new("localize", "menu"));
        manifest.push(ManifestRow::new("rawfile", "maps/mp/mod.gsc"));

        let text = manifest.to_csv();
        assert_eq!(text, "localize,menu\nrawfile,maps/mp/mod.gsc\n");
        assert_eq!(Manifest::parse(&text), manifest);
    }
}
