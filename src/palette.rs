//! Extended (8-bit) to reduced (4-bit) palette downsampling

use crate::color::ColorName;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default mapping for the deployment planner's 8-bit markers
///
/// Purple (modify) and gray (no effect) both land on yellow; the reduced
/// palette has no slot left to tell them apart.
const DEFAULT_MAPPINGS: [(&str, ColorName); 4] = [
    ("[38;5;208m", ColorName::Red), // orange: create/delete
    ("[38;5;77m", ColorName::Green), // green: create
    ("[38;5;141m", ColorName::Yellow), // purple: modify
    ("[38;5;246m", ColorName::Yellow), // gray: no effect
];

/// One extended -> reduced substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub extended: String,
    pub reduced: String,
}

/// On-disk layout of a palette table file
#[derive(Debug, Default, Serialize, Deserialize)]
struct TableFile {
    #[serde(default)]
    mapping: Vec<Mapping>,
}

/// Validated, read-only substitution table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable {
    /// Entries in the order they were given
    mappings: Vec<Mapping>,
    /// Indices into `mappings`, longest extended fragment first
    by_length: Vec<usize>,
}

impl PaletteTable {
    /// Build a table, rejecting entries that would make substitution ambiguous
    pub fn new(mappings: Vec<Mapping>) -> Result<Self> {
        let mut seen = HashSet::new();
        for m in &mappings {
            if m.extended.is_empty() {
                return Err(Error::InvalidTable("empty extended code".into()));
            }
            if !seen.insert(m.extended.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "duplicate extended code '{}'",
                    m.extended.escape_debug()
                )));
            }
            if ColorName::from_fragment(&m.reduced).is_none() {
                return Err(Error::InvalidTable(format!(
                    "'{}' is not a reduced color code",
                    m.reduced.escape_debug()
                )));
            }
            if ColorName::from_fragment(&m.extended).is_some() {
                return Err(Error::InvalidTable(format!(
                    "'{}' is already a reduced color code",
                    m.extended.escape_debug()
                )));
            }
        }

        let mut by_length: Vec<usize> = (0..mappings.len()).collect();
        by_length.sort_by_key(|&i| std::cmp::Reverse(mappings[i].extended.len()));

        Ok(Self {
            mappings,
            by_length,
        })
    }

    /// Parse a table from TOML (`[[mapping]]` entries with `extended`/`reduced`)
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(s)?;
        Self::new(file.mapping)
    }

    /// Render the table back to TOML in entry order
    pub fn to_toml_string(&self) -> Result<String> {
        let file = TableFile {
            mapping: self.mappings.clone(),
        };
        Ok(toml::to_string(&file)?)
    }

    #[must_use]
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Longest extended code that `rest` starts with
    fn match_at(&self, rest: &[u8]) -> Option<&Mapping> {
        self.by_length
            .iter()
            .map(|&i| &self.mappings[i])
            .find(|m| rest.starts_with(m.extended.as_bytes()))
    }
}

impl Default for PaletteTable {
    fn default() -> Self {
        let mappings = DEFAULT_MAPPINGS
            .iter()
            .map(|&(extended, color)| Mapping {
                extended: extended.to_string(),
                reduced: color.fragment().to_string(),
            })
            .collect();
        Self::new(mappings).unwrap_or_else(|_| unreachable!("default palette table is valid"))
    }
}

/// Replace every extended code in `text` with its reduced code
///
/// Single left-to-right pass: replaced output is never scanned again, so one
/// rule can't feed another. Anything not in the table is copied byte for
/// byte, valid UTF-8 or not.
#[must_use]
pub fn downsample(text: &[u8], table: &PaletteTable) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut replaced = 0usize;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        if let Some(m) = table.match_at(rest) {
            out.extend_from_slice(m.reduced.as_bytes());
            pos += m.extended.len();
            replaced += 1;
        } else {
            out.push(rest[0]);
            pos += 1;
        }
    }

    log::debug!("downsampled {replaced} code(s)");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downsample_str(text: &str, table: &PaletteTable) -> String {
        String::from_utf8(downsample(text.as_bytes(), table)).unwrap()
    }

    fn mapping(extended: &str, reduced: &str) -> Mapping {
        Mapping {
            extended: extended.into(),
            reduced: reduced.into(),
        }
    }

    #[test]
    fn default_table_maps_orange_and_green() {
        let table = PaletteTable::default();
        assert_eq!(downsample_str("[38;5;208m[38;5;77m", &table), "[31m[32m");
    }

    #[test]
    fn modify_and_no_effect_both_become_yellow() {
        let table = PaletteTable::default();
        let out = downsample_str("\x1b[38;5;141m~ update\x1b[0m \x1b[38;5;246m  same\x1b[0m", &table);
        assert_eq!(out, "\x1b[33m~ update\x1b[0m \x1b[33m  same\x1b[0m");
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let table = PaletteTable::default();
        let text = "\x1b[38;5;77m+ a\x1b[0m\n\x1b[38;5;77m+ b\x1b[0m\n\x1b[38;5;208m- c\x1b[0m";
        let out = downsample_str(text, &table);
        assert_eq!(
            out,
            "\x1b[32m+ a\x1b[0m\n\x1b[32m+ b\x1b[0m\n\x1b[31m- c\x1b[0m"
        );
    }

    #[test]
    fn reduced_codes_pass_through() {
        let table = PaletteTable::default();
        let text = "\x1b[33mwarning\x1b[0m";
        assert_eq!(downsample_str(text, &table), text);
    }

    #[test]
    fn unknown_extended_codes_pass_through() {
        let table = PaletteTable::default();
        let text = "[38;5;99mx[48;5;208my";
        assert_eq!(downsample_str(text, &table), text);
    }

    #[test]
    fn downsample_is_idempotent_once_reduced() {
        let table = PaletteTable::default();
        let once = downsample_str("ä [38;5;208mé\n[38;5;246mü", &table);
        assert_eq!(downsample_str(&once, &table), once);
    }

    #[test]
    fn downsample_is_deterministic() {
        let table = PaletteTable::default();
        let text = "\x1b[38;5;208m- gone\x1b[0m \x1b[33mkept\x1b[0m [38;5;99mødd\n[38;5;77m+ 新しい";
        let first = downsample(text.as_bytes(), &table);
        let second = downsample(text.as_bytes(), &table);
        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            "\x1b[31m- gone\x1b[0m \x1b[33mkept\x1b[0m [38;5;99mødd\n[32m+ 新しい"
        );
    }

    #[test]
    fn invalid_utf8_bytes_pass_through() {
        let table = PaletteTable::default();
        let out = downsample(b"\x1b[38;5;208mcaf\xe9\x1b[0m", &table);
        assert_eq!(out, b"\x1b[31mcaf\xe9\x1b[0m");
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(downsample_str("", &PaletteTable::default()), "");
    }

    #[test]
    fn longest_code_wins() {
        let table = PaletteTable::new(vec![
            mapping("[38;5;2", "[31m"),
            mapping("[38;5;208m", "[32m"),
        ])
        .unwrap();
        assert_eq!(downsample_str("[38;5;208m", &table), "[32m");
        assert_eq!(downsample_str("[38;5;2m", &table), "[31mm");
    }

    #[test]
    fn table_rejects_non_reduced_target() {
        let err = PaletteTable::new(vec![mapping("[38;5;208m", "[38;5;1m")]).unwrap_err();
        assert!(matches!(err, Error::InvalidTable(_)));
    }

    #[test]
    fn table_rejects_reduced_code_as_source() {
        let err = PaletteTable::new(vec![mapping("[31m", "[33m")]).unwrap_err();
        assert!(matches!(err, Error::InvalidTable(_)));
    }

    #[test]
    fn table_rejects_duplicates_and_empty_codes() {
        let dup = PaletteTable::new(vec![
            mapping("[38;5;208m", "[31m"),
            mapping("[38;5;208m", "[32m"),
        ]);
        assert!(matches!(dup, Err(Error::InvalidTable(_))));

        let empty = PaletteTable::new(vec![mapping("", "[31m")]);
        assert!(matches!(empty, Err(Error::InvalidTable(_))));
    }

    #[test]
    fn toml_round_trip_keeps_order() {
        let table = PaletteTable::default();
        let parsed = PaletteTable::from_toml_str(&table.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn toml_table_is_parsed() {
        let table = PaletteTable::from_toml_str(
            r#"
            [[mapping]]
            extended = "[38;5;196m"
            reduced = "[31m"
            "#,
        )
        .unwrap();
        assert_eq!(table.mappings(), &[mapping("[38;5;196m", "[31m")]);
        assert_eq!(downsample_str("[38;5;196mx", &table), "[31mx");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = PaletteTable::from_toml_str("[[mapping]]\nextended = 3").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
