//! Parser for the Landsat `*_MTL.txt` key/value format.
//!
//! ```text
//! GROUP = LANDSAT_METADATA_FILE
//!   GROUP = PRODUCT_CONTENTS
//!     FILE_NAME_BAND_1 = "LC08_..._B1.TIF"
//!   END_GROUP = PRODUCT_CONTENTS
//! END_GROUP = LANDSAT_METADATA_FILE
//! END
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::{LandregError, Result};

/// A single right-hand side of an MTL assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum MtlValue {
    /// A double-quoted string, quotes removed.
    Text(String),
    Number(f64),
    /// Any other bare token: dates, times, enumerations.
    Literal(String),
}

impl MtlValue {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            return MtlValue::Text(raw[1..raw.len() - 1].to_string());
        }
        match raw.parse::<f64>() {
            Ok(n) => MtlValue::Number(n),
            Err(_) => MtlValue::Literal(raw.to_string()),
        }
    }

    /// String form of text and literal values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MtlValue::Text(s) | MtlValue::Literal(s) => Some(s),
            MtlValue::Number(_) => None,
        }
    }

    /// Numeric value; quoted numbers are accepted too.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MtlValue::Number(n) => Some(*n),
            MtlValue::Text(s) | MtlValue::Literal(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MtlGroup {
    pub name: String,
    pub entries: Vec<(String, MtlValue)>,
    pub groups: Vec<MtlGroup>,
}

impl MtlGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn group(&self, name: &str) -> Option<&MtlGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn value(&self, key: &str) -> Option<&MtlValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Depth-first search for the first entry named `key`.
    pub fn find(&self, key: &str) -> Option<&MtlValue> {
        self.value(key)
            .or_else(|| self.groups.iter().find_map(|g| g.find(key)))
    }

    /// All entries of this group and its descendants, depth-first.
    pub fn walk(&self) -> Vec<(&str, &MtlValue)> {
        let mut out: Vec<(&str, &MtlValue)> =
            self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        for g in &self.groups {
            out.extend(g.walk());
        }
        out
    }
}

/// Parsed MTL file: an unnamed root holding the top-level groups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MtlDocument {
    pub root: MtlGroup,
}

impl MtlDocument {
    pub fn parse(text: &str) -> Result<Self> {
        let mut stack = vec![MtlGroup::new("")];
        let mut ended = false;

        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "END" {
                ended = true;
                break;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| LandregError::Metadata {
                line: line_no,
                message: format!("expected KEY = VALUE, got `{line}`"),
            })?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "GROUP" => stack.push(MtlGroup::new(value)),
                "END_GROUP" => {
                    if stack.len() < 2 {
                        return Err(LandregError::Metadata {
                            line: line_no,
                            message: format!("END_GROUP = {value} without matching GROUP"),
                        });
                    }
                    let closed = stack.pop().unwrap_or_default();
                    if closed.name != value {
                        return Err(LandregError::Metadata {
                            line: line_no,
                            message: format!(
                                "END_GROUP = {value} closes open group {}",
                                closed.name
                            ),
                        });
                    }
                    if let Some(parent) = stack.last_mut() {
                        parent.groups.push(closed);
                    }
                }
                _ => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .entries
                            .push((key.to_string(), MtlValue::parse(value)));
                    }
                }
            }
        }

        if stack.len() > 1 {
            let open = stack.last().map(|g| g.name.clone()).unwrap_or_default();
            return Err(LandregError::Metadata {
                line: text.lines().count(),
                message: format!("group {open} is never closed"),
            });
        }
        if !ended {
            debug!("MTL text has no END marker");
        }

        Ok(Self {
            root: stack.pop().unwrap_or_default(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Look up `GROUP/.../KEY` starting below the root.
    pub fn get(&self, path: &str) -> Option<&MtlValue> {
        let mut parts: Vec<&str> = path.split('/').collect();
        let key = parts.pop()?;
        let mut group = &self.root;
        for name in parts {
            group = group.group(name)?;
        }
        group.value(key)
    }

    /// First entry named `key` anywhere in the document.
    pub fn find(&self, key: &str) -> Option<&MtlValue> {
        self.root.find(key)
    }

    pub fn find_str(&self, key: &str) -> Option<&str> {
        self.find(key).and_then(MtlValue::as_str)
    }

    pub fn find_f64(&self, key: &str) -> Option<f64> {
        self.find(key).and_then(MtlValue::as_f64)
    }

    pub fn walk(&self) -> Vec<(&str, &MtlValue)> {
        self.root.walk()
    }
}
