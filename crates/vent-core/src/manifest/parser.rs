//! Line parser for the sectioned key/value format.
//!
//! ```text
//! [section]
//! key = value
//! other: value
//!     continued on the next line
//! # comment
//! ; comment
//! ```

use super::ManifestError;

/// One parsed section, keys lowercased, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct RawSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl RawSection {
    fn set(&mut self, key: String, value: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }
}

pub(super) fn parse(input: &str) -> Result<Vec<RawSection>, ManifestError> {
    let mut sections: Vec<RawSection> = Vec::new();
    let mut current: Option<usize> = None;
    let mut last_key: Option<String> = None;

    for (index, raw_line) in input.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw_line.trim();

        if trimmed.is_empty() {
            last_key = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indented = raw_line.starts_with(' ') || raw_line.starts_with('\t');
        if indented {
            if let (Some(section), Some(key)) = (current, last_key.as_ref()) {
                let entry = sections[section]
                    .entries
                    .iter_mut()
                    .find(|(k, _)| k == key);
                if let Some((_, value)) = entry {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(trimmed);
                    continue;
                }
            }
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| ManifestError::Syntax {
                    line: line_no,
                    reason: "unterminated section header".to_string(),
                })?
                .trim();
            if name.is_empty() {
                return Err(ManifestError::Syntax {
                    line: line_no,
                    reason: "empty section name".to_string(),
                });
            }
            current = Some(match sections.iter().position(|s| s.name == name) {
                Some(existing) => existing,
                None => {
                    sections.push(RawSection {
                        name: name.to_string(),
                        entries: Vec::new(),
                    });
                    sections.len() - 1
                }
            });
            last_key = None;
            continue;
        }

        let Some(section) = current else {
            return Err(ManifestError::Syntax {
                line: line_no,
                reason: "option outside of any section".to_string(),
            });
        };

        let split_at = trimmed.find(['=', ':']);
        let (key, value) = match split_at {
            Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
            None => (trimmed, ""),
        };
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return Err(ManifestError::Syntax {
                line: line_no,
                reason: "empty option name".to_string(),
            });
        }
        sections[section].set(key.clone(), value.trim().to_string());
        last_key = Some(key);
    }

    Ok(sections)
}
