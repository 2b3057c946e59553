//! Sections: named, homogeneous lists of entries

use serde_yaml::Value;

use crate::model::dates::ValidationContext;
use crate::model::entry::{
    has_signature, match_entry, signature_matches, validate_entry_as, Entry, EntryKind,
};
use crate::model::error::{describe, FieldPath, ValidationIssue};
use crate::model::fields::{Fields, Issues};

/// Words kept lower-case inside generated titles
const SMALL_WORDS: [&str; 11] = [
    "a", "an", "and", "for", "in", "of", "on", "the", "to", "with", "or",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Key under `cv.sections`
    pub key: String,
    pub title: String,
    pub entry_kind: EntryKind,
    pub entries: Vec<Entry>,
    /// Link label override for publication and normal entries
    pub link_text: Option<String>,
}

/// `work_experience` -> `Work Experience`; keys with capitals or spaces are kept
pub fn section_title(key: &str) -> String {
    if key.chars().any(|c| c.is_uppercase() || c == ' ') {
        return key.to_string();
    }

    key.split('_')
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && SMALL_WORDS.contains(&word) {
                word.to_string()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Section {
    /// Build one section, appending every problem to `issues`
    ///
    /// Field problems are collected for all entries, but the first entry of
    /// the wrong variant stops the section.
    pub(crate) fn read(
        key: &str,
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
        issues: &mut Issues,
    ) -> Option<Section> {
        let before = issues.len();
        let (declared, raw_entries, entries_path, link_text) = match value {
            Value::Sequence(items) => (None, items.as_slice(), path.clone(), None),
            Value::Mapping(map) => {
                let fields = Fields::new(map, path.clone());
                fields.reject_unknown(&["entry_type", "entries", "link_text"], issues);
                let declared = fields.required_text("entry_type", issues).and_then(|name| {
                    let kind = EntryKind::from_name(&name);
                    if kind.is_none() {
                        let names: Vec<&str> = EntryKind::ALL.iter().map(|k| k.name()).collect();
                        issues.push(ValidationIssue::field(
                            path.key("entry_type"),
                            format!("\"{}\"", name),
                            format!("unknown entry type; expected one of {}", names.join(", ")),
                        ));
                    }
                    kind
                });
                if !fields.has("entries") {
                    issues.push(ValidationIssue::field(
                        path.key("entries"),
                        "nothing",
                        "this field is required",
                    ));
                }
                let entries = fields.sequence("entries", issues).unwrap_or_default();
                let link_text = fields.text("link_text", issues);
                if issues.len() > before {
                    return None;
                }
                (declared, entries, path.key("entries"), link_text)
            }
            other => {
                issues.push(ValidationIssue::field(
                    path.clone(),
                    describe(other),
                    "expected a list of entries or a mapping with entry_type and entries",
                ));
                return None;
            }
        };

        let Some(first) = raw_entries.first() else {
            issues.push(ValidationIssue::field(
                entries_path,
                "an empty list",
                "a section needs at least one entry",
            ));
            return None;
        };

        let mut entries = Vec::with_capacity(raw_entries.len());
        let kind = match declared {
            Some(kind) => kind,
            None => match match_entry(first, &entries_path.index(0), ctx) {
                Ok(entry) => {
                    let kind = entry.kind();
                    entries.push(entry);
                    kind
                }
                Err(found) => {
                    issues.extend(found);
                    // A shape that fits one variant still lets the rest be checked
                    match signature_matches(first).as_slice() {
                        [kind] => *kind,
                        _ => return None,
                    }
                }
            },
        };
        let start = if declared.is_some() { 0 } else { 1 };

        for (index, raw) in raw_entries.iter().enumerate().skip(start) {
            let entry_path = entries_path.index(index);
            if !has_signature(kind, raw) {
                issues.push(ValidationIssue::structural(
                    entry_path,
                    vec![kind.name().to_string()],
                    format!(
                        "section holds {} items but entry {} does not have that shape",
                        kind, index
                    ),
                ));
                return None;
            }
            match validate_entry_as(kind, raw, &entry_path, ctx) {
                Ok(entry) => entries.push(entry),
                Err(found) => issues.extend(found),
            }
        }

        if issues.len() > before {
            return None;
        }

        log::debug!("section '{}': {} {} item(s)", key, entries.len(), kind);
        Some(Section {
            key: key.to_string(),
            title: section_title(key),
            entry_kind: kind,
            entries,
            link_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use chrono::NaiveDate;

    fn read(key: &str, yaml: &str) -> (Option<Section>, Issues) {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let ctx = ValidationContext::new(
            Locale::default(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        let path = FieldPath::from_keys(&["cv", "sections", key]);
        let mut issues = Vec::new();
        let section = Section::read(key, &value, &path, &ctx, &mut issues);
        (section, issues)
    }

    #[test]
    fn test_titles() {
        assert_eq!(section_title("work_experience"), "Work Experience");
        assert_eq!(section_title("education"), "Education");
        assert_eq!(section_title("skills_and_tools"), "Skills and Tools");
        assert_eq!(section_title("the_end"), "The End");
        assert_eq!(section_title("Selected Work"), "Selected Work");
        assert_eq!(section_title("myPapers"), "myPapers");
    }

    #[test]
    fn test_inferred_section() {
        let (section, issues) = read(
            "experience",
            "- company: A\n  position: Dev\n- company: B\n  position: Lead\n",
        );
        assert!(issues.is_empty(), "{issues:?}");
        let section = section.unwrap();
        assert_eq!(section.entry_kind, EntryKind::Experience);
        assert_eq!(section.entries.len(), 2);
        assert_eq!(section.title, "Experience");
    }

    #[test]
    fn test_mixed_section_reports_first_mismatch() {
        let (section, issues) = read(
            "mixed",
            "- company: A\n  position: Dev\n- company: B\n  position: Lead\n- label: x\n  details: y\n- just text\n",
        );
        assert!(section.is_none());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_structural());
        assert_eq!(issues[0].path().to_string(), "cv.sections.mixed[2]");
    }

    #[test]
    fn test_declared_section() {
        let (section, issues) = read(
            "talks",
            "entry_type: NormalEntry\nlink_text: slides\nentries:\n  - name: RustConf\n",
        );
        assert!(issues.is_empty(), "{issues:?}");
        let section = section.unwrap();
        assert_eq!(section.entry_kind, EntryKind::Normal);
        assert_eq!(section.link_text.as_deref(), Some("slides"));
    }

    #[test]
    fn test_declared_section_rejects_other_shapes_at_index_zero() {
        let (_, issues) = read(
            "talks",
            "entry_type: OneLineEntry\nentries:\n  - name: RustConf\n",
        );
        assert_eq!(issues[0].path().to_string(), "cv.sections.talks.entries[0]");
    }

    #[test]
    fn test_unknown_entry_type() {
        let (_, issues) = read("x", "entry_type: BulletEntry\nentries: [a]\n");
        assert_eq!(issues[0].path().to_string(), "cv.sections.x.entry_type");
    }

    #[test]
    fn test_empty_section() {
        let (_, issues) = read("x", "[]");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_field_errors_in_several_entries_are_all_kept() {
        let (_, issues) = read(
            "x",
            "- company: A\n  position: Dev\n  start_date: bad\n- company: B\n  position: Dev\n  end_date: worse\n",
        );
        assert_eq!(issues.len(), 2);
    }
}
