//! Parser for the profile-sectioned key/value files used by the AWS CLI.
//!
//! Both `~/.aws/credentials` and `~/.aws/config` are INI-like documents:
//!
//! ```text
//! [default]
//! aws_access_key_id = AKIA...
//! region = eu-west-1   # trailing comments are stripped
//!
//! [profile team-a]
//! region = us-east-2
//! s3 =
//!     max_concurrent_requests = 20
//! ```
//!
//! Indented properties under a key with an empty value are stored as dotted
//! keys (`s3.max_concurrent_requests`). Sections with the same name are merged.

use indexmap::IndexMap;
use thiserror::Error;

/// Errors raised while parsing an INI document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IniError {
    #[error("line {line}: property defined before any section header")]
    OrphanProperty { line: usize },

    #[error("line {line}: unterminated section header")]
    UnterminatedSection { line: usize },

    #[error("line {line}: empty section name")]
    EmptySection { line: usize },

    #[error("line {line}: expected 'key = value', found '{content}'")]
    InvalidLine { line: usize, content: String },

    #[error("line {line}: not valid UTF-8")]
    InvalidEncoding { line: usize },
}

/// Result type for INI parsing
pub type IniResult<T> = Result<T, IniError>;

/// Key/value pairs of one section, in file order
pub type Section = IndexMap<String, String>;

/// A parsed INI document keyed by section name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: IndexMap<String, Section>,
}

impl IniDocument {
    /// Parse an INI document from raw file contents
    pub fn parse_bytes(bytes: &[u8]) -> IniResult<Self> {
        let content = std::str::from_utf8(bytes).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            IniError::InvalidEncoding {
                line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            }
        })?;
        Self::parse(content)
    }

    /// Parse an INI document
    pub fn parse(content: &str) -> IniResult<Self> {
        // Skip a leading byte order mark
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut doc = Self::default();
        let mut current: Option<String> = None;
        // Key whose empty value opens a block of indented sub-properties
        let mut nest_parent: Option<String> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let indented = raw.starts_with(' ') || raw.starts_with('\t');

            if line.starts_with('[') {
                let header = strip_inline_comment(line);
                let inner = header
                    .strip_prefix('[')
                    .and_then(|h| h.strip_suffix(']'))
                    .ok_or(IniError::UnterminatedSection { line: line_no })?;

                // "profile   team-a" and "profile team-a" name the same section
                let name = inner.split_whitespace().collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    return Err(IniError::EmptySection { line: line_no });
                }

                doc.sections.entry(name.clone()).or_default();
                current = Some(name);
                nest_parent = None;
                continue;
            }

            let Some(section_name) = current.as_ref() else {
                return Err(IniError::OrphanProperty { line: line_no });
            };

            let (key, value) = line.split_once('=').ok_or_else(|| IniError::InvalidLine {
                line: line_no,
                content: line.to_string(),
            })?;

            let key = key.trim();
            if key.is_empty() {
                return Err(IniError::InvalidLine {
                    line: line_no,
                    content: line.to_string(),
                });
            }
            let value = strip_inline_comment(value).trim();

            let section = doc.sections.entry(section_name.clone()).or_default();

            let nested_key = match (&nest_parent, indented) {
                (Some(parent), true) => Some(format!("{}.{}", parent, key)),
                _ => None,
            };

            match nested_key {
                Some(nested) => {
                    section.insert(nested, value.to_string());
                }
                None => {
                    section.insert(key.to_string(), value.to_string());
                    nest_parent = value.is_empty().then(|| key.to_string());
                }
            }
        }

        Ok(doc)
    }

    /// Get a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Get a single value, ignoring empty values
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Check whether a section exists
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Section names in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Cut a trailing `#` or `;` comment that is preceded by whitespace
fn strip_inline_comment(value: &str) -> &str {
    let mut prev_ws = false;
    for (i, c) in value.char_indices() {
        if (c == '#' || c == ';') && prev_ws {
            return value[..i].trim_end();
        }
        prev_ws = c.is_whitespace();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_values() {
        let doc = IniDocument::parse(
            r#"
# credentials
[default]
aws_access_key_id = AKIADEFAULT
aws_secret_access_key=secret/with+chars=

[work]
aws_access_key_id = AKIAWORK
"#,
        )
        .unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("default", "aws_access_key_id"), Some("AKIADEFAULT"));
        assert_eq!(
            doc.get("default", "aws_secret_access_key"),
            Some("secret/with+chars=")
        );
        assert_eq!(doc.get("work", "aws_access_key_id"), Some("AKIAWORK"));
        assert_eq!(doc.get("work", "aws_secret_access_key"), None);
    }

    #[test]
    fn test_section_order_preserved() {
        let doc = IniDocument::parse("[zeta]\n[alpha]\n[default]\n").unwrap();
        let names: Vec<_> = doc.section_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "default"]);
    }

    #[test]
    fn test_profile_header_whitespace_normalized() {
        let doc = IniDocument::parse("[ profile   team-a ]\nregion = us-east-2\n").unwrap();
        assert_eq!(doc.get("profile team-a", "region"), Some("us-east-2"));
    }

    #[test]
    fn test_inline_comments() {
        let doc = IniDocument::parse(
            "[default] # main\nregion = eu-west-1 ; primary\nkey = a#b\n",
        )
        .unwrap();
        assert_eq!(doc.get("default", "region"), Some("eu-west-1"));
        assert_eq!(doc.get("default", "key"), Some("a#b"));
    }

    #[test]
    fn test_nested_properties() {
        let doc = IniDocument::parse(
            "[default]\ns3 =\n    max_concurrent_requests = 20\n    addressing_style = path\nregion = us-west-2\n",
        )
        .unwrap();
        assert_eq!(doc.get("default", "s3.max_concurrent_requests"), Some("20"));
        assert_eq!(doc.get("default", "s3.addressing_style"), Some("path"));
        assert_eq!(doc.get("default", "region"), Some("us-west-2"));
        assert_eq!(doc.get("default", "s3"), None);
    }

    #[test]
    fn test_duplicate_sections_merge() {
        let doc = IniDocument::parse("[a]\nx = 1\n[b]\n[a]\ny = 2\nx = 3\n").unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("a", "x"), Some("3"));
        assert_eq!(doc.get("a", "y"), Some("2"));
    }

    #[test]
    fn test_orphan_property_rejected() {
        let err = IniDocument::parse("region = us-east-1\n[default]\n").unwrap_err();
        assert_eq!(err, IniError::OrphanProperty { line: 1 });
    }

    #[test]
    fn test_unterminated_section_rejected() {
        let err = IniDocument::parse("[default]\nregion = x\n[broken\n").unwrap_err();
        assert_eq!(err, IniError::UnterminatedSection { line: 3 });
    }

    #[test]
    fn test_empty_section_rejected() {
        let err = IniDocument::parse("[  ]\n").unwrap_err();
        assert_eq!(err, IniError::EmptySection { line: 1 });
    }

    #[test]
    fn test_line_without_equals_rejected() {
        let err = IniDocument::parse("[default]\nnot a property\n").unwrap_err();
        assert!(matches!(err, IniError::InvalidLine { line: 2, .. }));
        assert!(err.to_string().contains("not a property"));
    }

    #[test]
    fn test_empty_document() {
        let doc = IniDocument::parse("\n; nothing here\n").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_byte_order_mark_skipped() {
        let doc = IniDocument::parse("\u{feff}[default]\nregion = eu-west-1\n").unwrap();
        assert_eq!(doc.get("default", "region"), Some("eu-west-1"));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = IniDocument::parse_bytes(b"[default]\nkey = AKIA\xff\xfe\n").unwrap_err();
        assert_eq!(err, IniError::InvalidEncoding { line: 2 });
    }
}
