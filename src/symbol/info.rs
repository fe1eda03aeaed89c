//! Symbol record as produced by an indexing run
//!
//! One record associates an unqualified identifier with the header that
//! declares it. Records are pure data; disambiguation between records is the
//! resolution driver's job.

use serde::{Deserialize, Serialize};

/// Kind of declaration a symbol record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SymbolKind {
    Function,
    Class,
    Enum,
    Variable,
    Macro,
    TypeAlias,
    #[default]
    Unknown,
}

/// A symbol-to-header association
///
/// `header` keeps the spelling the source should use (`"foo.h"` or
/// `<vector>`); bare spellings coming from user-supplied mappings are
/// normalized to quoted form before edits are generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Unqualified identifier
    pub name: String,

    /// Declaration kind
    #[serde(default)]
    pub kind: SymbolKind,

    /// Header that declares the symbol, as the source would spell it
    pub header: String,

    /// Headers that must be inserted together with `header`, for symbols
    /// usable only with several includes present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companion_headers: Vec<String>,

    /// Fully qualified spelling (e.g. `std::vector`), when the index knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,

    /// Quality score from the indexing run; higher wins disambiguation
    #[serde(default = "default_priority")]
    pub priority: u32,

    /// Number of template arguments the declaration takes
    #[serde(default)]
    pub template_arity: u32,
}

fn default_priority() -> u32 {
    1
}

impl SymbolInfo {
    /// Create a record with default kind, priority and arity
    pub fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Unknown,
            header: header.into(),
            companion_headers: Vec::new(),
            qualified_name: None,
            priority: 1,
            template_arity: 0,
        }
    }

    /// A record is eligible for insertion only with a non-empty name and
    /// non-empty header spellings
    pub fn is_eligible(&self) -> bool {
        !self.name.is_empty()
            && !self.header.is_empty()
            && self.companion_headers.iter().all(|h| !h.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let info = SymbolInfo::new("HashMap", "\"hash_map.h\"");
        assert_eq!(info.name, "HashMap");
        assert_eq!(info.header, "\"hash_map.h\"");
        assert_eq!(info.kind, SymbolKind::Unknown);
        assert_eq!(info.priority, 1);
        assert_eq!(info.template_arity, 0);
        assert!(info.qualified_name.is_none());
        assert!(info.is_eligible());
    }

    #[test]
    fn test_eligibility_requires_name_and_header() {
        assert!(!SymbolInfo::new("", "\"a.h\"").is_eligible());
        assert!(!SymbolInfo::new("foo", "").is_eligible());
    }

    #[test]
    fn test_yaml_record_full_fields() {
        let yaml = r#"
name: vector
kind: Class
header: "<vector>"
qualified_name: "std::vector"
priority: 42
template_arity: 2
"#;
        let info: SymbolInfo = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(info.kind, SymbolKind::Class);
        assert_eq!(info.header, "<vector>");
        assert_eq!(info.qualified_name.as_deref(), Some("std::vector"));
        assert_eq!(info.priority, 42);
        assert_eq!(info.template_arity, 2);
    }

    #[test]
    fn test_yaml_record_defaults() {
        let info: SymbolInfo = serde_yaml::from_str("name: foo\nheader: '\"foo.h\"'\n").unwrap();
        assert_eq!(info.kind, SymbolKind::Unknown);
        assert_eq!(info.priority, 1);
        assert_eq!(info.template_arity, 0);
    }
}
