//! Include-directive scanning and header spelling transforms

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// An `#include` directive already present in a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingInclude {
    /// Header spelling with its delimiters, e.g. `"foo.h"` or `<vector>`
    pub spelling: String,
    /// Byte offset where the directive's line starts
    pub line_start: usize,
    /// Byte offset just past the directive's line, including its newline
    pub line_end: usize,
}

fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*("[^"\n]*"|<[^>\n]*>)"#)
            .expect("include regex must compile")
    })
}

/// Scan a buffer for `#include` directives, in source order
pub fn scan_includes(code: &str) -> Vec<ExistingInclude> {
    include_regex()
        .captures_iter(code)
        .map(|caps| {
            let whole = caps.get(0).expect("match has a whole-capture");
            let line_end = code[whole.end()..]
                .find('\n')
                .map(|i| whole.end() + i + 1)
                .unwrap_or(code.len());
            ExistingInclude {
                spelling: caps[1].to_string(),
                line_start: whole.start(),
                line_end,
            }
        })
        .collect()
}

/// Ensure a header spelling carries delimiters; bare paths become quoted
pub fn normalize_spelling(header: &str) -> String {
    let header = header.trim();
    let angled = header.starts_with('<') && header.ends_with('>');
    let quoted = header.starts_with('"') && header.ends_with('"');
    if angled || quoted {
        header.to_string()
    } else {
        format!("\"{header}\"")
    }
}

/// Path inside a spelling's delimiters
fn inner_path(spelling: &str) -> &str {
    spelling.trim_matches(|c| c == '"' || c == '<' || c == '>')
}

/// Whether an existing include satisfies a candidate header
///
/// The database may spell a header more verbosely than the source does (or
/// the other way around), so equal inner paths and `/`-suffix containment in
/// either direction both count.
pub fn header_matches(existing_spelling: &str, candidate_spelling: &str) -> bool {
    let existing = inner_path(existing_spelling);
    let candidate = inner_path(candidate_spelling);
    existing == candidate
        || existing
            .strip_suffix(candidate)
            .is_some_and(|rest| rest.ends_with('/'))
        || candidate
            .strip_suffix(existing)
            .is_some_and(|rest| rest.ends_with('/'))
}

/// Rewrite a spelling to its shortest form under the configured search paths
///
/// Strips the longest matching search-path prefix from the path inside the
/// delimiters. A spelling no search path applies to is returned unchanged;
/// minimization never drops a header.
pub fn minimize_spelling(spelling: &str, search_paths: &[PathBuf]) -> String {
    let inner = inner_path(spelling);

    let mut best: Option<&str> = None;
    for search_path in search_paths {
        let mut prefix = search_path.to_string_lossy().to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        if let Some(stripped) = inner.strip_prefix(&prefix)
            && !stripped.is_empty()
            && best.is_none_or(|b| stripped.len() < b.len())
        {
            best = Some(stripped);
        }
    }

    match best {
        Some(stripped) if spelling.starts_with('<') => format!("<{stripped}>"),
        Some(stripped) => format!("\"{stripped}\""),
        None => spelling.to_string(),
    }
}

/// Compute where new `#include` lines go
///
/// After the last existing include when the buffer has any; otherwise past
/// the leading comment block and `#pragma once` / include-guard prologue;
/// otherwise offset 0.
pub fn insertion_offset(code: &str) -> usize {
    if let Some(last) = scan_includes(code).last() {
        return last.line_end;
    }

    let mut offset = 0;
    let mut in_block_comment = false;
    let mut pending_guard: Option<usize> = None;

    let mut line_start = 0;
    for line in code.split_inclusive('\n') {
        let line_end = line_start + line.len();
        let trimmed = line.trim();

        if in_block_comment {
            if trimmed.ends_with("*/") {
                in_block_comment = false;
            }
            offset = line_end;
        } else if trimmed.is_empty() || trimmed.starts_with("//") {
            offset = line_end;
        } else if trimmed.starts_with("/*") {
            if !trimmed.ends_with("*/") {
                in_block_comment = true;
            }
            offset = line_end;
        } else if trimmed.starts_with("#pragma once") {
            offset = line_end;
        } else if pending_guard.is_none() && trimmed.starts_with("#ifndef ") {
            // Tentatively part of an include guard; confirmed by #define.
            pending_guard = Some(offset);
            offset = line_end;
        } else if pending_guard.is_some() && trimmed.starts_with("#define ") {
            pending_guard = None;
            offset = line_end;
        } else {
            // An #ifndef not followed by #define is ordinary code.
            if let Some(before_guard) = pending_guard {
                offset = before_guard;
            }
            break;
        }

        line_start = line_end;
    }

    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_includes_both_forms() {
        let code = "#include <vector>\n#include \"foo.h\"\nint x;\n";
        let includes = scan_includes(code);
        assert_eq!(includes.len(), 2);
        assert_eq!(includes[0].spelling, "<vector>");
        assert_eq!(includes[1].spelling, "\"foo.h\"");
        assert_eq!(includes[0].line_start, 0);
        assert_eq!(includes[0].line_end, 18);
    }

    #[test]
    fn test_scan_includes_tolerates_spacing() {
        let code = "  #  include   <map>\n";
        let includes = scan_includes(code);
        assert_eq!(includes.len(), 1);
        assert_eq!(includes[0].spelling, "<map>");
    }

    #[test]
    fn test_scan_includes_ignores_mentions_in_code() {
        let code = "int x; // #include \"fake.h\" in a comment is still matched?\n";
        // Only directives at line starts (modulo whitespace) count.
        assert!(scan_includes(code).is_empty());
    }

    #[test]
    fn test_normalize_spelling() {
        assert_eq!(normalize_spelling("foo.h"), "\"foo.h\"");
        assert_eq!(normalize_spelling(" foo.h "), "\"foo.h\"");
        assert_eq!(normalize_spelling("\"foo.h\""), "\"foo.h\"");
        assert_eq!(normalize_spelling("<vector>"), "<vector>");
    }

    #[test]
    fn test_header_matches() {
        assert!(header_matches("\"foo.h\"", "\"foo.h\""));
        assert!(header_matches("\"foo.h\"", "<foo.h>"));
        assert!(header_matches("\"lib/foo.h\"", "\"foo.h\""));
        assert!(header_matches("\"foo.h\"", "\"lib/foo.h\""));
        assert!(!header_matches("\"libfoo.h\"", "\"foo.h\""));
        assert!(!header_matches("\"foo.h\"", "\"bar.h\""));
    }

    #[test]
    fn test_minimize_spelling_strips_longest_prefix() {
        let search_paths = vec![PathBuf::from("/usr/include"), PathBuf::from("/usr")];
        assert_eq!(
            minimize_spelling("\"/usr/include/foo/bar.h\"", &search_paths),
            "\"foo/bar.h\""
        );
        assert_eq!(
            minimize_spelling("</usr/include/cstring>", &search_paths),
            "<cstring>"
        );
    }

    #[test]
    fn test_minimize_spelling_keeps_unmatched() {
        let search_paths = vec![PathBuf::from("/opt/sdk")];
        assert_eq!(minimize_spelling("\"foo.h\"", &search_paths), "\"foo.h\"");
        assert_eq!(minimize_spelling("<vector>", &[]), "<vector>");
    }

    #[test]
    fn test_insertion_after_last_include() {
        let code = "#include <vector>\n#include \"a.h\"\n\nint x;\n";
        assert_eq!(insertion_offset(code), 33);
        assert_eq!(&code[33..], "\nint x;\n");
    }

    #[test]
    fn test_insertion_at_top_of_plain_file() {
        assert_eq!(insertion_offset("int x;\n"), 0);
    }

    #[test]
    fn test_insertion_after_comment_block() {
        let code = "// Copyright\n// notice\n\nint x;\n";
        assert_eq!(insertion_offset(code), 24);
        assert_eq!(&code[24..], "int x;\n");
    }

    #[test]
    fn test_insertion_after_pragma_once() {
        let code = "/* header */\n#pragma once\n\nstruct S;\n";
        assert_eq!(insertion_offset(code), 27);
        assert_eq!(&code[27..], "struct S;\n");
    }

    #[test]
    fn test_insertion_after_include_guard() {
        let code = "#ifndef FOO_H\n#define FOO_H\n\nstruct S;\n#endif\n";
        assert_eq!(insertion_offset(code), 29);
        assert_eq!(&code[29..], "struct S;\n#endif\n");
    }

    #[test]
    fn test_ifndef_without_define_is_not_a_guard() {
        let code = "#ifndef NDEBUG\nint checks = 1;\n#endif\n";
        assert_eq!(insertion_offset(code), 0);
    }

    #[test]
    fn test_insertion_into_empty_buffer() {
        assert_eq!(insertion_offset(""), 0);
    }
}
