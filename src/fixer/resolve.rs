//! Symbol resolution and edit generation for one translation unit

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::edit::Replacement;
use crate::fixer::includes::{
    ExistingInclude, header_matches, insertion_offset, minimize_spelling, normalize_spelling,
    scan_includes,
};
use crate::index::SymbolIndexManager;
use crate::symbol::{SymbolInfo, UnresolvedSymbol};

/// Options controlling edit generation
#[derive(Debug, Clone, Default)]
pub struct FixerOptions {
    /// Strip configured search-path prefixes from inserted headers
    pub minimize_paths: bool,

    /// Include search paths used for minimization
    pub include_paths: Vec<PathBuf>,
}

/// An occurrence that produced no edit, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSymbol {
    pub name: String,
    pub offset: usize,
    /// Headers still in contention; empty when nothing matched at all
    pub candidate_headers: Vec<String>,
}

/// Everything the driver produced for one translation unit
#[derive(Debug)]
pub struct FixerResult {
    /// Main file of the unit
    pub file: PathBuf,

    /// Deduplicated headers chosen for insertion, in insertion order
    pub headers: BTreeSet<String>,

    /// Header insertion plus qualification replacements
    pub replacements: Vec<Replacement>,

    /// Occurrences with several equally plausible headers; never edited
    pub ambiguous: Vec<SkippedSymbol>,

    /// Occurrences no registered index knows; never edited
    pub unmatched: Vec<SkippedSymbol>,
}

impl FixerResult {
    pub fn has_edits(&self) -> bool {
        !self.replacements.is_empty()
    }
}

enum Selection {
    Picked(SymbolInfo),
    Tie(Vec<SymbolInfo>),
}

/// Resolution driver: maps unresolved occurrences to header insertions
///
/// Borrows the run's index manager; one driver serves any number of
/// translation units since it keeps no per-unit state.
pub struct IncludeFixer<'a> {
    index: &'a SymbolIndexManager,
    options: FixerOptions,
}

impl<'a> IncludeFixer<'a> {
    pub fn new(index: &'a SymbolIndexManager, options: FixerOptions) -> Self {
        Self { index, options }
    }

    /// Resolve every signal of one unit and build its edit set
    ///
    /// `code` is the unit's current content (the real file in batch runs, the
    /// substituted buffer in editor runs); offsets in `signals` must be valid
    /// for it.
    pub fn fix_translation_unit(
        &self,
        file: &Path,
        code: &str,
        signals: &[UnresolvedSymbol],
    ) -> FixerResult {
        let existing = scan_includes(code);

        let mut headers = BTreeSet::new();
        let mut replacements = Vec::new();
        let mut qualified_offsets = HashSet::new();
        let mut ambiguous = Vec::new();
        let mut unmatched = Vec::new();

        for signal in signals {
            let candidates = self.index.query(&signal.name);
            if candidates.is_empty() {
                debug!("No header known for '{}'", signal.name);
                unmatched.push(SkippedSymbol {
                    name: signal.name.clone(),
                    offset: signal.offset,
                    candidate_headers: Vec::new(),
                });
                continue;
            }

            let candidates = filter_by_arity(candidates, signal.template_args);
            let record = match select_candidate(candidates, &existing) {
                Selection::Picked(record) => record,
                Selection::Tie(tied) => {
                    debug!(
                        "'{}' is ambiguous between {} headers, not inserting",
                        signal.name,
                        tied.len()
                    );
                    ambiguous.push(SkippedSymbol {
                        name: signal.name.clone(),
                        offset: signal.offset,
                        candidate_headers: tied.into_iter().map(|r| r.header).collect(),
                    });
                    continue;
                }
            };

            if let Some(replacement) = self.qualification_edit(file, code, signal, &record)
                && qualified_offsets.insert(signal.offset)
            {
                replacements.push(replacement);
            }

            for header in std::iter::once(&record.header).chain(record.companion_headers.iter()) {
                let spelling = normalize_spelling(header);
                let already_included = existing
                    .iter()
                    .any(|inc| header_matches(&inc.spelling, &spelling));
                if !already_included {
                    let spelling = if self.options.minimize_paths {
                        minimize_spelling(&spelling, &self.options.include_paths)
                    } else {
                        spelling
                    };
                    debug!("Resolved '{}' to {}", signal.name, spelling);
                    headers.insert(spelling);
                }
            }
        }

        if !headers.is_empty() {
            let text: String = headers.iter().map(|h| format!("#include {h}\n")).collect();
            replacements.push(Replacement::insertion(file, insertion_offset(code), text));
        }

        FixerResult {
            file: file.to_path_buf(),
            headers,
            replacements,
            ambiguous,
            unmatched,
        }
    }

    /// Replacement rewriting the use site to the record's qualified spelling
    fn qualification_edit(
        &self,
        file: &Path,
        code: &str,
        signal: &UnresolvedSymbol,
        record: &SymbolInfo,
    ) -> Option<Replacement> {
        if signal.length == 0 {
            return None;
        }
        let qualified = record.qualified_name.as_deref()?;
        let spelled = code.get(signal.offset..signal.offset + signal.length)?;
        if spelled == qualified {
            return None;
        }
        Some(Replacement::new(
            file,
            signal.offset,
            signal.length,
            qualified.to_string(),
        ))
    }
}

/// Narrow candidates by a template-arity hint
///
/// A hint matching no record is disregarded: hints only filter using
/// information the records carry, they never turn a known symbol into a miss.
fn filter_by_arity(candidates: Vec<SymbolInfo>, hint: Option<u32>) -> Vec<SymbolInfo> {
    let Some(arity) = hint else {
        return candidates;
    };
    let matching: Vec<SymbolInfo> = candidates
        .iter()
        .filter(|r| r.template_arity == arity)
        .cloned()
        .collect();
    if matching.is_empty() {
        candidates
    } else {
        matching
    }
}

/// Disambiguation policy over candidates with distinct headers
///
/// Locality first: a header the unit already includes wins. Otherwise the
/// strictly highest priority wins. A strict tie picks nothing; the tool never
/// guesses among equally plausible headers.
fn select_candidate(candidates: Vec<SymbolInfo>, existing: &[ExistingInclude]) -> Selection {
    if candidates.len() == 1 {
        let mut candidates = candidates;
        return Selection::Picked(candidates.remove(0));
    }

    if let Some(local) = candidates.iter().find(|r| {
        let spelling = normalize_spelling(&r.header);
        existing
            .iter()
            .any(|inc| header_matches(&inc.spelling, &spelling))
    }) {
        return Selection::Picked(local.clone());
    }

    // Candidates arrive ordered by descending priority.
    let top_priority = candidates[0].priority;
    if candidates[1].priority == top_priority {
        let tied: Vec<SymbolInfo> = candidates
            .into_iter()
            .take_while(|r| r.priority == top_priority)
            .collect();
        return Selection::Tie(tied);
    }

    let mut candidates = candidates;
    Selection::Picked(candidates.remove(0))
}
