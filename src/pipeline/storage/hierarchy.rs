//! Hierarchy tracking for structured legal texts.
//!
//! Senegalese codes nest Livre > Titre > Chapitre > Section > Article. A
//! chunk reading "l'employeur doit..." is meaningless without that path, so
//! the tracker follows the markers as the chunker scans forward and produces
//! a breadcrumb ("Livre I > Titre II > Chapitre 1") for any position.

use regex::Regex;

/// Hierarchy levels, most general first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HierarchyLevel {
    Livre,
    Titre,
    Chapitre,
    Section,
}

impl HierarchyLevel {
    pub const ALL: [HierarchyLevel; 4] = [
        HierarchyLevel::Livre,
        HierarchyLevel::Titre,
        HierarchyLevel::Chapitre,
        HierarchyLevel::Section,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HierarchyLevel::Livre => "Livre",
            HierarchyLevel::Titre => "Titre",
            HierarchyLevel::Chapitre => "Chapitre",
            HierarchyLevel::Section => "Section",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Detection patterns per level. A table type rather than inline regexes so
/// another jurisdiction's vocabulary can be plugged in without touching the
/// tracker's control flow.
pub struct HierarchyPatterns {
    patterns: Vec<(HierarchyLevel, Regex)>,
}

impl HierarchyPatterns {
    /// Patterns for Senegalese legal French: level keyword followed by a
    /// roman numeral, an ordinal word or a decimal number, at line start.
    pub fn senegal_legal() -> Self {
        let table = [
            (
                HierarchyLevel::Livre,
                r"(?im)^\s*livre\s+([ivxlcdm]+|premier|deuxi[eè]me|troisi[eè]me|quatri[eè]me|cinqui[eè]me|second|\d+)\b",
            ),
            (
                HierarchyLevel::Titre,
                r"(?im)^\s*titre\s+([ivxlcdm]+|premier|deuxi[eè]me|troisi[eè]me|pr[eé]liminaire|\d+)\b",
            ),
            (
                HierarchyLevel::Chapitre,
                r"(?im)^\s*chapitre\s+([ivxlcdm]+|premier|deuxi[eè]me|pr[eé]liminaire|\d+)\b",
            ),
            (
                HierarchyLevel::Section,
                r"(?im)^\s*section\s+([ivxlcdm]+|premi[eè]re|deuxi[eè]me|\d+)\b",
            ),
        ];

        Self {
            patterns: table
                .into_iter()
                .map(|(level, pattern)| {
                    (level, Regex::new(pattern).expect("static pattern is valid"))
                })
                .collect(),
        }
    }
}

impl Default for HierarchyPatterns {
    fn default() -> Self {
        Self::senegal_legal()
    }
}

/// Mutable hierarchy state, reset per document.
///
/// Invariant: setting a level clears every strictly lower level — a new Titre
/// never inherits a stale Chapitre from the previous one.
pub struct HierarchyTracker<'a> {
    patterns: &'a HierarchyPatterns,
    state: [Option<String>; 4],
}

impl<'a> HierarchyTracker<'a> {
    pub fn new(patterns: &'a HierarchyPatterns) -> Self {
        Self {
            patterns,
            state: [None, None, None, None],
        }
    }

    /// Forget everything (start of a new document).
    pub fn reset(&mut self) {
        self.state = [None, None, None, None];
    }

    /// Scan a text window for hierarchy markers and update the state.
    pub fn observe(&mut self, window: &str) {
        for (level, pattern) in &self.patterns.patterns {
            if let Some(caps) = pattern.captures(window) {
                let value = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                self.state[level.index()] = Some(format!("{} {}", level.label(), value));
                for lower in level.index() + 1..self.state.len() {
                    self.state[lower] = None;
                }
            }
        }
    }

    /// Current breadcrumb, most general level first; empty when nothing is set.
    pub fn breadcrumb(&self) -> String {
        self.state
            .iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
