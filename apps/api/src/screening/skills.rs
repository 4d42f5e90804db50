//! Skill vocabulary and the canonical token form shared by resume extraction
//! and job profiles. Overlap scoring compares these tokens by exact equality.

use std::collections::BTreeSet;

/// Known skill tokens, already canonical.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "go",
    "sql",
    "nosql",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "linux",
    "git",
    "html",
    "css",
    "react",
    "angular",
    "node",
    "fastapi",
    "django",
    "flask",
    "pandas",
    "numpy",
    "spark",
    "hadoop",
    "machine learning",
    "deep learning",
    "nlp",
    "data analysis",
    "data engineering",
    "scala",
    "rust",
    "php",
    "ruby",
];

/// Spelling variants folded onto a vocabulary term.
const SKILL_ALIASES: &[(&str, &str)] = &[
    ("golang", "go"),
    ("k8s", "kubernetes"),
    ("postgres", "postgresql"),
    ("node.js", "node"),
    ("nodejs", "node"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("amazon web services", "aws"),
    ("google cloud", "gcp"),
    ("natural language processing", "nlp"),
    ("ml", "machine learning"),
    ("pyspark", "spark"),
];

/// Canonical form of a skill token: trimmed, lower-cased, inner whitespace
/// collapsed, aliases folded. Returns `None` for blank input.
pub fn canonical_skill(raw: &str) -> Option<String> {
    let lowered = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let canonical = SKILL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, term)| term.to_string())
        .unwrap_or(lowered);
    Some(canonical)
}

/// Canonicalizes a list of skills into a de-duplicated set.
pub fn canonical_skill_set<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .filter_map(|s| canonical_skill(s.as_ref()))
        .collect()
}

/// Vocabulary terms (and aliases, folded) that occur in `text` on word boundaries.
pub fn find_skills(text: &str) -> BTreeSet<String> {
    let haystack = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut found = BTreeSet::new();
    for term in SKILL_VOCABULARY {
        if contains_term(&haystack, term) {
            found.insert(term.to_string());
        }
    }
    for (alias, term) in SKILL_ALIASES {
        if contains_term(&haystack, alias) {
            found.insert(term.to_string());
        }
    }
    found
}

/// True when `term` occurs with no alphanumeric character directly on either side.
/// `java` is not found in `javascript`, `sql` is not found in `mysql`.
pub(crate) fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_term_continuation(c, term));
        before_ok && after_ok
    })
}

/// A following `+`/`#` extends a language name (`c` → `c++`); otherwise only
/// alphanumerics continue a word.
fn is_term_continuation(c: char, term: &str) -> bool {
    c.is_alphanumeric() || ((c == '+' || c == '#') && !term.ends_with(|t: char| t == '+' || t == '#'))
}
