//! Resume Field Extractor: turns normalized resume text into a `ParsedResume`.
//!
//! Pure-Rust, regex + vocabulary based, no LLM call. Never fails on text input:
//! anything it cannot find stays `None` / empty.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::screening::normalizer::normalize_text;
use crate::screening::skills::{contains_term, find_skills};

/// Experience claims above this are treated as noise (e.g. a year mistaken for a count).
const MAX_PLAUSIBLE_YEARS: f64 = 70.0;
const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_NAME_WORDS: usize = 5;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"\+?\(?\d[\d ().-]{6,}\d").unwrap();
    static ref YEARS_OF_EXPERIENCE_RE: Regex = Regex::new(
        r"(?i)\b(\d{1,2}(?:\.\d+)?)[ \t]*\+?[ \t]*(?:years?|yrs?)\.?(?:[ \t]+of)?(?:[ \t]+(?:professional|relevant|industry|hands-on|work|total))?[ \t]+experience"
    )
    .unwrap();
    static ref EXPERIENCE_LABEL_RE: Regex =
        Regex::new(r"(?i)experience[ \t]*(?::|-|of)?[ \t]*(\d{1,2}(?:\.\d+)?)[ \t]*\+?[ \t]*(?:years?|yrs?)\b")
            .unwrap();
    static ref YEAR_RE: Regex = Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap();
    static ref DIGIT_GROUP_RE: Regex = Regex::new(r"\d+").unwrap();
    static ref SEGMENT_SPLIT_RE: Regex = Regex::new(r"\s*(?:[,|;]|\s-\s|\s–\s|\s—\s|\sat\s)\s*").unwrap();
}

const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor",
    "master of",
    "master's",
    "masters",
    "phd",
    "ph.d",
    "doctorate",
    "mba",
    "b.sc",
    "bsc",
    "b.s.",
    "m.sc",
    "msc",
    "m.s.",
    "b.a.",
    "m.a.",
    "b.tech",
    "m.tech",
    "b.e.",
    "associate degree",
];

/// Also job-title words ("Scrum Master"); only trusted inside an education section.
const WEAK_DEGREE_KEYWORDS: &[&str] = &["master", "diploma", "degree"];

const INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "academy",
    "school of",
    "polytechnic",
];

/// Header lines recognised as section starts, keyed by canonical section name.
const SECTION_HEADERS: &[(&str, &[&str])] = &[
    (
        "experience",
        &[
            "experience",
            "work experience",
            "employment",
            "employment history",
            "professional experience",
        ],
    ),
    (
        "education",
        &["education", "academic", "academics", "qualifications"],
    ),
    ("skills", &["skills", "technical skills", "core competencies"]),
    ("projects", &["projects", "notable projects"]),
];

const SUMMARY_SECTION: &str = "summary";

/// One education line, split as far as it could be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub year: Option<u16>,
    /// Source line, kept even when nothing could be split out.
    pub summary: String,
}

/// A labelled block of resume text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub name: String,
    pub body: String,
}

/// Structured candidate record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub candidate_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Canonical skill tokens (see `screening::skills`).
    pub skills: BTreeSet<String>,
    /// Maximum stated years of experience; `None` when nothing was stated.
    pub experience_years: Option<f64>,
    pub education_entries: Vec<EducationEntry>,
    pub sections: Vec<ResumeSection>,
    /// Original submission, retained for audit.
    pub raw_text: String,
}

/// Parses raw resume text into a `ParsedResume`.
pub fn parse_resume_text(raw_text: &str) -> ParsedResume {
    let normalized = normalize_text(raw_text);
    let sections = split_into_sections(&normalized);

    let education_entries = match sections.iter().find(|s| s.name == "education") {
        Some(section) => extract_education(&section.body),
        None => scan_education(&normalized, is_education_line_anywhere),
    };

    ParsedResume {
        candidate_name: infer_name(&normalized),
        contact_email: find_email(&normalized),
        contact_phone: find_phone(&normalized),
        skills: find_skills(&normalized),
        experience_years: estimate_experience_years(&normalized),
        education_entries,
        sections,
        raw_text: raw_text.to_string(),
    }
}

pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First phone-shaped span with a plausible digit count. A standalone year
/// (`2019`, `(2015 - 2019)`) next to a number is never part of it.
pub fn find_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .flat_map(|m| phone_spans(m.as_str()))
        .find(|span| {
            let digits = span.chars().filter(|c| c.is_ascii_digit()).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        })
        .map(String::from)
}

/// Splits a phone-shaped run wherever a whitespace separator touches a
/// year-like digit group.
fn phone_spans(candidate: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut span_start = 0;
    let mut previous: Option<(usize, &str)> = None;

    for group in DIGIT_GROUP_RE.find_iter(candidate) {
        if let Some((previous_end, previous_digits)) = previous {
            let separator = &candidate[previous_end..group.start()];
            if separator.contains(char::is_whitespace)
                && (is_year_group(previous_digits) || is_year_group(group.as_str()))
            {
                spans.push(&candidate[span_start..previous_end]);
                // Keep an opening `(` or `+` that belongs to the next number.
                let tail = separator.rfind(char::is_whitespace).map_or(0, |i| i + 1);
                span_start = previous_end + tail;
            }
        }
        previous = Some((group.end(), group.as_str()));
    }
    if let Some((end, _)) = previous {
        spans.push(&candidate[span_start..end]);
    }
    spans
}

fn is_year_group(digits: &str) -> bool {
    digits.len() == 4 && (digits.starts_with("19") || digits.starts_with("20"))
}

/// Largest "<n> years of experience" style claim in the text.
pub fn estimate_experience_years(text: &str) -> Option<f64> {
    YEARS_OF_EXPERIENCE_RE
        .captures_iter(text)
        .chain(EXPERIENCE_LABEL_RE.captures_iter(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .filter(|years| years.is_finite() && (0.0..=MAX_PLAUSIBLE_YEARS).contains(years))
        .fold(None, |max: Option<f64>, years| {
            Some(max.map_or(years, |m| m.max(years)))
        })
}

fn section_for_header(line: &str) -> Option<&'static str> {
    let normalized = line.trim().trim_end_matches(':').trim().to_lowercase();
    SECTION_HEADERS
        .iter()
        .find(|(_, headers)| headers.contains(&normalized.as_str()))
        .map(|(name, _)| *name)
}

/// Groups lines under the most recent recognised header. Text before the first
/// header lands in `summary`. Sections keep first-seen order.
pub fn split_into_sections(text: &str) -> Vec<ResumeSection> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    let mut current = SUMMARY_SECTION;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(name) = section_for_header(line) {
            current = name;
            if !sections.iter().any(|(n, _)| n == name) {
                sections.push((name.to_string(), Vec::new()));
            }
            continue;
        }
        match sections.iter().position(|(n, _)| n == current) {
            Some(idx) => sections[idx].1.push(line),
            None => sections.push((current.to_string(), vec![line])),
        }
    }

    sections
        .into_iter()
        .map(|(name, lines)| ResumeSection {
            name,
            body: lines.join("\n"),
        })
        .collect()
}

/// First short line that reads like a name rather than a header or contact detail.
fn infer_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .find(|line| {
            let lower = line.to_lowercase();
            !line.contains('@')
                && !line.chars().any(|c| c.is_ascii_digit())
                && section_for_header(line).is_none()
                && !lower.contains("resume")
                && !lower.contains("curriculum vitae")
                && line.split_whitespace().count() <= MAX_NAME_WORDS
        })
        .map(String::from)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| contains_term(haystack, n))
}

/// Line-oriented education scan of an education section, with best-effort
/// degree / institution / year split.
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    scan_education(text, is_education_line)
}

fn scan_education(text: &str, qualifies: fn(&str) -> bool) -> Vec<EducationEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| qualifies(&line.to_lowercase()))
        .map(parse_education_line)
        .collect()
}

fn is_education_line(lower: &str) -> bool {
    is_education_line_anywhere(lower) || contains_any(lower, WEAK_DEGREE_KEYWORDS)
}

/// Outside an education section a line needs an institution or an unambiguous degree.
fn is_education_line_anywhere(lower: &str) -> bool {
    contains_any(lower, DEGREE_KEYWORDS) || contains_any(lower, INSTITUTION_KEYWORDS)
}

fn parse_education_line(line: &str) -> EducationEntry {
    let year = YEAR_RE
        .find_iter(line)
        .filter_map(|m| m.as_str().parse::<u16>().ok())
        .max();

    let mut degree = None;
    let mut institution = None;
    for segment in SEGMENT_SPLIT_RE.split(line) {
        let cleaned = YEAR_RE.replace_all(segment, "");
        let cleaned = cleaned
            .trim()
            .trim_matches(|c: char| c == '(' || c == ')' || c == '-' || c == '–')
            .trim();
        if cleaned.is_empty() {
            continue;
        }
        let lower = cleaned.to_lowercase();
        if institution.is_none() && contains_any(&lower, INSTITUTION_KEYWORDS) {
            institution = Some(cleaned.to_string());
        } else if degree.is_none()
            && (contains_any(&lower, DEGREE_KEYWORDS) || contains_any(&lower, WEAK_DEGREE_KEYWORDS))
        {
            degree = Some(cleaned.to_string());
        }
    }

    EducationEntry {
        degree,
        institution,
        year,
        summary: line.to_string(),
    }
}
