//! Advisory content checks on a generated resume.
//!
//! The instruction template asks for quantified, action-led bullets and a 3-4
//! sentence summary; nothing enforces it. These checks report where the output
//! fell short. They never reject a document.

use serde::Serialize;

use crate::models::resume::ResumeDocument;

const MIN_BULLETS: usize = 3;
const MAX_BULLETS: usize = 5;
const MIN_SUMMARY_SENTENCES: usize = 3;
const MAX_SUMMARY_SENTENCES: usize = 4;

/// Openers that describe involvement instead of impact.
const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked",
    "assisted",
    "supported",
    "participated",
    "involved",
    "responsible",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityFinding {
    /// No number, percentage or currency amount in the bullet.
    UnquantifiedAchievement {
        entry: usize,
        bullet: usize,
        text: String,
    },
    /// Bullet does not open with a capitalized action verb.
    WeakOpening {
        entry: usize,
        bullet: usize,
        text: String,
    },
    BulletCount {
        entry: usize,
        company: String,
        count: usize,
    },
    SummaryLength { sentences: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub passed: bool,
    pub findings: Vec<QualityFinding>,
}

pub fn assess(doc: &ResumeDocument) -> QualityReport {
    let mut findings = Vec::new();

    let sentences = count_sentences(&doc.summary);
    if !(MIN_SUMMARY_SENTENCES..=MAX_SUMMARY_SENTENCES).contains(&sentences) {
        findings.push(QualityFinding::SummaryLength { sentences });
    }

    for (entry, job) in doc.experience.iter().enumerate() {
        let count = job.achievements.len();
        if !(MIN_BULLETS..=MAX_BULLETS).contains(&count) {
            findings.push(QualityFinding::BulletCount {
                entry,
                company: job.company.clone(),
                count,
            });
        }

        for (bullet, text) in job.achievements.iter().enumerate() {
            if !is_quantified(text) {
                findings.push(QualityFinding::UnquantifiedAchievement {
                    entry,
                    bullet,
                    text: text.clone(),
                });
            }
            if !opens_with_action(text) {
                findings.push(QualityFinding::WeakOpening {
                    entry,
                    bullet,
                    text: text.clone(),
                });
            }
        }
    }

    QualityReport {
        passed: findings.is_empty(),
        findings,
    }
}

/// A digit, percentage, or currency amount counts as a metric.
pub fn is_quantified(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '%' | '$' | '€' | '£'))
}

fn opens_with_action(text: &str) -> bool {
    let Some(first) = text.split_whitespace().next() else {
        return false;
    };
    let starts_upper = first.chars().next().is_some_and(char::is_uppercase);
    let word = first
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_lowercase();
    starts_upper && !VAGUE_VERBS.contains(&word.as_str())
}

/// Sentence terminators followed by whitespace or end of text. A period
/// inside a token ("$1.2M", "e.g.") does not end a sentence unless spaced.
fn count_sentences(text: &str) -> usize {
    let chars: Vec<char> = text.trim().chars().collect();
    let mut count = 0;
    let mut in_sentence = false;
    for (i, c) in chars.iter().enumerate() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.get(i + 1).map_or(true, |next| next.is_whitespace());
            if at_boundary && in_sentence {
                count += 1;
                in_sentence = false;
            }
        } else if !c.is_whitespace() {
            in_sentence = true;
        }
    }
    if in_sentence {
        count += 1;
    }
    count
}
