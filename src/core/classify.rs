//! Pure intent classification
//!
//! Holds the fixed zero-shot label table and the deterministic keyword rules
//! used whenever the remote classifier is unavailable or unsure.

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Greetings, farewells, thanks and other small talk.
pub const DEFAULT_CASUAL_KEYWORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "howdy",
    "what's up",
    "whats up",
    "sup",
    "bye",
    "goodbye",
    "see you",
    "take care",
    "good night",
    "thank you",
    "thanks",
    "thank",
    "appreciate",
    "grateful",
    "how are you",
    "how's it going",
    "nice to meet",
    "pleasure",
    "ok",
    "okay",
    "sure",
    "yes",
    "no",
    "got it",
    "understood",
    "great",
    "awesome",
    "cool",
    "nice",
    "good job",
    "well done",
];

/// Terms that signal the answer may depend on fresh, not-yet-indexed data.
pub const DEFAULT_TIME_SENSITIVE_KEYWORDS: &[&str] = &[
    "deadline",
    "last date",
    "when",
    "upcoming",
    "event",
    "events",
    "news",
    "announcement",
    "latest",
    "current",
    "today",
    "tomorrow",
    "this week",
    "this month",
    "schedule",
    "calendar",
    "holiday",
    "new",
    "update",
    "recently",
    "now",
    "open",
    "closed",
    "registration",
];

pub const DEFAULT_ADMISSIONS_KEYWORDS: &[&str] =
    &["admission", "apply", "enroll", "entrance", "scholarship"];

pub const DEFAULT_ACADEMIC_KEYWORDS: &[&str] =
    &["program", "course", "degree", "curriculum", "major"];

/// Coarse query category used for routing and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Casual,
    TimeSensitive,
    Admissions,
    Academic,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Casual => "casual",
            Intent::TimeSensitive => "time_sensitive",
            Intent::Admissions => "admissions",
            Intent::Academic => "academic",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(intent, is_casual, needs_web_search)` triple every classifier path produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub is_casual: bool,
    pub needs_web_search: bool,
}

impl Classification {
    pub const fn new(intent: Intent, is_casual: bool, needs_web_search: bool) -> Self {
        Self {
            intent,
            is_casual,
            needs_web_search,
        }
    }

    pub const fn casual() -> Self {
        Self::new(Intent::Casual, true, false)
    }

    pub const fn general() -> Self {
        Self::new(Intent::General, false, false)
    }
}

/// Candidate labels offered to the zero-shot classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentLabel {
    CasualExchange,
    TimeSensitive,
    Admissions,
    AcademicPrograms,
    GeneralInformation,
}

impl IntentLabel {
    pub const ALL: [IntentLabel; 5] = [
        IntentLabel::CasualExchange,
        IntentLabel::TimeSensitive,
        IntentLabel::Admissions,
        IntentLabel::AcademicPrograms,
        IntentLabel::GeneralInformation,
    ];

    /// Natural-language text sent to the remote model for this label.
    pub fn text(&self) -> &'static str {
        match self {
            IntentLabel::CasualExchange => "casual greeting or farewell",
            IntentLabel::TimeSensitive => {
                "time-sensitive query about deadlines, events, or schedules"
            }
            IntentLabel::Admissions => "question about admissions, enrollment, or scholarships",
            IntentLabel::AcademicPrograms => {
                "question about academic programs, courses, or degrees"
            }
            IntentLabel::GeneralInformation => "general university information question",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.text() == text)
    }

    pub fn classification(&self) -> Classification {
        match self {
            IntentLabel::CasualExchange => Classification::casual(),
            IntentLabel::TimeSensitive => Classification::new(Intent::TimeSensitive, false, true),
            IntentLabel::Admissions => Classification::new(Intent::Admissions, false, false),
            IntentLabel::AcademicPrograms => Classification::new(Intent::Academic, false, false),
            IntentLabel::GeneralInformation => Classification::general(),
        }
    }

    pub fn candidate_texts() -> Vec<&'static str> {
        Self::ALL.iter().map(|label| label.text()).collect()
    }
}

/// One entry of the remote classifier's ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Pure: Turn a remote ranking into a classification
///
/// The highest scoring label wins if it reaches `min_confidence`. Labels
/// outside the fixed table are treated as general questions.
pub fn select_label(
    ranking: &[LabelScore],
    min_confidence: f64,
) -> Result<Classification, ClassifierError> {
    let top = ranking
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ClassifierError::Malformed("empty ranking".to_string()))?;

    if top.score < min_confidence {
        return Err(ClassifierError::LowConfidence {
            label: top.label.clone(),
            score: top.score,
            threshold: min_confidence,
        });
    }

    Ok(IntentLabel::from_text(&top.label)
        .map(|label| label.classification())
        .unwrap_or_else(Classification::general))
}

/// Keyword lists driving the deterministic fallback classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub casual: Vec<String>,
    pub time_sensitive: Vec<String>,
    pub admissions: Vec<String>,
    pub academic: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            casual: owned(DEFAULT_CASUAL_KEYWORDS),
            time_sensitive: owned(DEFAULT_TIME_SENSITIVE_KEYWORDS),
            admissions: owned(DEFAULT_ADMISSIONS_KEYWORDS),
            academic: owned(DEFAULT_ACADEMIC_KEYWORDS),
        }
    }
}

impl KeywordRules {
    /// Lower-case and trim every keyword, dropping empty entries.
    pub fn normalized(self) -> Self {
        fn clean(words: Vec<String>) -> Vec<String> {
            words
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        }

        Self {
            casual: clean(self.casual),
            time_sensitive: clean(self.time_sensitive),
            admissions: clean(self.admissions),
            academic: clean(self.academic),
        }
    }
}

fn mentions_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| text.contains(kw.as_str()))
}

/// Pure: Classify a query from keyword rules alone
///
/// Short queries (five words or fewer) are casual when any casual keyword
/// appears anywhere in them. Longer queries are casual only when the whole
/// query, with trailing `!?.` removed, is itself a casual keyword.
pub fn classify_by_keywords(query: &str, rules: &KeywordRules) -> Classification {
    let q = query.trim().to_lowercase();

    let is_casual = if q.split_whitespace().count() <= 5 {
        mentions_any(&q, &rules.casual)
    } else {
        let stripped = q.trim_end_matches(['!', '?', '.']);
        rules
            .casual
            .iter()
            .any(|kw| kw.as_str() == q || kw.as_str() == stripped)
    };

    if is_casual {
        return Classification::casual();
    }

    let needs_web_search = mentions_any(&q, &rules.time_sensitive);

    let intent = if mentions_any(&q, &rules.admissions) {
        Intent::Admissions
    } else if mentions_any(&q, &rules.academic) {
        Intent::Academic
    } else {
        Intent::General
    };

    Classification::new(intent, false, needs_web_search)
}
