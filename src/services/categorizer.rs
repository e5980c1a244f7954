// src/services/categorizer.rs
// DOCUMENTATION: Gallery image categorization
// PURPOSE: Weighted keyword scoring with an AI-first, keyword-fallback dispatch

use crate::models::{Category, CategoryScore};

/// Result of category inference, tagged with the tier that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryInference {
    /// An external classifier named a valid label
    Inferred(Category),
    /// Keyword scoring decided (no suggestion, or an invalid one)
    Fallback(Category),
}

impl CategoryInference {
    pub fn category(&self) -> Category {
        match self {
            CategoryInference::Inferred(c) | CategoryInference::Fallback(c) => *c,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            CategoryInference::Inferred(_) => "inferred",
            CategoryInference::Fallback(_) => "fallback",
        }
    }
}

/// Returned when nothing in the text matches any rule
pub const DEFAULT_CATEGORY: Category = Category::Park;

struct KeywordRule {
    keywords: &'static [&'static str],
    weight: u32,
}

/// Rules per category, in declaration order. Equal scores go to the
/// category declared first.
static RULES: [(Category, &[KeywordRule]); 4] = [
    (
        Category::Scenery,
        &[
            KeywordRule {
                keywords: &[
                    "mountain", "sunset", "sunrise", "desert", "landscape", "vista", "canyon",
                    "peak", "night sky", "stars", "milky way",
                ],
                weight: 3,
            },
            KeywordRule {
                keywords: &[
                    "sky", "cloud", "horizon", "view", "nature", "trail", "hike", "observatory",
                ],
                weight: 2,
            },
        ],
    ),
    (
        Category::Park,
        &[
            KeywordRule {
                keywords: &[
                    "rv", "campsite", "site", "pad", "pull through", "hookup",
                    "motorhome", "trailer", "camper", "fifth wheel",
                ],
                weight: 3,
            },
            KeywordRule {
                keywords: &["park", "entrance", "sign", "road", "lot", "spot"],
                weight: 1,
            },
        ],
    ),
    (
        Category::Facilities,
        &[
            KeywordRule {
                keywords: &[
                    "laundry", "restroom", "shower", "bathroom", "washer", "dryer", "office",
                    "clubhouse", "wifi", "wi fi", "facility", "facilities",
                ],
                weight: 3,
            },
            KeywordRule {
                keywords: &["building", "room", "pool", "dump station", "propane"],
                weight: 2,
            },
        ],
    ),
    (
        Category::General,
        &[
            KeywordRule {
                keywords: &["dog", "pet", "people", "guest", "event", "family", "community"],
                weight: 2,
            },
            KeywordRule {
                keywords: &["misc", "other", "general"],
                weight: 1,
            },
        ],
    ),
];

/// Lower-cased alphanumeric words; separators like "-", "_" and "." split
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole-word match, tolerating a plural "s"/"es"
fn matches_word(word: &str, keyword: &str) -> bool {
    match word.strip_prefix(keyword) {
        Some(rest) => rest.is_empty() || rest == "s" || rest == "es",
        None => false,
    }
}

/// Multi-word keywords must appear as consecutive words
fn contains_keyword(words: &[String], keyword: &str) -> bool {
    let parts: Vec<&str> = keyword.split_whitespace().collect();
    if parts.is_empty() {
        return false;
    }
    words.windows(parts.len()).any(|window| {
        window
            .iter()
            .zip(&parts)
            .all(|(word, part)| matches_word(word, part))
    })
}

/// Score every category against the file name and description
/// DOCUMENTATION: Each rule contributes its weight once if any keyword
/// appears as a whole word (or word sequence) in the text
pub fn score(file_name: &str, description: Option<&str>) -> Vec<CategoryScore> {
    let words = words(&format!("{} {}", file_name, description.unwrap_or_default()));

    RULES
        .iter()
        .map(|(category, rules)| CategoryScore {
            category: *category,
            score: rules
                .iter()
                .filter(|rule| rule.keywords.iter().any(|kw| contains_keyword(&words, kw)))
                .map(|rule| rule.weight)
                .sum(),
        })
        .collect()
}

/// Keyword-only categorization
pub fn categorize_by_keywords(file_name: &str, description: Option<&str>) -> Category {
    let mut best: Option<(Category, u32)> = None;

    for entry in score(file_name, description) {
        // strictly greater, so the first declared category keeps ties
        if entry.score > best.map(|(_, s)| s).unwrap_or(0) {
            best = Some((entry.category, entry.score));
        }
    }

    best.map(|(category, _)| category).unwrap_or(DEFAULT_CATEGORY)
}

/// Two-tier decision: a valid suggested label wins, anything else falls
/// back to keyword scoring
pub fn resolve(
    suggestion: Option<&str>,
    file_name: &str,
    description: Option<&str>,
) -> CategoryInference {
    match suggestion.and_then(Category::parse) {
        Some(category) => CategoryInference::Inferred(category),
        None => {
            if let Some(label) = suggestion {
                log::debug!("Ignoring invalid category suggestion: {:?}", label);
            }
            CategoryInference::Fallback(categorize_by_keywords(file_name, description))
        }
    }
}

/// Human title from a file name: "desert-sunset_02.jpg" -> "Desert Sunset 02"
pub fn suggest_title(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains(' ') => stem,
        _ => file_name,
    };

    let words: Vec<String> = stem
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "Untitled".to_string()
    } else {
        words.join(" ")
    }
}
