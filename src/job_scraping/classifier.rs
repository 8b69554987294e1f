// src/job_scraping/classifier.rs
//! Design keyword classifier. Plain substring containment, no tokenization.

use super::Posting;

pub const DESIGN_KEYWORDS: &[&str] = &[
    "design",
    "product design",
    "graphic design",
    "ux",
    "ui",
    "brand",
    "creative",
    "art director",
    "visual design",
    "design lead",
    "designer",
];

/// True if any vocabulary keyword occurs in the lower-cased text.
pub fn mentions_design(text: &str) -> bool {
    let lowered = text.to_lowercase();
    DESIGN_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// True if the posting is design-related by title, team, company or description.
pub fn is_design_related(posting: &Posting) -> bool {
    let text = [
        posting.title.as_str(),
        posting.team.as_str(),
        posting.company.as_str(),
        posting.description.as_str(),
    ]
    .join(" ");

    mentions_design(&text)
}
