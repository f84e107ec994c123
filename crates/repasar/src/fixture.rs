//! Fixture data seeded into the target application before the walkthrough.
//!
//! The app reads its exam library from localStorage when running in demo mode;
//! seeding these questions is what makes the library non-empty and the quiz
//! flows reachable.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Storage key for the demo-mode flag (value `"true"`)
pub const DEMO_MODE_KEY: &str = "demo_mode";

/// Storage key for the JSON-encoded question list
pub const QUESTIONS_KEY: &str = "psc-mcq-questions";

/// Synthetic exam question injected via client-side storage.
///
/// Field names follow the target application's storage schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockQuestion {
    /// Question id
    pub id: String,
    /// Question text
    pub question: String,
    /// Ordered answer options
    pub options: Vec<String>,
    /// Index of the correct option
    pub correct_answer_index: usize,
    /// Difficulty level tag (e.g. "Degree", "Topic")
    pub level: String,
    /// Containing exam name
    pub name: String,
    /// Subtopic tag
    pub subtopic: String,
    /// Explanation shown after answering
    pub explanation: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// The built-in question set: one Degree-level and one Topic-level entry, so
/// both exam cards show up in the library view.
#[must_use]
pub fn default_questions() -> Vec<MockQuestion> {
    vec![
        MockQuestion {
            id: "q1".to_string(),
            question: "Which Article of the Constitution deals with the fundamental rights \
                       of Indian citizens?"
                .to_string(),
            options: vec![
                "Article 12-35".to_string(),
                "Article 36-51".to_string(),
                "Article 51A".to_string(),
                "Article 370".to_string(),
            ],
            correct_answer_index: 0,
            level: "Degree".to_string(),
            name: "Constitutional Law Set 4".to_string(),
            subtopic: "Indian Constitution".to_string(),
            explanation: "Part III of the Constitution (Articles 12 to 35) specifically deals \
                          with Fundamental Rights."
                .to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        },
        MockQuestion {
            id: "q2".to_string(),
            question: "Who founded the 'Sahodara Sangham' in 1917 at Cherai?".to_string(),
            options: vec![
                "Sahodaran K. Ayyappan".to_string(),
                "C. Kesavan".to_string(),
                "T.K. Madhavan".to_string(),
                "K. Kelappan".to_string(),
            ],
            correct_answer_index: 0,
            level: "Topic".to_string(),
            name: "Kerala Renaissance Mock".to_string(),
            subtopic: "History (Kerala)".to_string(),
            explanation: "Sahodaran K. Ayyappan founded the Sahodara Sangham in 1917 to \
                          advocate for inter-caste dining."
                .to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        },
    ]
}

/// Encode a question set the way the target application stores it
pub fn questions_json(questions: &[MockQuestion]) -> crate::result::RepasarResult<String> {
    Ok(serde_json::to_string(questions)?)
}
