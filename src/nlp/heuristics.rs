//! Keyword triage that runs without any model artifacts.

use std::fmt;

use serde::Serialize;

use crate::nlp::Prediction;

/// Priority levels used by the keyword rules, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank as stored by ticketing backends: 0 is urgent, 3 is low.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct QueueRule {
    keywords: &'static [&'static str],
    queue: &'static str,
    priority: Priority,
}

// First match wins.
const QUEUE_RULES: &[QueueRule] = &[
    QueueRule {
        keywords: &["urgent", "emergency"],
        queue: "urgent",
        priority: Priority::Urgent,
    },
    QueueRule {
        keywords: &["bug", "error"],
        queue: "technical",
        priority: Priority::High,
    },
    QueueRule {
        keywords: &["billing", "payment"],
        queue: "billing",
        priority: Priority::Medium,
    },
];

const POSITIVE: &[&str] = &["thank", "appreciate"];
const NEGATIVE: &[&str] = &["disappointed", "unhappy", "not working", "terrible"];

/// Keyword-based triage of a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordTriage {
    pub queue: &'static str,
    pub priority: Priority,
    pub sentiment: &'static str,
}

impl KeywordTriage {
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        let (queue, priority) = QUEUE_RULES
            .iter()
            .find(|rule| mentions(rule.keywords))
            .map(|rule| (rule.queue, rule.priority))
            .unwrap_or(("general", Priority::Low));

        let sentiment = if mentions(POSITIVE) {
            "positive"
        } else if mentions(NEGATIVE) {
            "negative"
        } else {
            "neutral"
        };

        Self {
            queue,
            priority,
            sentiment,
        }
    }
}

impl From<KeywordTriage> for Prediction {
    fn from(value: KeywordTriage) -> Self {
        Prediction {
            queue: value.queue.to_string(),
            priority: value.priority.to_string(),
            sentiment: value.sentiment.to_string(),
        }
    }
}
