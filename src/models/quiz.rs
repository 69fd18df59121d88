use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum QuestionDifficulty {
    #[serde(rename = "E")]
    #[sqlx(rename = "E")]
    Easy,
    #[default]
    #[serde(rename = "M")]
    #[sqlx(rename = "M")]
    Medium,
    #[serde(rename = "H")]
    #[sqlx(rename = "H")]
    Hard,
}

impl QuestionDifficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionDifficulty::Easy => "E",
            QuestionDifficulty::Medium => "M",
            QuestionDifficulty::Hard => "H",
        }
    }
}

/// A quiz question attached to a topic.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Question {
    pub id: i64,
    pub topic_id: i64,
    pub topic_title: String,
    pub text: String,
    pub explanation: String,
    pub difficulty: QuestionDifficulty,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}...", self.topic_title, truncate(&self.text, 50))
    }
}

/// An answer option; `text` is unique within its question.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub question_text: String,
    pub text: String,
    pub is_correct: bool,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}... - {}...",
            truncate(&self.question_text, 30),
            truncate(&self.text, 30)
        )
    }
}

/// Question together with its answers in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub topic_id: i64,
    pub text: String,
    pub explanation: String,
    pub difficulty: QuestionDifficulty,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
    pub order: i64,
}

fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
