//! Requests for generated hints and feedback.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct HintRequest {
    #[validate(length(min = 1, max = 2000, message = "Question is required"))]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl HintRequest {
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Give a short hint for the following quiz question without revealing the answer.\nQuestion: {}",
            self.question.trim()
        );
        if !self.options.is_empty() {
            prompt.push_str("\nOptions: ");
            prompt.push_str(&self.options.join("; "));
        }
        prompt
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = 2000, message = "Question is required"))]
    pub question: String,
    #[validate(length(min = 1, max = 2000, message = "Answer is required"))]
    pub answer: String,
    pub correct_answer: Option<String>,
}

impl FeedbackRequest {
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Give brief, encouraging feedback on a student's answer.\nQuestion: {}\nStudent answer: {}",
            self.question.trim(),
            self.answer.trim()
        );
        if let Some(correct) = &self.correct_answer {
            prompt.push_str("\nCorrect answer: ");
            prompt.push_str(correct.trim());
        }
        prompt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssistResponse {
    pub text: String,
}
