//! Quizzes, their questions, and student attempts.
//!
//! Questions live inside the quiz row as a JSONB array. The answer key
//! (`correct_option`) stays on the server for students: handlers always go
//! through [`Quiz::view`].

use chrono::{DateTime, Utc};
use quizhub_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_option: usize,
}

impl Question {
    fn check(&self) -> Result<(), &'static str> {
        if self.prompt.trim().is_empty() {
            return Err("Question prompt cannot be empty");
        }
        if self.options.len() < 2 {
            return Err("Each question needs at least two options");
        }
        if self.correct_option >= self.options.len() {
            return Err("Correct option must point at one of the options");
        }
        Ok(())
    }
}

fn validate_questions(questions: &Vec<Question>) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(ValidationError::new("questions")
            .with_message("A quiz needs at least one question".into()));
    }
    for question in questions {
        question
            .check()
            .map_err(|msg| ValidationError::new("questions").with_message(msg.into()))?;
    }
    Ok(())
}

/// A quiz row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    #[schema(value_type = Vec<Question>)]
    pub questions: Json<Vec<Question>>,
    pub published: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Response shape. `include_answers` is false for students.
    pub fn view(&self, include_answers: bool) -> QuizView {
        QuizView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            subject: self.subject.clone(),
            questions: self
                .questions
                .iter()
                .map(|q| QuestionView {
                    prompt: q.prompt.clone(),
                    options: q.options.clone(),
                    correct_option: include_answers.then_some(q.correct_option),
                })
                .collect(),
            published: self.published,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub questions: Vec<QuestionView>,
    pub published: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuizDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Subject is too long"))]
    pub subject: Option<String>,
    #[validate(custom(function = "validate_questions"))]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateQuizDto {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Subject is too long"))]
    pub subject: Option<String>,
    #[validate(custom(function = "validate_questions"))]
    pub questions: Option<Vec<Question>>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QuizFilterParams {
    pub subject: Option<String>,
    /// Case-insensitive match on the title
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedQuizzesResponse {
    pub data: Vec<QuizView>,
    pub meta: PaginationMeta,
}

/// One answer per question, by option index. `null` means unanswered.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitAttemptDto {
    #[validate(length(min = 1, message = "Answers are required"))]
    pub answers: Vec<Option<usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub student_id: Uuid,
    #[schema(value_type = Vec<Option<usize>>)]
    pub answers: Json<Vec<Option<usize>>>,
    pub score: i32,
    pub total: i32,
    pub submitted_at: DateTime<Utc>,
}

/// What a student sees after submitting.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttemptResult {
    pub attempt_id: Uuid,
    pub score: i32,
    pub total: i32,
    pub percentage: f64,
}

impl From<&Attempt> for AttemptResult {
    fn from(attempt: &Attempt) -> Self {
        let percentage = if attempt.total == 0 {
            0.0
        } else {
            f64::from(attempt.score) * 100.0 / f64::from(attempt.total)
        };
        Self {
            attempt_id: attempt.id,
            score: attempt.score,
            total: attempt.total,
            percentage,
        }
    }
}

/// Counts answers equal to the question's `correct_option`. Extra answers
/// are ignored and missing ones count as wrong. Returns `(score, total)`.
pub fn score_attempt(questions: &[Question], answers: &[Option<usize>]) -> (i32, i32) {
    let score = questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| **a == Some(q.correct_option))
        .count();
    (score as i32, questions.len() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> Question {
        Question {
            prompt: "2 + 2?".into(),
            options: vec!["3".into(), "4".into(), "5".into()],
            correct_option: correct,
        }
    }

    fn quiz() -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            title: "Arithmetic".into(),
            description: None,
            subject: Some("math".into()),
            questions: Json(vec![question(1), question(2)]),
            published: true,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn scoring_counts_exact_matches() {
        let questions = vec![question(1), question(0), question(2)];
        assert_eq!(score_attempt(&questions, &[Some(1), Some(0), Some(2)]), (3, 3));
        assert_eq!(score_attempt(&questions, &[Some(1), None, Some(0)]), (1, 3));
    }

    #[test]
    fn scoring_handles_length_mismatch() {
        let questions = vec![question(1), question(1)];
        assert_eq!(score_attempt(&questions, &[Some(1)]), (1, 2));
        assert_eq!(score_attempt(&questions, &[Some(1), Some(1), Some(1)]), (2, 2));
        assert_eq!(score_attempt(&[], &[Some(0)]), (0, 0));
    }

    #[test]
    fn student_view_hides_answer_key() {
        let view = quiz().view(false);
        assert!(view.questions.iter().all(|q| q.correct_option.is_none()));
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("correct_option"));
    }

    #[test]
    fn owner_view_keeps_answer_key() {
        let view = quiz().view(true);
        assert_eq!(view.questions[0].correct_option, Some(1));
        assert_eq!(view.questions[1].correct_option, Some(2));
    }

    #[test]
    fn create_quiz_rejects_bad_questions() {
        let mut dto = CreateQuizDto {
            title: "Quiz".into(),
            description: None,
            subject: None,
            questions: vec![question(1)],
            published: false,
        };
        assert!(dto.validate().is_ok());

        dto.questions = vec![question(7)];
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("questions"));

        dto.questions = vec![];
        assert!(dto.validate().is_err());
    }

    #[test]
    fn update_quiz_validates_questions_only_when_present() {
        assert!(UpdateQuizDto::default().validate().is_ok());
        let dto = UpdateQuizDto {
            questions: Some(vec![Question {
                prompt: "Only one option".into(),
                options: vec!["a".into()],
                correct_option: 0,
            }]),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn attempt_result_percentage() {
        let attempt = Attempt {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            answers: Json(vec![Some(1), Some(0)]),
            score: 1,
            total: 4,
            submitted_at: Utc::now(),
        };
        let result = AttemptResult::from(&attempt);
        assert_eq!(result.percentage, 25.0);
    }
}
