//! Seed records and seeding configuration.

use quizhub_core::Role;
use quizhub_models::Question;
use uuid::Uuid;

pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

pub struct QuizSeed {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub questions: Vec<Question>,
    pub published: bool,
    pub created_by: Uuid,
}

/// How much fake data to generate.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub quizzes_per_teacher: usize,
    pub questions_per_quiz: usize,
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 5,
            students: 50,
            quizzes_per_teacher: 3,
            questions_per_quiz: 5,
            password: "password123".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn total_users(&self) -> usize {
        self.teachers + self.students
    }

    pub fn total_quizzes(&self) -> usize {
        self.teachers * self.quizzes_per_teacher
    }
}
