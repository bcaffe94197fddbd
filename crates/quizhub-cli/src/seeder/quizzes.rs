//! Fake quizzes with multiple-choice questions.

use anyhow::Context;
use fake::Fake;
use fake::faker::lorem::en::{Sentence, Word, Words};
use quizhub_models::Question;
use rayon::prelude::*;
use sqlx::PgPool;
use sqlx::types::Json;
use std::time::Instant;
use uuid::Uuid;

use super::models::QuizSeed;

const SUBJECTS: [&str; 6] = ["math", "science", "history", "geography", "literature", "art"];
const OPTIONS_PER_QUESTION: usize = 4;

pub fn generate_question() -> Question {
    let options: Vec<String> = (0..OPTIONS_PER_QUESTION)
        .map(|_| Word().fake::<String>())
        .collect();
    Question {
        prompt: Sentence(4..10).fake(),
        options,
        correct_option: (0..OPTIONS_PER_QUESTION).fake(),
    }
}

pub fn generate_quizzes(
    teacher_ids: &[Uuid],
    per_teacher: usize,
    questions_per_quiz: usize,
) -> Vec<QuizSeed> {
    teacher_ids
        .par_iter()
        .enumerate()
        .flat_map(|(teacher_idx, &created_by)| {
            (0..per_teacher)
                .map(|quiz_idx| {
                    let words: Vec<String> = Words(2..4).fake();
                    QuizSeed {
                        title: words.join(" "),
                        description: Sentence(6..14).fake(),
                        subject: SUBJECTS[(teacher_idx + quiz_idx) % SUBJECTS.len()].to_string(),
                        questions: (0..questions_per_quiz).map(|_| generate_question()).collect(),
                        // leave one draft per teacher
                        published: quiz_idx > 0,
                        created_by,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_quizzes(
    db: &PgPool,
    teacher_ids: &[Uuid],
    per_teacher: usize,
    questions_per_quiz: usize,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let quizzes = generate_quizzes(teacher_ids, per_teacher, questions_per_quiz);
    println!("📝 Seeding {} quizzes...", quizzes.len());

    let mut tx = db.begin().await?;
    for quiz in &quizzes {
        sqlx::query(
            "INSERT INTO quizzes (title, description, subject, questions, published, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(&quiz.subject)
        .bind(Json(&quiz.questions))
        .bind(quiz.published)
        .bind(quiz.created_by)
        .execute(&mut *tx)
        .await
        .context("Failed to insert seed quiz")?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} quizzes in {:?}",
        quizzes.len(),
        start_time.elapsed()
    );
    Ok(quizzes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_questions_are_valid() {
        for _ in 0..50 {
            let q = generate_question();
            assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
            assert!(q.correct_option < q.options.len());
            assert!(!q.prompt.is_empty());
        }
    }

    #[test]
    fn quizzes_per_teacher() {
        let teachers = vec![Uuid::new_v4(), Uuid::new_v4()];
        let quizzes = generate_quizzes(&teachers, 3, 2);
        assert_eq!(quizzes.len(), 6);
        assert!(quizzes.iter().all(|q| q.questions.len() == 2));
        for teacher in &teachers {
            let owned: Vec<_> = quizzes.iter().filter(|q| q.created_by == *teacher).collect();
            assert_eq!(owned.len(), 3);
            assert_eq!(owned.iter().filter(|q| !q.published).count(), 1);
        }
    }
}
