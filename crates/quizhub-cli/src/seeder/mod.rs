//! Development data seeding.

pub mod models;
pub mod quizzes;
pub mod users;

use quizhub_core::{Role, hash_password};
use sqlx::PgPool;
use std::time::Instant;

pub use models::SeedConfig;

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} users and {} quizzes",
        config.total_users(),
        config.total_quizzes()
    );

    // one hash for every seeded account
    let password_hash = hash_password(&config.password).map_err(|e| e.error)?;

    let teacher_ids = users::seed_users(db, Role::Teacher, config.teachers, &password_hash).await?;
    users::seed_users(db, Role::Student, config.students, &password_hash).await?;
    quizzes::seed_quizzes(
        db,
        &teacher_ids,
        config.quizzes_per_teacher,
        config.questions_per_quiz,
    )
    .await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    println!("   Seeded accounts use the password: {}", config.password);
    Ok(())
}

/// Removes seeded users. Their quizzes, attempts and notifications go with
/// them through `ON DELETE CASCADE`.
pub async fn clear_seed(db: &PgPool) -> anyhow::Result<u64> {
    users::clear_users(db).await
}
