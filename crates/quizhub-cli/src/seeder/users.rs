//! Fake teachers and students.

use anyhow::Context;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use quizhub_core::Role;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::UserSeed;

/// Seeded accounts share this domain so they can be cleared later.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

// 4 params per user
const BATCH_SIZE: usize = 1000;

pub fn generate_users(role: Role, count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+{}{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                role,
                idx,
                SEED_EMAIL_DOMAIN
            );
            UserSeed {
                name: format!("{} {}", first_name, last_name),
                email,
                password_hash: password_hash.to_string(),
                role,
            }
        })
        .collect()
}

pub async fn seed_users(
    db: &PgPool,
    role: Role,
    count: usize,
    password_hash: &str,
) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} {}s...", count, role);

    let users = generate_users(role, count, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!("   ✓ Inserted {} users in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

pub async fn insert_users_batch(db: &PgPool, users: &[UserSeed]) -> anyhow::Result<Vec<Uuid>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> anyhow::Result<Vec<Uuid>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (name, email, password, role) VALUES ");
    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }
    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role);
    }

    q.fetch_all(&mut **tx)
        .await
        .context("Failed to insert seed users")
}

/// Deletes seeded accounts. Admins are never touched.
pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE $1 AND role <> $2")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .bind(Role::Admin)
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {} users in {:?}", deleted, start_time.elapsed());
    Ok(deleted)
}
