use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use quizhub_cli::seeder::{self, SeedConfig};
use quizhub_cli::{admin, dedupe};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "quizhub-cli")]
#[command(about = "Quizhub CLI - administrative tools for Quizhub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Delete duplicate notifications, keeping the oldest of each
    DedupeNotifications {
        /// Report what would be deleted without deleting it
        #[arg(long)]
        dry_run: bool,
    },
    /// Seed the database with fake teachers, students and quizzes
    Seed {
        #[arg(long, default_value = "5")]
        teachers: usize,

        #[arg(long, default_value = "50")]
        students: usize,

        /// Quizzes per teacher
        #[arg(long, default_value = "3")]
        quizzes: usize,

        /// Questions per quiz
        #[arg(long, default_value = "5")]
        questions: usize,
    },
    /// Delete seeded accounts and everything they own (keeps admins)
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = quizhub_db::init_db_pool()
        .await
        .context("Failed to connect to database")?;

    let result = match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::DedupeNotifications { dry_run } => handle_dedupe(&pool, dry_run).await,
        Commands::Seed {
            teachers,
            students,
            quizzes,
            questions,
        } => {
            let config = SeedConfig {
                teachers,
                students,
                quizzes_per_teacher: quizzes,
                questions_per_quiz: questions,
                ..SeedConfig::default()
            };
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_seed(&pool).await.map(|deleted| {
            println!("✅ Cleared {} seeded users", deleted);
        }),
    };

    pool.close().await;

    if let Err(e) = &result {
        eprintln!("\n❌ {:#}", e);
    }
    result
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let id = admin::create_admin(pool, &name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {}", id);
    println!("   Email: {}", email);
    println!("   Name: {}", name);
    Ok(())
}

async fn handle_dedupe(pool: &PgPool, dry_run: bool) -> anyhow::Result<()> {
    let report = dedupe::dedupe_notifications(pool, dry_run).await?;

    if dry_run {
        println!(
            "\nDry run: {} of {} notifications would be deleted",
            report.duplicates.len(),
            report.scanned
        );
        for id in &report.duplicates {
            println!("   {}", id);
        }
    } else {
        println!(
            "\n✅ Deleted {} duplicate notifications ({} scanned)",
            report.deleted, report.scanned
        );
    }
    Ok(())
}
