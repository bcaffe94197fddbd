use anyhow::{Context, anyhow};
use quizhub_core::{AppError, Role};
use quizhub_models::{
    Attempt, AttemptResult, CreateQuizDto, NotificationKind, PaginatedQuizzesResponse, Quiz,
    QuizFilterParams, QuizView, SubmitAttemptDto, UpdateQuizDto, score_attempt,
};
use sqlx::{PgPool, types::Json};
use tracing::warn;
use uuid::Uuid;

use crate::metrics::{track_attempt_submitted, track_notification_sent, track_quiz_created};
use crate::middleware::auth::AuthUser;

const QUIZ_COLUMNS: &str =
    "id, title, description, subject, questions, published, created_by, created_at, updated_at";

/// Who is asking. Decides which quizzes are visible and whether answer
/// keys are included.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub id: Uuid,
    pub role: Role,
}

impl Viewer {
    pub fn from_auth(user: &AuthUser) -> Result<Self, AppError> {
        Ok(Self {
            id: user.user_id()?,
            role: user.role(),
        })
    }

    /// Admins and moderators see drafts too.
    pub fn sees_all(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Moderator)
    }

    pub fn can_view(&self, quiz: &Quiz) -> bool {
        quiz.published || self.sees_all() || quiz.created_by == self.id
    }

    pub fn can_manage(&self, quiz: &Quiz) -> bool {
        self.role == Role::Admin || quiz.created_by == self.id
    }

    pub fn sees_answers(&self, quiz: &Quiz) -> bool {
        self.role != Role::Student && self.can_manage(quiz)
    }
}

pub struct QuizService;

impl QuizService {
    async fn find(db: &PgPool, id: Uuid) -> Result<Quiz, AppError> {
        sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch quiz by ID")?
            .ok_or_else(|| AppError::not_found(anyhow!("Quiz not found")))
    }

    /// Loads a quiz the viewer may see. Hidden drafts are reported as
    /// missing.
    async fn find_visible(db: &PgPool, viewer: &Viewer, id: Uuid) -> Result<Quiz, AppError> {
        let quiz = Self::find(db, id).await?;
        if !viewer.can_view(&quiz) {
            return Err(AppError::not_found(anyhow!("Quiz not found")));
        }
        Ok(quiz)
    }

    async fn find_managed(db: &PgPool, viewer: &Viewer, id: Uuid) -> Result<Quiz, AppError> {
        let quiz = Self::find_visible(db, viewer, id).await?;
        if !viewer.can_manage(&quiz) {
            return Err(AppError::forbidden(anyhow!(
                "Only the quiz owner or an admin can do this"
            )));
        }
        Ok(quiz)
    }

    pub async fn get_quizzes(
        db: &PgPool,
        viewer: Viewer,
        filters: QuizFilterParams,
    ) -> Result<PaginatedQuizzesResponse, AppError> {
        let subject = filters
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let filter = "($1 OR published OR created_by = $2)
               AND ($3::text IS NULL OR subject ILIKE $3)
               AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM quizzes WHERE {filter}"))
            .bind(viewer.sees_all())
            .bind(viewer.id)
            .bind(subject)
            .bind(&search)
            .fetch_one(db)
            .await
            .context("Failed to count quizzes")?;

        let quizzes = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE {filter}
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6"
        ))
        .bind(viewer.sees_all())
        .bind(viewer.id)
        .bind(subject)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch quizzes")?;

        let data = quizzes
            .iter()
            .map(|quiz| quiz.view(viewer.sees_answers(quiz)))
            .collect();

        Ok(PaginatedQuizzesResponse {
            data,
            meta: filters.pagination.meta(total),
        })
    }

    pub async fn get_quiz(db: &PgPool, viewer: Viewer, id: Uuid) -> Result<QuizView, AppError> {
        let quiz = Self::find_visible(db, &viewer, id).await?;
        Ok(quiz.view(viewer.sees_answers(&quiz)))
    }

    pub async fn create_quiz(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateQuizDto,
    ) -> Result<QuizView, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "INSERT INTO quizzes (title, description, subject, questions, published, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {QUIZ_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(&dto.subject)
        .bind(Json(&dto.questions))
        .bind(dto.published)
        .bind(viewer.id)
        .fetch_one(db)
        .await
        .context("Failed to insert quiz")?;

        track_quiz_created(quiz.published);
        if quiz.published {
            Self::announce(db, &quiz).await;
        }
        Ok(quiz.view(true))
    }

    pub async fn update_quiz(
        db: &PgPool,
        viewer: Viewer,
        id: Uuid,
        dto: UpdateQuizDto,
    ) -> Result<QuizView, AppError> {
        let existing = Self::find_managed(db, &viewer, id).await?;

        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "UPDATE quizzes
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 subject = COALESCE($4, subject),
                 questions = COALESCE($5, questions),
                 published = COALESCE($6, published),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {QUIZ_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(&dto.subject)
        .bind(dto.questions.as_ref().map(Json))
        .bind(dto.published)
        .fetch_one(db)
        .await
        .context("Failed to update quiz")?;

        if quiz.published && !existing.published {
            Self::announce(db, &quiz).await;
        }
        Ok(quiz.view(true))
    }

    pub async fn delete_quiz(db: &PgPool, viewer: Viewer, id: Uuid) -> Result<(), AppError> {
        Self::find_managed(db, &viewer, id).await?;

        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete quiz")?;
        Ok(())
    }

    pub async fn submit_attempt(
        db: &PgPool,
        viewer: Viewer,
        quiz_id: Uuid,
        dto: SubmitAttemptDto,
    ) -> Result<AttemptResult, AppError> {
        let quiz = Self::find(db, quiz_id).await?;
        if !quiz.published {
            return Err(AppError::not_found(anyhow!("Quiz not found")));
        }
        if dto.answers.len() > quiz.questions.len() {
            return Err(AppError::bad_request(anyhow!(
                "Quiz has {} questions but {} answers were submitted",
                quiz.questions.len(),
                dto.answers.len()
            )));
        }

        let (score, total) = score_attempt(&quiz.questions, &dto.answers);

        let attempt = sqlx::query_as::<_, Attempt>(
            "INSERT INTO quiz_attempts (quiz_id, student_id, answers, score, total)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, quiz_id, student_id, answers, score, total, submitted_at",
        )
        .bind(quiz.id)
        .bind(viewer.id)
        .bind(Json(&dto.answers))
        .bind(score)
        .bind(total)
        .fetch_one(db)
        .await
        .context("Failed to insert quiz attempt")?;

        track_attempt_submitted(score, total);

        let message = format!("A student scored {}/{} on \"{}\"", score, total, quiz.title);
        let notified =
            Self::notify(db, &[quiz.created_by], &message, NotificationKind::QuizSubmitted).await;
        if let Err(e) = notified {
            warn!(error = %e, quiz_id = %quiz.id, "Failed to notify quiz owner");
        }

        Ok(AttemptResult::from(&attempt))
    }

    pub async fn get_attempts(
        db: &PgPool,
        viewer: Viewer,
        quiz_id: Uuid,
    ) -> Result<Vec<Attempt>, AppError> {
        Self::find_managed(db, &viewer, quiz_id).await?;

        let attempts = sqlx::query_as::<_, Attempt>(
            "SELECT id, quiz_id, student_id, answers, score, total, submitted_at
             FROM quiz_attempts
             WHERE quiz_id = $1
             ORDER BY submitted_at DESC",
        )
        .bind(quiz_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch quiz attempts")?;

        Ok(attempts)
    }

    /// Tells every student a quiz is available. Failure is logged, never
    /// surfaced: the quiz itself was saved.
    async fn announce(db: &PgPool, quiz: &Quiz) {
        let students: Result<Vec<Uuid>, sqlx::Error> =
            sqlx::query_scalar("SELECT id FROM users WHERE role = $1")
                .bind(Role::Student)
                .fetch_all(db)
                .await;

        let result = match students {
            Ok(ids) => {
                let message = format!("New quiz available: {}", quiz.title);
                Self::notify(db, &ids, &message, NotificationKind::QuizPublished).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!(error = %e, quiz_id = %quiz.id, "Failed to announce published quiz");
        }
    }

    async fn notify(
        db: &PgPool,
        recipients: &[Uuid],
        message: &str,
        kind: NotificationKind,
    ) -> Result<(), sqlx::Error> {
        if recipients.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO notifications (user_id, message, kind)
             SELECT recipient, $2, $3 FROM UNNEST($1::uuid[]) AS recipient",
        )
        .bind(recipients)
        .bind(message)
        .bind(kind)
        .execute(db)
        .await?;

        for _ in recipients {
            track_notification_sent(kind.as_str());
        }
        Ok(())
    }
}
