use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{Comment, MediaType, NewComment, ThreadedComment, TitleKey, VoteDirection},
    services::threads::build_threads,
};

const MAX_COMMENT_CHARS: usize = 5000;

/// Storage for reviews and replies
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CommentStore: Send + Sync {
    /// All comments on a title, oldest first
    async fn list_for_title(&self, key: &TitleKey) -> AppResult<Vec<Comment>>;

    /// A comment and the title it belongs to
    async fn find(&self, id: i64) -> AppResult<Option<(TitleKey, Comment)>>;

    async fn insert(&self, key: &TitleKey, comment: &NewComment) -> AppResult<Comment>;

    /// Adds one vote; `None` if the comment does not exist
    async fn vote(&self, id: i64, direction: VoteDirection) -> AppResult<Option<Comment>>;
}

/// `CommentStore` backed by the `comments` table
#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    media_type: String,
    tmdb_id: i64,
    #[sqlx(flatten)]
    comment: Comment,
}

#[async_trait::async_trait]
impl CommentStore for PgCommentStore {
    async fn list_for_title(&self, key: &TitleKey) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, parent_id, author, body, upvotes, downvotes, created_at
            FROM comments
            WHERE media_type = $1 AND tmdb_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn find(&self, id: i64) -> AppResult<Option<(TitleKey, Comment)>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT media_type, tmdb_id, id, parent_id, author, body, upvotes, downvotes, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let media_type = MediaType::parse(&row.media_type).ok_or_else(|| {
                AppError::Internal(format!("Unknown media type in comments table: {}", row.media_type))
            })?;
            Ok((TitleKey::new(media_type, row.tmdb_id), row.comment))
        })
        .transpose()
    }

    async fn insert(&self, key: &TitleKey, comment: &NewComment) -> AppResult<Comment> {
        let inserted = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (media_type, tmdb_id, parent_id, author, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, parent_id, author, body, upvotes, downvotes, created_at
            "#,
        )
        .bind(key.media_type.as_str())
        .bind(key.tmdb_id)
        .bind(comment.parent_id)
        .bind(&comment.author)
        .bind(&comment.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn vote(&self, id: i64, direction: VoteDirection) -> AppResult<Option<Comment>> {
        let sql = match direction {
            VoteDirection::Up => {
                r#"
                UPDATE comments SET upvotes = upvotes + 1
                WHERE id = $1
                RETURNING id, parent_id, author, body, upvotes, downvotes, created_at
                "#
            }
            VoteDirection::Down => {
                r#"
                UPDATE comments SET downvotes = downvotes + 1
                WHERE id = $1
                RETURNING id, parent_id, author, body, upvotes, downvotes, created_at
                "#
            }
        };

        let updated = sqlx::query_as::<_, Comment>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}

/// Loads a title's comments and threads them
pub async fn threads_for_title(
    store: &dyn CommentStore,
    key: &TitleKey,
) -> AppResult<Vec<ThreadedComment>> {
    let comments = store.list_for_title(key).await?;
    let threads = build_threads(&comments);

    tracing::debug!(
        title = %key,
        comments = comments.len(),
        threads = threads.len(),
        "Built comment threads"
    );

    Ok(threads)
}

/// Validates and stores a review or reply
///
/// A reply's parent must exist and belong to the same title.
pub async fn post_comment(
    store: &dyn CommentStore,
    key: &TitleKey,
    comment: NewComment,
) -> AppResult<Comment> {
    let comment = NewComment {
        author: comment.author.trim().to_string(),
        text: comment.text.trim().to_string(),
        parent_id: comment.parent_id,
    };

    if comment.author.is_empty() {
        return Err(AppError::InvalidInput("Author cannot be empty".to_string()));
    }
    if comment.text.is_empty() {
        return Err(AppError::InvalidInput("Comment text cannot be empty".to_string()));
    }
    if comment.text.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Comment text exceeds {} characters",
            MAX_COMMENT_CHARS
        )));
    }

    if let Some(parent_id) = comment.parent_id {
        match store.find(parent_id).await? {
            Some((parent_key, _)) if parent_key == *key => {}
            Some(_) => {
                return Err(AppError::InvalidInput(format!(
                    "Comment {} belongs to another title",
                    parent_id
                )))
            }
            None => {
                return Err(AppError::InvalidInput(format!(
                    "Parent comment {} does not exist",
                    parent_id
                )))
            }
        }
    }

    let stored = store.insert(key, &comment).await?;
    tracing::info!(title = %key, comment_id = stored.id, parent_id = ?stored.parent_id, "Comment posted");
    Ok(stored)
}

/// Records an up- or downvote
pub async fn vote(store: &dyn CommentStore, id: i64, direction: VoteDirection) -> AppResult<Comment> {
    store
        .vote(id, direction)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {}", id)))
}
