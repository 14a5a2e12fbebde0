use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review or reply as stored in the `comments` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub author: String,
    #[sqlx(rename = "body")]
    pub text: String,
    #[serde(default)]
    pub upvotes: i32,
    #[serde(default)]
    pub downvotes: i32,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Upvotes minus downvotes; may be negative
    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }
}

/// A comment with its replies nested underneath
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<ThreadedComment>,
}

impl ThreadedComment {
    /// Number of nodes in this subtree, including the comment itself
    pub fn thread_size(&self) -> usize {
        1 + self
            .replies
            .iter()
            .map(ThreadedComment::thread_size)
            .sum::<usize>()
    }
}

/// Body of a comment submission
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(upvotes: i32, downvotes: i32) -> Comment {
        Comment {
            id: 1,
            parent_id: None,
            author: "ana".to_string(),
            text: "Go see it on the big screen".to_string(),
            upvotes,
            downvotes,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_score_can_be_negative() {
        assert_eq!(comment(1, 5).score(), -4);
        assert_eq!(comment(2, 0).score(), 2);
    }

    #[test]
    fn test_threaded_comment_serializes_flat_with_replies() {
        let threaded = ThreadedComment {
            comment: comment(3, 1),
            replies: vec![],
        };

        let json = serde_json::to_value(&threaded).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["upvotes"], 3);
        assert_eq!(json["replies"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_vote_direction_deserialization() {
        let up: VoteDirection = serde_json::from_str("\"up\"").unwrap();
        let down: VoteDirection = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(up, VoteDirection::Up);
        assert_eq!(down, VoteDirection::Down);
    }
}
