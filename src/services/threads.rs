use std::{cmp::Reverse, collections::HashMap};

use crate::models::{Comment, ThreadedComment};

/// Assembles a flat list of comments into reply threads
///
/// Roots are comments without a parent or whose parent id is not in the list.
/// Roots are ordered by score (upvotes minus downvotes), highest first, with
/// ties kept in input order; replies keep their input order.
///
/// The lookup is built completely before anything is attached, so a reply may
/// appear before its parent in the input. With duplicate ids the last record
/// wins. The input is not modified; every node in the output is a copy.
pub fn build_threads(comments: &[Comment]) -> Vec<ThreadedComment> {
    let lookup: HashMap<i64, usize> = comments
        .iter()
        .enumerate()
        .map(|(index, comment)| (comment.id, index))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();

    for comment in comments {
        let Some(&node) = lookup.get(&comment.id) else {
            continue;
        };

        match comment.parent_id.and_then(|parent| lookup.get(&parent)) {
            Some(&parent) => children[parent].push(node),
            None => roots.push(node),
        }
    }

    // sort_by_key is stable
    roots.sort_by_key(|&node| Reverse(comments[node].score()));

    let mut path = Vec::new();
    roots
        .into_iter()
        .map(|node| assemble(node, comments, &children, &mut path))
        .collect()
}

/// Builds the subtree under `node`. `path` holds the ancestors being built so
/// that a malformed parent chain cannot nest a comment inside itself.
fn assemble(
    node: usize,
    comments: &[Comment],
    children: &[Vec<usize>],
    path: &mut Vec<usize>,
) -> ThreadedComment {
    path.push(node);

    let mut replies = Vec::with_capacity(children[node].len());
    for &child in &children[node] {
        if path.contains(&child) {
            tracing::warn!(comment_id = comments[child].id, "Skipping cyclic reply");
            continue;
        }
        replies.push(assemble(child, comments, children, path));
    }

    path.pop();

    ThreadedComment {
        comment: comments[node].clone(),
        replies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: i64, parent_id: Option<i64>, upvotes: i32, downvotes: i32) -> Comment {
        Comment {
            id,
            parent_id,
            author: format!("user{}", id),
            text: format!("comment {}", id),
            upvotes,
            downvotes,
            created_at: Utc::now(),
        }
    }

    fn root_ids(threads: &[ThreadedComment]) -> Vec<i64> {
        threads.iter().map(|t| t.comment.id).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(build_threads(&[]).is_empty());
    }

    #[test]
    fn test_roots_ordered_by_score_with_replies_nested() {
        let comments = vec![
            comment(1, None, 2, 0),
            comment(2, Some(1), 0, 0),
            comment(3, None, 1, 5),
        ];

        let threads = build_threads(&comments);
        assert_eq!(root_ids(&threads), vec![1, 3]);
        assert_eq!(threads[0].replies.len(), 1);
        assert_eq!(threads[0].replies[0].comment.id, 2);
        assert!(threads[1].replies.is_empty());
    }

    #[test]
    fn test_reply_before_parent_still_nests() {
        let comments = vec![comment(2, Some(1), 0, 0), comment(1, None, 0, 0)];

        let threads = build_threads(&comments);
        assert_eq!(root_ids(&threads), vec![1]);
        assert_eq!(threads[0].replies[0].comment.id, 2);
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let comments = vec![comment(1, None, 0, 0), comment(2, Some(99), 0, 0)];

        let threads = build_threads(&comments);
        assert_eq!(root_ids(&threads), vec![1, 2]);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let comments = vec![
            comment(1, None, 1, 1),
            comment(2, None, 3, 0),
            comment(3, None, 0, 0),
            comment(4, None, 2, 2),
        ];

        let threads = build_threads(&comments);
        assert_eq!(root_ids(&threads), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_replies_keep_arrival_order_regardless_of_score() {
        let comments = vec![
            comment(1, None, 0, 0),
            comment(2, Some(1), 0, 3),
            comment(3, Some(1), 10, 0),
            comment(4, Some(1), 1, 0),
        ];

        let threads = build_threads(&comments);
        let reply_ids: Vec<i64> = threads[0].replies.iter().map(|r| r.comment.id).collect();
        assert_eq!(reply_ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_nested_replies_at_depth() {
        let comments = vec![
            comment(1, None, 0, 0),
            comment(2, Some(1), 0, 0),
            comment(3, Some(2), 0, 0),
        ];

        let threads = build_threads(&comments);
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].replies[0].replies[0].comment.id, 3);
    }

    #[test]
    fn test_every_comment_appears_once() {
        let comments = vec![
            comment(5, Some(3), 0, 0),
            comment(1, None, 4, 1),
            comment(2, Some(1), 0, 0),
            comment(3, None, 0, 2),
            comment(4, Some(42), 1, 0),
            comment(6, Some(2), 0, 0),
        ];

        let threads = build_threads(&comments);
        let total: usize = threads.iter().map(ThreadedComment::thread_size).sum();
        assert_eq!(total, comments.len());

        let scores: Vec<i64> = threads.iter().map(|t| t.comment.score()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_input_is_not_modified() {
        let comments = vec![comment(1, None, 0, 0), comment(2, Some(1), 0, 0)];
        let before = comments.clone();

        let _ = build_threads(&comments);
        assert_eq!(comments, before);
    }

    #[test]
    fn test_duplicate_ids_last_record_wins() {
        let mut first = comment(1, None, 0, 0);
        first.text = "first".to_string();
        let mut second = comment(1, None, 0, 0);
        second.text = "second".to_string();

        let threads = build_threads(&[first, second]);
        assert_eq!(threads.len(), 2);
        assert!(threads.iter().all(|t| t.comment.text == "second"));
    }

    #[test]
    fn test_self_parent_does_not_recurse() {
        let comments = vec![comment(1, None, 0, 0), comment(1, Some(1), 0, 0)];

        let threads = build_threads(&comments);
        assert_eq!(threads.len(), 1);
        assert!(threads[0].replies.is_empty());
    }

    #[test]
    fn test_pure_cycle_is_not_emitted() {
        let comments = vec![
            comment(1, None, 0, 0),
            comment(2, Some(3), 0, 0),
            comment(3, Some(2), 0, 0),
        ];

        let threads = build_threads(&comments);
        assert_eq!(root_ids(&threads), vec![1]);
    }
}
