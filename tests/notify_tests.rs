mod common;

use common::{ChatCall, FakeChat, FakeSheets, FakeStore, Harness, channel_id, puzzle};
use herring::HerringError;
use herring::core::puzzle_store::PuzzleStore;
use herring::slack::PostOptions;
use herring::worker::{JobOutcome, PuzzleJobs};
use std::sync::Arc;

const STATUS: &str = "puzzle-status";

#[tokio::test]
async fn test_post_answer_posts_upper_cased_answer_locally_and_globally() {
    let h = Harness::with_puzzles([puzzle("the-pear", "The Pear")]);

    for answer in ["banana split", "Banana Split", "BANANA SPLIT"] {
        let chat = Arc::new(FakeChat::new());
        let jobs = PuzzleJobs::new(Some(chat.clone()), None, h.store.clone());

        let outcome = jobs.post_answer("the-pear", answer).await.unwrap();
        assert_eq!(outcome, JobOutcome::Completed);

        assert_eq!(
            chat.posts_to("the-pear"),
            vec![":tada: Confirmed answer: BANANA SPLIT".to_string()]
        );
        assert_eq!(
            chat.posts_to(STATUS),
            vec![
                ":tada: Puzzle \"The Pear\" (#the-pear) was solved! The answer is: BANANA SPLIT"
                    .to_string()
            ]
        );
        assert_eq!(chat.posts().len(), 2);
    }
}

#[tokio::test]
async fn test_post_answer_for_missing_puzzle_fails() {
    let h = Harness::with_puzzles([]);

    let err = h.jobs().post_answer("ghost", "boo").await.unwrap_err();

    assert!(matches!(err, HerringError::PuzzleNotFound(ref slug) if slug == "ghost"));
    assert!(h.chat.calls().is_empty());
}

#[tokio::test]
async fn test_post_update_for_missing_puzzle_is_silent() {
    let h = Harness::with_puzzles([puzzle("the-pear", "The Pear")]);

    let outcome = h.jobs().post_update("ghost", "tags", "meta").await.unwrap();

    assert_eq!(outcome, JobOutcome::Skipped);
    assert!(h.chat.calls().is_empty());
}

#[tokio::test]
async fn test_post_update_posts_field_and_value() {
    let h = Harness::with_puzzles([puzzle("the-pear", "The Pear")]);

    let outcome = h
        .jobs()
        .post_update("the-pear", "tags", "Needs Eyes, Wordplay")
        .await
        .unwrap();

    assert_eq!(outcome, JobOutcome::Completed);
    assert_eq!(
        h.chat.posts_to("the-pear"),
        vec!["tags set to: Needs Eyes, Wordplay".to_string()]
    );
    assert_eq!(
        h.chat.posts_to(STATUS),
        vec!["\"The Pear\" (#the-pear) now has these tags: Needs Eyes, Wordplay".to_string()]
    );
}

#[tokio::test]
async fn test_post_update_propagates_store_outage() {
    let h = Harness::new(
        FakeChat::new(),
        FakeStore::unreachable(),
        FakeSheets::returning("https://docs.example/abc"),
    );

    let err = h.jobs().post_update("the-pear", "tags", "meta").await.unwrap_err();

    assert!(matches!(err, HerringError::StoreError(_)));
    assert!(h.chat.calls().is_empty());
}

#[tokio::test]
async fn test_local_join_failure_still_posts_globally() {
    let h = Harness::new(
        FakeChat::new().failing_join("the-pear"),
        FakeStore::with([puzzle("the-pear", "The Pear")]),
        FakeSheets::returning("https://docs.example/abc"),
    );

    h.jobs()
        .post_local_and_global("the-pear", "local", "global")
        .await
        .unwrap();

    assert!(h.chat.posts_to("the-pear").is_empty());
    assert_eq!(h.chat.posts_to(STATUS), vec!["global".to_string()]);
}

#[tokio::test]
async fn test_local_post_failure_still_posts_globally() {
    let h = Harness::new(
        FakeChat::new().failing_post("the-pear"),
        FakeStore::with([puzzle("the-pear", "The Pear")]),
        FakeSheets::returning("https://docs.example/abc"),
    );

    h.jobs().post_answer("the-pear", "kiwi").await.unwrap();

    assert_eq!(
        h.chat.posts_to(STATUS),
        vec![":tada: Puzzle \"The Pear\" (#the-pear) was solved! The answer is: KIWI".to_string()]
    );
}

#[tokio::test]
async fn test_global_join_failure_propagates() {
    let h = Harness::new(
        FakeChat::new().failing_join(STATUS),
        FakeStore::with([puzzle("the-pear", "The Pear")]),
        FakeSheets::returning("https://docs.example/abc"),
    );

    let err = h
        .jobs()
        .post_local_and_global("the-pear", "local", "global")
        .await
        .unwrap_err();

    assert_eq!(err.slack_code(), Some("is_archived"));
    assert_eq!(h.chat.posts_to("the-pear"), vec!["local".to_string()]);
    assert!(h.chat.posts_to(STATUS).is_empty());
}

#[tokio::test]
async fn test_global_post_failure_propagates() {
    let h = Harness::new(
        FakeChat::new().failing_post(STATUS),
        FakeStore::with([puzzle("the-pear", "The Pear")]),
        FakeSheets::returning("https://docs.example/abc"),
    );

    let result = h.jobs().post_update("the-pear", "status", "Solved").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_messages_expand_mentions_as_acting_user() {
    let h = Harness::with_puzzles([puzzle("the-pear", "The Pear")]);

    h.jobs().post_answer("the-pear", "kiwi").await.unwrap();

    let options: Vec<PostOptions> = h
        .chat
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ChatCall::Post { options, .. } => Some(options),
            _ => None,
        })
        .collect();
    assert_eq!(options.len(), 2);
    assert!(
        options
            .iter()
            .all(|o| o.expand_mentions && o.as_acting_user)
    );
}

#[tokio::test]
async fn test_joins_local_then_status_channel() {
    let h = Harness::with_puzzles([puzzle("the-pear", "The Pear")]);

    h.jobs().post_answer("the-pear", "kiwi").await.unwrap();

    let joins: Vec<ChatCall> = h
        .chat
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ChatCall::Join(_)))
        .collect();
    assert_eq!(
        joins,
        vec![
            ChatCall::Join("the-pear".to_string()),
            ChatCall::Join(STATUS.to_string())
        ]
    );
}

#[tokio::test]
async fn test_custom_status_channel() {
    let h = Harness::with_puzzles([puzzle("the-pear", "The Pear")]);
    let jobs = h.jobs().with_status_channel("hunt-log");

    jobs.post_answer("the-pear", "kiwi").await.unwrap();

    assert_eq!(h.chat.posts_to("hunt-log").len(), 1);
    assert!(h.chat.posts_to(STATUS).is_empty());
    assert!(
        h.chat
            .posts()
            .iter()
            .all(|(id, _)| *id != channel_id(STATUS))
    );
}

#[tokio::test]
async fn test_disabled_chat_fails_cleanly() {
    let store: Arc<dyn PuzzleStore> = Arc::new(FakeStore::with([puzzle("the-pear", "The Pear")]));
    let jobs = PuzzleJobs::new(None, None, store);

    let err = jobs.post_answer("the-pear", "kiwi").await.unwrap_err();

    assert!(matches!(err, HerringError::ChatDisabled));
}
