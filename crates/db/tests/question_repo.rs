//! Integration tests for the questions repository.
//!
//! Covers creation defaults, title lookup, partition queries, relation-list
//! attachment, preferred-answer membership, and cascade delete.

use askboard_db::models::answer::CreateAnswer;
use askboard_db::models::question::{CreateQuestion, UpdateQuestion};
use askboard_db::repositories::{AnswerRepo, QuestionRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_question(title: &str, author_id: i64) -> CreateQuestion {
    CreateQuestion {
        title: title.to_string(),
        body: format!("{title} body"),
        author_id,
    }
}

fn new_answer(text: &str, author_id: i64) -> CreateAnswer {
    CreateAnswer {
        text: text.to_string(),
        author_id,
    }
}

// ---------------------------------------------------------------------------
// Create / find
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_sets_defaults(pool: PgPool) {
    let q = QuestionRepo::create(&pool, &new_question("Q1", 10))
        .await
        .unwrap();

    assert_eq!(q.title, "Q1");
    assert_eq!(q.author_id, 10);
    assert_eq!(q.related_answer_ids, "");
    assert!(q.preferred_answer_id.is_none());
    assert_eq!(q.created_at, q.updated_at);
    assert!(!q.is_answered());
    assert!(!q.is_resolved());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_title_returns_oldest_duplicate(pool: PgPool) {
    let first = QuestionRepo::create(&pool, &new_question("Same", 1))
        .await
        .unwrap();
    QuestionRepo::create(&pool, &new_question("Same", 2))
        .await
        .unwrap();

    let found = QuestionRepo::find_by_title(&pool, "Same")
        .await
        .unwrap()
        .expect("title should match");
    assert_eq!(found.id, first.id);

    assert!(QuestionRepo::find_by_title(&pool, "same")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_refreshes_updated_at(pool: PgPool) {
    let q = QuestionRepo::create(&pool, &new_question("Old", 1))
        .await
        .unwrap();

    let updated = QuestionRepo::update(
        &pool,
        q.id,
        &UpdateQuestion {
            title: Some("New".to_string()),
            body: None,
        },
    )
    .await
    .unwrap()
    .expect("question exists");

    assert_eq!(updated.title, "New");
    assert_eq!(updated.body, q.body);
    assert_eq!(updated.author_id, q.author_id);
    assert_eq!(updated.created_at, q.created_at);
    assert!(updated.updated_at >= q.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_is_none(pool: PgPool) {
    let result = QuestionRepo::update(&pool, 9999, &UpdateQuestion::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Relation list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attach_answer_appends_in_order_without_duplicates(pool: PgPool) {
    let q = QuestionRepo::create(&pool, &new_question("Q", 1))
        .await
        .unwrap();

    QuestionRepo::attach_answer(&pool, q.id, 7).await.unwrap();
    QuestionRepo::attach_answer(&pool, q.id, 3).await.unwrap();
    let q = QuestionRepo::attach_answer(&pool, q.id, 7)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(q.related_answer_ids, "7, 3");
    assert_eq!(q.answer_ids(), vec![7, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attach_answer_missing_question(pool: PgPool) {
    let result = QuestionRepo::attach_answer(&pool, 424242, 1).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_answered_and_resolved_partitions(pool: PgPool) {
    let lonely = QuestionRepo::create(&pool, &new_question("Lonely", 1))
        .await
        .unwrap();
    let busy = QuestionRepo::create(&pool, &new_question("Busy", 1))
        .await
        .unwrap();
    let answer = AnswerRepo::create_under_question(&pool, &new_answer("yes", 2), busy.id)
        .await
        .unwrap()
        .unwrap();

    let answered: Vec<i64> = QuestionRepo::list_answered(&pool)
        .await
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    let unanswered: Vec<i64> = QuestionRepo::list_unanswered(&pool)
        .await
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(answered, vec![busy.id]);
    assert_eq!(unanswered, vec![lonely.id]);

    // Answered but not yet resolved.
    assert_eq!(QuestionRepo::list_unresolved(&pool).await.unwrap().len(), 2);

    QuestionRepo::set_preferred_answer(&pool, busy.id, answer.id)
        .await
        .unwrap()
        .expect("answer is attached");

    let unresolved: Vec<i64> = QuestionRepo::list_unresolved(&pool)
        .await
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(unresolved, vec![lonely.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_unresolved_by_author(pool: PgPool) {
    let mine = QuestionRepo::create(&pool, &new_question("Mine", 5))
        .await
        .unwrap();
    QuestionRepo::create(&pool, &new_question("Theirs", 6))
        .await
        .unwrap();

    let listed = QuestionRepo::list_unresolved_by_author(&pool, 5)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_preferred_requires_membership(pool: PgPool) {
    let q = QuestionRepo::create(&pool, &new_question("Q", 1))
        .await
        .unwrap();
    let stray = AnswerRepo::create(&pool, &new_answer("stray", 2))
        .await
        .unwrap();

    let result = QuestionRepo::set_preferred_answer(&pool, q.id, stray.id)
        .await
        .unwrap();
    assert!(result.is_none(), "unattached answer must not become preferred");

    let q = QuestionRepo::find_by_id(&pool, q.id).await.unwrap().unwrap();
    assert!(q.preferred_answer_id.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clear_preferred_answer(pool: PgPool) {
    let q = QuestionRepo::create(&pool, &new_question("Q", 1))
        .await
        .unwrap();
    let a = AnswerRepo::create_under_question(&pool, &new_answer("a", 2), q.id)
        .await
        .unwrap()
        .unwrap();
    QuestionRepo::set_preferred_answer(&pool, q.id, a.id)
        .await
        .unwrap()
        .unwrap();

    let cleared = QuestionRepo::clear_preferred_answer(&pool, q.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!cleared.is_resolved());
    assert_eq!(cleared.answer_ids(), vec![a.id]);
}

// ---------------------------------------------------------------------------
// Cascade delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascade_removes_answers_and_replies(pool: PgPool) {
    let q = QuestionRepo::create(&pool, &new_question("Doomed", 1))
        .await
        .unwrap();
    let a1 = AnswerRepo::create_under_question(&pool, &new_answer("a1", 2), q.id)
        .await
        .unwrap()
        .unwrap();
    let a2 = AnswerRepo::create_under_question(&pool, &new_answer("a2", 3), q.id)
        .await
        .unwrap()
        .unwrap();
    let reply = AnswerRepo::create_under_answer(&pool, &new_answer("re", 4), a1.id)
        .await
        .unwrap()
        .unwrap();
    let bystander = AnswerRepo::create(&pool, &new_answer("other", 5))
        .await
        .unwrap();

    let removed = QuestionRepo::delete_cascade(&pool, q.id)
        .await
        .unwrap()
        .expect("question existed");
    assert_eq!(removed, vec![a1.id, a2.id, reply.id]);

    assert!(QuestionRepo::find_by_id(&pool, q.id).await.unwrap().is_none());
    for id in [a1.id, a2.id, reply.id] {
        assert!(AnswerRepo::find_by_id(&pool, id).await.unwrap().is_none());
    }
    assert!(AnswerRepo::find_by_id(&pool, bystander.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascade_missing_question(pool: PgPool) {
    assert!(QuestionRepo::delete_cascade(&pool, 777)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascade_tolerates_orphan_ids(pool: PgPool) {
    let q = QuestionRepo::create(&pool, &new_question("Orphans", 1))
        .await
        .unwrap();
    QuestionRepo::attach_answer(&pool, q.id, 31337).await.unwrap();

    let removed = QuestionRepo::delete_cascade(&pool, q.id)
        .await
        .unwrap()
        .unwrap();
    assert!(removed.is_empty());
}
