//! Integration tests for the answers repository: nested replies,
//! transactional create-then-attach, and subtree deletion.

use askboard_db::models::answer::{CreateAnswer, UpdateAnswer};
use askboard_db::models::question::CreateQuestion;
use askboard_db::repositories::{AnswerRepo, QuestionRepo, ReadMarkRepo};
use sqlx::PgPool;

fn new_answer(text: &str) -> CreateAnswer {
    CreateAnswer {
        text: text.to_string(),
        author_id: 20,
    }
}

async fn seed_question(pool: &PgPool) -> i64 {
    QuestionRepo::create(
        pool,
        &CreateQuestion {
            title: "Q".to_string(),
            body: "body".to_string(),
            author_id: 10,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_under_missing_question_writes_nothing(pool: PgPool) {
    let result = AnswerRepo::create_under_question(&pool, &new_answer("lost"), 5555)
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(AnswerRepo::list_all(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_under_missing_parent_writes_nothing(pool: PgPool) {
    let result = AnswerRepo::create_under_answer(&pool, &new_answer("lost"), 5555)
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(AnswerRepo::list_all(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nested_replies_are_recorded_on_parent(pool: PgPool) {
    let qid = seed_question(&pool).await;
    let parent = AnswerRepo::create_under_question(&pool, &new_answer("parent"), qid)
        .await
        .unwrap()
        .unwrap();
    let r1 = AnswerRepo::create_under_answer(&pool, &new_answer("r1"), parent.id)
        .await
        .unwrap()
        .unwrap();
    let r2 = AnswerRepo::create_under_answer(&pool, &new_answer("r2"), parent.id)
        .await
        .unwrap()
        .unwrap();

    let parent = AnswerRepo::find_by_id(&pool, parent.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parent.reply_ids(), vec![r1.id, r2.id]);

    // Replies are not attached to the question itself.
    let q = QuestionRepo::find_by_id(&pool, qid).await.unwrap().unwrap();
    assert_eq!(q.answer_ids(), vec![parent.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_ids_skips_missing(pool: PgPool) {
    let a = AnswerRepo::create(&pool, &new_answer("a")).await.unwrap();
    let b = AnswerRepo::create(&pool, &new_answer("b")).await.unwrap();

    let found = AnswerRepo::find_by_ids(&pool, &[b.id, 99999, a.id])
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|x| x.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);

    assert!(AnswerRepo::find_by_ids(&pool, &[]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_text(pool: PgPool) {
    let a = AnswerRepo::create(&pool, &new_answer("before")).await.unwrap();
    let updated = AnswerRepo::update(
        &pool,
        a.id,
        &UpdateAnswer {
            text: Some("after".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.text, "after");
    assert_eq!(updated.author_id, a.author_id);

    assert!(AnswerRepo::update(&pool, 8888, &UpdateAnswer::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascade_removes_subtree_and_unlinks_parents(pool: PgPool) {
    let qid = seed_question(&pool).await;
    let keep = AnswerRepo::create_under_question(&pool, &new_answer("keep"), qid)
        .await
        .unwrap()
        .unwrap();
    let doomed = AnswerRepo::create_under_question(&pool, &new_answer("doomed"), qid)
        .await
        .unwrap()
        .unwrap();
    let child = AnswerRepo::create_under_answer(&pool, &new_answer("child"), doomed.id)
        .await
        .unwrap()
        .unwrap();
    let grandchild = AnswerRepo::create_under_answer(&pool, &new_answer("gc"), child.id)
        .await
        .unwrap()
        .unwrap();
    QuestionRepo::set_preferred_answer(&pool, qid, doomed.id)
        .await
        .unwrap()
        .unwrap();
    ReadMarkRepo::mark_read(&pool, child.id, 1).await.unwrap();

    let removed = AnswerRepo::delete_cascade(&pool, doomed.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(removed, vec![doomed.id, child.id, grandchild.id]);

    let q = QuestionRepo::find_by_id(&pool, qid).await.unwrap().unwrap();
    assert_eq!(q.answer_ids(), vec![keep.id]);
    assert!(q.preferred_answer_id.is_none(), "deleted preferred answer is cleared");

    assert!(ReadMarkRepo::find(&pool, child.id, 1).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_reply_unlinks_from_parent_answer(pool: PgPool) {
    let parent = AnswerRepo::create(&pool, &new_answer("parent")).await.unwrap();
    let reply = AnswerRepo::create_under_answer(&pool, &new_answer("reply"), parent.id)
        .await
        .unwrap()
        .unwrap();

    AnswerRepo::delete_cascade(&pool, reply.id)
        .await
        .unwrap()
        .unwrap();

    let parent = AnswerRepo::find_by_id(&pool, parent.id)
        .await
        .unwrap()
        .unwrap();
    assert!(parent.reply_ids().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascade_survives_reply_cycle(pool: PgPool) {
    let a = AnswerRepo::create(&pool, &new_answer("a")).await.unwrap();
    let b = AnswerRepo::create_under_answer(&pool, &new_answer("b"), a.id)
        .await
        .unwrap()
        .unwrap();
    // Force a cycle b -> a.
    AnswerRepo::attach_reply(&pool, b.id, a.id).await.unwrap().unwrap();

    let removed = AnswerRepo::delete_cascade(&pool, a.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(removed, vec![a.id, b.id]);
    assert!(AnswerRepo::list_all(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascade_missing_answer(pool: PgPool) {
    assert!(AnswerRepo::delete_cascade(&pool, 4040)
        .await
        .unwrap()
        .is_none());
}
