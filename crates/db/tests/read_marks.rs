//! Integration tests for read tracking.

use askboard_db::models::answer::CreateAnswer;
use askboard_db::models::question::CreateQuestion;
use askboard_db::repositories::{AnswerRepo, QuestionRepo, ReadMarkRepo};
use sqlx::PgPool;

async fn seed_answers(pool: &PgPool, count: usize) -> Vec<i64> {
    let q = QuestionRepo::create(
        pool,
        &CreateQuestion {
            title: "Q".to_string(),
            body: "B".to_string(),
            author_id: 1,
        },
    )
    .await
    .unwrap();

    let mut ids = Vec::new();
    for i in 0..count {
        let a = AnswerRepo::create_under_question(
            pool,
            &CreateAnswer {
                text: format!("answer {i}"),
                author_id: 2,
            },
            q.id,
        )
        .await
        .unwrap()
        .unwrap();
        ids.push(a.id);
    }
    ids
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_read_creates_then_is_idempotent(pool: PgPool) {
    let ids = seed_answers(&pool, 1).await;

    assert!(ReadMarkRepo::find(&pool, ids[0], 7).await.unwrap().is_none());

    let first = ReadMarkRepo::mark_read(&pool, ids[0], 7).await.unwrap();
    assert!(first.is_read);

    let second = ReadMarkRepo::mark_read(&pool, ids[0], 7).await.unwrap();
    assert!(second.is_read);
    assert_eq!(second.updated_at, first.updated_at, "no-op must not write");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_unread_flips_existing_mark(pool: PgPool) {
    let ids = seed_answers(&pool, 1).await;

    assert!(ReadMarkRepo::mark_unread(&pool, ids[0], 7)
        .await
        .unwrap()
        .is_none());

    ReadMarkRepo::mark_read(&pool, ids[0], 7).await.unwrap();
    let mark = ReadMarkRepo::mark_unread(&pool, ids[0], 7)
        .await
        .unwrap()
        .unwrap();
    assert!(!mark.is_read);

    let mark = ReadMarkRepo::mark_read(&pool, ids[0], 7).await.unwrap();
    assert!(mark.is_read);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_read_unknown_answer_is_rejected(pool: PgPool) {
    let result = ReadMarkRepo::mark_read(&pool, 123456, 7).await;
    assert!(result.is_err(), "foreign key must reject unknown answers");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unread_counts(pool: PgPool) {
    let ids = seed_answers(&pool, 3).await;

    assert_eq!(
        ReadMarkRepo::count_unread_among(&pool, 7, &ids).await.unwrap(),
        3
    );
    assert_eq!(ReadMarkRepo::count_unread_all(&pool, 7).await.unwrap(), 3);

    ReadMarkRepo::mark_read(&pool, ids[1], 7).await.unwrap();

    assert_eq!(
        ReadMarkRepo::count_unread_among(&pool, 7, &ids).await.unwrap(),
        2
    );
    assert_eq!(ReadMarkRepo::count_unread_all(&pool, 7).await.unwrap(), 2);
    // Another user's marks are independent.
    assert_eq!(ReadMarkRepo::count_unread_all(&pool, 8).await.unwrap(), 3);

    assert_eq!(
        ReadMarkRepo::read_answer_ids(&pool, 7, &ids).await.unwrap(),
        vec![ids[1]]
    );
    assert_eq!(
        ReadMarkRepo::count_unread_among(&pool, 7, &[]).await.unwrap(),
        0
    );
}
