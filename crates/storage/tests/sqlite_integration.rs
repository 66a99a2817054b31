use assess_core::model::{AssessmentDraft, AssessmentId, QuestionDraft, QuestionId};
use storage::repository::{DraftKey, DraftRepository};
use storage::sqlite::SqliteRepository;

fn sample_draft() -> AssessmentDraft {
    let mut draft = AssessmentDraft::new("Borrowing");
    draft.description = Some("References and lifetimes".into());
    draft.remote_id = Some(AssessmentId::new(12));
    let idx = draft.push_question(QuestionDraft::new(
        "How many mutable borrows at once?",
        vec!["one".into(), "many".into()],
        "one",
    ));
    draft.questions[idx].remote_id = Some(QuestionId::new(99));
    draft.questions[idx].dirty = false;
    draft.push_question(QuestionDraft::new(
        "Is `&T` Copy?",
        vec!["yes".into(), "no".into()],
        "yes",
    ));
    draft
}

#[tokio::test]
async fn sqlite_round_trips_draft_and_reconciliation_state() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_drafts?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = DraftKey::new("assessment-draft").unwrap();
    repo.save_draft(&key, &sample_draft()).await.unwrap();

    let loaded = repo.load_draft(&key).await.unwrap().expect("draft stored");
    assert_eq!(loaded, sample_draft());
    assert_eq!(loaded.pending_count(), 1);
}

#[tokio::test]
async fn sqlite_save_overwrites_and_clear_removes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_drafts_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // Migrations are idempotent.
    repo.migrate().await.expect("migrate twice");

    let key = DraftKey::new("k1").unwrap();
    let mut draft = sample_draft();
    repo.save_draft(&key, &draft).await.unwrap();
    draft.title = "Borrowing, revised".into();
    repo.save_draft(&key, &draft).await.unwrap();

    let loaded = repo.load_draft(&key).await.unwrap().unwrap();
    assert_eq!(loaded.title, "Borrowing, revised");

    let other = DraftKey::new("k0").unwrap();
    repo.save_draft(&other, &sample_draft()).await.unwrap();
    let keys = repo.list_draft_keys().await.unwrap();
    assert_eq!(keys, vec![other.clone(), key.clone()]);

    assert!(repo.clear_draft(&key).await.unwrap());
    assert!(repo.load_draft(&key).await.unwrap().is_none());
    assert!(repo.load_draft(&other).await.unwrap().is_some());
}
