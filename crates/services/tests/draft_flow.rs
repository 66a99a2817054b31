mod common;

use std::sync::Arc;

use assess_core::model::{AssessmentId, DraftError, QuestionDraft};
use services::{DraftAuthoringService, DraftServiceError, NoticeLevel};
use storage::{DraftKey, DraftRepository, InMemoryRepository};

use common::{FakeApi, RecordingNotifier};

struct Harness {
    api: Arc<FakeApi>,
    repo: Arc<InMemoryRepository>,
    notifier: Arc<RecordingNotifier>,
    service: DraftAuthoringService,
}

fn harness() -> Harness {
    let api = Arc::new(FakeApi::new(None));
    let repo = Arc::new(InMemoryRepository::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = DraftAuthoringService::new(api.clone(), repo.clone(), notifier.clone());
    Harness {
        api,
        repo,
        notifier,
        service,
    }
}

fn key() -> DraftKey {
    DraftKey::new("new-assessment").unwrap()
}

fn question(text: &str) -> QuestionDraft {
    QuestionDraft::new(text, vec!["yes".into(), "no".into()], "yes")
}

#[tokio::test]
async fn saved_questions_survive_reopen_and_are_not_resent() {
    let h = harness();
    let mut session = h.service.open(key()).await.unwrap();
    session
        .set_header("Ownership basics", None, None)
        .await
        .unwrap();
    let index = session.add_question(question("Is a move a copy?")).await.unwrap();

    let first = session.save_question(index).await.unwrap();
    assert_eq!(h.api.created_assessments.lock().unwrap().len(), 1);
    assert_eq!(h.api.created_questions.lock().unwrap().len(), 1);
    drop(session);

    let mut reopened = h.service.open(key()).await.unwrap();
    assert_eq!(reopened.draft().title, "Ownership basics");
    assert_eq!(reopened.draft().remote_id, Some(AssessmentId::new(100)));
    assert_eq!(reopened.draft().questions[0].remote_id, Some(first));
    assert_eq!(reopened.draft().pending_count(), 0);

    assert_eq!(reopened.save_question(index).await.unwrap(), first);
    assert_eq!(h.api.created_questions.lock().unwrap().len(), 1);
    assert!(h.api.updated_questions.lock().unwrap().is_empty());

    reopened
        .edit_question(index, "Is a move a bitwise copy?", vec!["yes".into(), "no".into()], "yes")
        .await
        .unwrap();
    assert_eq!(reopened.save_question(index).await.unwrap(), first);

    let updates = h.api.updated_questions.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1, first);
    assert_eq!(updates[0].2.question, "Is a move a bitwise copy?");
}

#[tokio::test]
async fn partial_publish_keeps_progress_for_retry() {
    let h = harness();
    let mut session = h.service.open(key()).await.unwrap();
    session.set_header("Lifetimes", None, None).await.unwrap();
    session.add_question(question("one")).await.unwrap();
    session.add_question(question("two")).await.unwrap();
    session.add_question(question("three")).await.unwrap();
    h.api.fail_question("two");

    let err = session.publish().await.unwrap_err();
    assert!(matches!(err, DraftServiceError::Api(_)));
    assert_eq!(session.draft().pending_count(), 2);
    assert_eq!(h.notifier.last().unwrap().level, NoticeLevel::Error);
    assert!(h.repo.load_draft(&key()).await.unwrap().is_some());
    drop(session);

    h.api.clear_question_failures();
    let mut retry = h.service.open(key()).await.unwrap();
    let assessment_id = retry.publish().await.unwrap();

    assert_eq!(assessment_id, AssessmentId::new(100));
    assert_eq!(h.api.created_assessments.lock().unwrap().len(), 1);
    let texts: Vec<_> = h
        .api
        .created_questions
        .lock()
        .unwrap()
        .iter()
        .map(|(_, input)| input.question.clone())
        .collect();
    assert_eq!(texts, vec!["one", "two", "three"]);

    assert!(h.repo.load_draft(&key()).await.unwrap().is_none());
    assert!(retry.draft().questions.is_empty());
    assert_eq!(h.notifier.last().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn header_change_after_creation_reaches_the_backend() {
    let h = harness();
    let mut session = h.service.open(key()).await.unwrap();
    session.set_header("Draft title", None, None).await.unwrap();
    session.add_question(question("Borrowed?")).await.unwrap();
    session.save_question(0).await.unwrap();
    assert!(h.api.updated_assessments.lock().unwrap().is_empty());

    session
        .set_header("Final title", Some("About borrowing".into()), None)
        .await
        .unwrap();
    drop(session);

    let mut reopened = h.service.open(key()).await.unwrap();
    assert!(reopened.draft().header_needs_save());
    let id = reopened.publish().await.unwrap();

    {
        let updates = h.api.updated_assessments.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, id);
        assert_eq!(updates[0].1.title, "Final title");
        assert_eq!(updates[0].1.description.as_deref(), Some("About borrowing"));
    }
    assert_eq!(h.api.created_assessments.lock().unwrap().len(), 1);
    assert_eq!(h.api.created_questions.lock().unwrap().len(), 1);
    assert!(h.repo.load_draft(&key()).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_draft_is_never_sent() {
    let h = harness();
    let mut session = h.service.open(key()).await.unwrap();
    session.set_header("Traits", None, None).await.unwrap();

    let err = session.publish().await.unwrap_err();
    assert!(matches!(err, DraftServiceError::Draft(DraftError::NoQuestions)));

    session
        .add_question(QuestionDraft::new("Pick one", vec!["a".into(), "b".into()], "c"))
        .await
        .unwrap();
    let err = session.save_question(0).await.unwrap_err();
    assert!(matches!(
        err,
        DraftServiceError::Draft(DraftError::CorrectAnswerNotAnOption { index: 0 })
    ));
    assert!(matches!(
        session.save_question(7).await,
        Err(DraftServiceError::Draft(DraftError::NoSuchQuestion { index: 7 }))
    ));

    assert!(h.api.created_assessments.lock().unwrap().is_empty());
    assert!(h.api.created_questions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn discard_removes_the_stored_draft() {
    let h = harness();
    let mut session = h.service.open(key()).await.unwrap();
    session.set_header("Generics", None, None).await.unwrap();
    session.add_question(question("T?")).await.unwrap();
    assert_eq!(h.repo.list_draft_keys().await.unwrap(), vec![key()]);

    session.discard().await.unwrap();
    assert!(session.draft().questions.is_empty());
    assert!(h.repo.list_draft_keys().await.unwrap().is_empty());

    let fresh = h.service.open(key()).await.unwrap();
    assert!(fresh.draft().title.is_empty());
    assert_eq!(fresh.draft().remote_id, None);
}
