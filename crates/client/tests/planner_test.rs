use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use studysync_client::{
    mock::repositories::{MockAcceptedSessionSource, MockAvailabilitySource, MockSessionStore},
    planner::{CreateOutcome, SessionPlanner, Severity},
};
use studysync_core::{
    Interval,
    errors::{StudyError, StudyResult},
    models::session::{NewSession, Session},
};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, h, m, 0).unwrap()
}

fn session(id: &str, start_at: DateTime<Utc>, minutes: Option<i64>) -> Session {
    Session {
        id: id.to_string(),
        group_id: "group-1".to_string(),
        creator_id: "user-1".to_string(),
        start_at,
        duration_minutes: minutes,
        venue: None,
        topic: None,
        content_goal: None,
    }
}

fn store_listing(sessions: Vec<Session>) -> MockSessionStore {
    let mut store = MockSessionStore::new();
    store
        .expect_list_sessions()
        .withf(|group_id| group_id == "group-1")
        .times(1)
        .returning(move |_| Ok(sessions.clone()));
    store
}

#[tokio::test]
async fn test_board_without_optional_sources() {
    let store = store_listing(vec![session("s-1", at(10, 0), None)]);
    let planner = SessionPlanner::new("group-1", Arc::new(store));
    assert_eq!(planner.group_id(), "group-1");

    let board = planner.load(at(8, 0)).await.unwrap();

    assert_eq!(board.sessions.len(), 1);
    assert!(board.accepted.is_empty());
    assert!(!board.conflict.has_conflict);
    assert!(board.availability.is_none());
    assert!(board.warnings().is_empty());
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let mut store = MockSessionStore::new();
    store
        .expect_list_sessions()
        .returning(|_| Err(StudyError::Authentication("Unauthorized".to_string())));
    let planner = SessionPlanner::new("group-1", Arc::new(store));

    let err = planner.load(at(8, 0)).await.unwrap_err();

    assert!(matches!(err, StudyError::Authentication(_)));
}

#[tokio::test]
async fn test_failing_accepted_source_means_no_conflict() {
    let store = store_listing(vec![session("s-1", at(10, 0), Some(60))]);
    let mut accepted = MockAcceptedSessionSource::new();
    accepted
        .expect_accepted_sessions()
        .times(1)
        .returning(|| Err(StudyError::Unsupported("/api/my/sessions".to_string())));

    let planner =
        SessionPlanner::new("group-1", Arc::new(store)).with_accepted_source(Arc::new(accepted));
    let board = planner.load(at(8, 0)).await.unwrap();

    assert!(!board.conflict.has_conflict);
    assert!(board.accepted.is_empty());
}

#[tokio::test]
async fn test_conflict_with_accepted_session_is_reported() {
    let store = store_listing(vec![
        session("s-1", at(9, 0), Some(30)),
        session("s-2", at(9, 15), Some(30)),
    ]);
    let mut accepted = MockAcceptedSessionSource::new();
    accepted
        .expect_accepted_sessions()
        .returning(|| Ok(vec![session("s-1", at(9, 0), Some(30))]));

    let planner =
        SessionPlanner::new("group-1", Arc::new(store)).with_accepted_source(Arc::new(accepted));
    let board = planner.load(at(8, 0)).await.unwrap();

    assert!(board.conflict.has_conflict);
    let (candidate, mine) = board.conflicting_sessions().unwrap();
    assert_eq!(candidate.id, "s-1");
    assert_eq!(mine.id, "s-1");

    let warnings = board.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Confirm);
}

#[tokio::test]
async fn test_availability_is_only_queried_for_soonest_session() {
    let store = store_listing(vec![
        session("finished", at(6, 0), Some(30)),
        session("tomorrow", at(23, 0), Some(60)),
        session("ongoing", at(7, 45), Some(60)),
    ]);
    let mut availability = MockAvailabilitySource::new();
    availability
        .expect_unavailable_members()
        .withf(|group_id, window| {
            group_id == "group-1" && *window == Interval::new(at(7, 45), at(8, 45))
        })
        .times(1)
        .returning(|_, _| Ok(vec!["ana".to_string()]));

    let planner = SessionPlanner::new("group-1", Arc::new(store))
        .with_availability_source(Arc::new(availability));
    let board = planner.load(at(8, 0)).await.unwrap();

    let signal = board.availability.unwrap();
    assert_eq!(signal.session_id, "ongoing");
    assert_eq!(signal.unavailable, vec!["ana"]);
}

#[tokio::test]
async fn test_availability_failure_or_empty_list_gives_no_signal() {
    let outcomes: [StudyResult<Vec<String>>; 2] = [
        Ok(Vec::new()),
        Err(StudyError::NotFound("availability".to_string())),
    ];
    for outcome in outcomes {
        let store = store_listing(vec![session("s-1", at(10, 0), None)]);
        let mut availability = MockAvailabilitySource::new();
        let mut outcome = Some(outcome);
        availability
            .expect_unavailable_members()
            .times(1)
            .returning(move |_, _| outcome.take().unwrap());

        let planner = SessionPlanner::new("group-1", Arc::new(store))
            .with_availability_source(Arc::new(availability));
        let board = planner.load(at(8, 0)).await.unwrap();

        assert!(board.availability.is_none());
        assert!(board.warnings().is_empty());
    }
}

#[tokio::test]
async fn test_no_availability_query_when_everything_is_past() {
    let store = store_listing(vec![session("old", at(5, 0), Some(60))]);
    let mut availability = MockAvailabilitySource::new();
    availability.expect_unavailable_members().times(0);

    let planner = SessionPlanner::new("group-1", Arc::new(store))
        .with_availability_source(Arc::new(availability));
    let board = planner.load(at(8, 0)).await.unwrap();

    assert!(board.availability.is_none());
}

#[tokio::test]
async fn test_declined_conflict_sends_nothing() {
    let mut store = MockSessionStore::new();
    store.expect_create_session().times(0);
    let planner = SessionPlanner::new("group-1", Arc::new(store));
    let accepted = vec![session("mine", at(10, 30), Some(30))];
    let asked = AtomicBool::new(false);

    let outcome = planner
        .create_session(&NewSession::starting_at(at(10, 0)), &accepted, |conflict| {
            asked.store(true, Ordering::SeqCst);
            assert!(conflict.has_conflict);
            false
        })
        .await
        .unwrap();

    assert!(asked.load(Ordering::SeqCst));
    assert!(matches!(outcome, CreateOutcome::Cancelled(c) if c.has_conflict));
}

#[tokio::test]
async fn test_confirmed_conflict_is_created() {
    let mut store = MockSessionStore::new();
    store
        .expect_create_session()
        .withf(|group_id, proposal| group_id == "group-1" && proposal.start_at == at(10, 0))
        .times(1)
        .returning(|_, proposal| {
            Ok(session("new", proposal.start_at, proposal.duration_minutes))
        });
    let planner = SessionPlanner::new("group-1", Arc::new(store));
    let accepted = vec![session("mine", at(10, 30), Some(30))];

    let outcome = planner
        .create_session(&NewSession::starting_at(at(10, 0)), &accepted, |_| true)
        .await
        .unwrap();

    match outcome {
        CreateOutcome::Created(created) => assert_eq!(created.id, "new"),
        other => panic!("expected a created session, got {:?}", other),
    }
}

#[tokio::test]
async fn test_clear_proposal_skips_confirmation() {
    let mut store = MockSessionStore::new();
    store
        .expect_create_session()
        .times(1)
        .returning(|_, proposal| Ok(session("new", proposal.start_at, proposal.duration_minutes)));
    let planner = SessionPlanner::new("group-1", Arc::new(store));
    let accepted = vec![session("mine", at(10, 30), Some(30))];
    let proposal = NewSession::starting_at(at(11, 0)).with_duration(45);

    assert!(!planner.check_proposal(&proposal, &accepted).has_conflict);

    let outcome = planner
        .create_session(&proposal, &accepted, |_| panic!("should not ask"))
        .await
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::Created(_)));
}

#[tokio::test]
async fn test_delete_delegates_to_store() {
    let mut store = MockSessionStore::new();
    store
        .expect_delete_session()
        .withf(|group_id, session_id| group_id == "group-1" && session_id == "s-9")
        .times(1)
        .returning(|_, _| Ok(()));
    let planner = SessionPlanner::new("group-1", Arc::new(store));

    planner.delete_session("s-9").await.unwrap();
}

#[tokio::test]
async fn test_deletable_sessions_belong_to_creator() {
    let mut theirs = session("theirs", at(12, 0), None);
    theirs.creator_id = "user-2".to_string();
    let store = store_listing(vec![session("mine", at(10, 0), None), theirs]);
    let planner = SessionPlanner::new("group-1", Arc::new(store));

    let board = planner.load(at(8, 0)).await.unwrap();
    let ids: Vec<_> = board.deletable_by("user-1").map(|s| s.id.as_str()).collect();

    assert_eq!(ids, vec!["mine"]);
}
