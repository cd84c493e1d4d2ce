//! End-to-end pipeline scenarios against realistic course pages.

use std::sync::Arc;
use std::time::Duration;

use courseflow::testing::{MockFailure, MockInference, StaticPage};
use courseflow::{
    AssignmentStatus, ExtractionMethod, MemoryStore, Orchestrator, PageEvent, PageSnapshot,
    PipelineConfig, RawEvent, RecordStore, RunOutcome, Scheduler,
};

const ASSIGNMENTS_URL: &str = "https://lms.example.edu/courses/42/assignments";

/// A course-assignments page with two real rows and one garbage row.
const COURSE_PAGE: &str = r#"
    <html><body>
    <nav><a href="/dashboard">Dashboard</a></nav>
    <main>
      <h1 class="course-header">Biology 101</h1>
      <ul class="assignment-group">
        <li class="assignment">
          <a class="ig-title" href="/courses/42/assignments/7">Essay 1</a>
          <span class="due-date">Due Jun 15 at 11:59pm</span>
          <span class="score">92/100</span> graded · 100 pts
        </li>
        <li class="assignment">
          <a class="ig-title" href="/courses/42/assignments/8">Quiz 2</a>
        </li>
        <li class="assignment">   </li>
      </ul>
    </main>
    </body></html>
"#;

fn ai_events() -> Vec<RawEvent> {
    let mut essay = RawEvent::new("Essay 1");
    essay.due_date = Some("Jun 15 at 11:59pm".into());
    essay.grade_text = Some("92/100".into());
    essay.status_text = Some("graded".into());
    essay.url = Some("/courses/42/assignments/7".into());

    let quiz = RawEvent::new("Quiz 2");
    let garbage = RawEvent::new("   ");

    vec![essay, quiz, garbage]
}

#[tokio::test]
async fn course_page_yields_two_records_with_expected_statuses() {
    let inference = Arc::new(MockInference::new().with_events(ai_events()));
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(
        inference.clone(),
        store.clone(),
        PipelineConfig::default(),
    );

    let page = PageSnapshot::new(ASSIGNMENTS_URL, COURSE_PAGE).with_title("Assignments");
    let outcome = orchestrator.run(&page).await;

    // Garbage row dropped; two canonical records
    assert_eq!(
        outcome,
        RunOutcome::Completed {
            found: 2,
            new_records: 2
        }
    );

    let snapshot = store.load().await.unwrap();
    assert_eq!(snapshot.assignments.len(), 2);
    assert_eq!(snapshot.unsynced_count, 2);

    let essay = snapshot
        .assignments
        .iter()
        .find(|a| a.title == "Essay 1")
        .unwrap();
    assert_eq!(essay.status, AssignmentStatus::Graded);
    assert_eq!(essay.course, "Biology 101");
    assert_eq!(essay.url, "https://lms.example.edu/courses/42/assignments/7");
    let grade = essay.grade.as_ref().unwrap();
    assert_eq!(grade.points, Some(92.0));
    assert_eq!(grade.max_points, Some(100.0));
    assert_eq!(grade.percentage, Some(92.0));
    let due = essay.due_date.expect("due date parses");
    use chrono::{Datelike, Local, Timelike};
    let due_local = due.with_timezone(&Local);
    assert_eq!((due_local.month(), due_local.day()), (6, 15));
    assert_eq!((due_local.hour(), due_local.minute()), (23, 59));

    let quiz = snapshot
        .assignments
        .iter()
        .find(|a| a.title == "Quiz 2")
        .unwrap();
    assert_eq!(quiz.status, AssignmentStatus::Pending);
    assert!(quiz.due_date.is_none());
    assert!(quiz.grade.is_none());
}

#[tokio::test]
async fn rerunning_an_unchanged_page_is_idempotent() {
    let inference = Arc::new(MockInference::new().with_events(ai_events()));
    let store = Arc::new(MemoryStore::new());
    let config = PipelineConfig::default().with_cooldown(Duration::from_millis(0));
    let orchestrator = Orchestrator::new(inference, store.clone(), config);

    let page = PageSnapshot::new(ASSIGNMENTS_URL, COURSE_PAGE);
    orchestrator.run(&page).await;
    let second = orchestrator.run(&page).await;

    assert_eq!(
        second,
        RunOutcome::Completed {
            found: 2,
            new_records: 0
        }
    );
    assert_eq!(store.record_count(), 2);
}

#[tokio::test]
async fn every_failure_mode_falls_back_to_the_heuristic_result() {
    for failure in [
        MockFailure::Network,
        MockFailure::Http(500),
        MockFailure::Malformed,
    ] {
        let inference = Arc::new(MockInference::new().with_failure(failure));
        let store = Arc::new(MemoryStore::new());
        let orchestrator =
            Orchestrator::new(inference, store.clone(), PipelineConfig::default());

        let page = PageSnapshot::new(ASSIGNMENTS_URL, COURSE_PAGE);
        let outcome = orchestrator.run(&page).await;

        // Never throws, and matches what the heuristic alone would produce
        assert!(
            matches!(outcome, RunOutcome::Completed { found: 2, .. }),
            "failure mode {failure:?} did not fall back cleanly: {outcome:?}"
        );
        let snapshot = store.load().await.unwrap();
        let mut titles: Vec<&str> =
            snapshot.assignments.iter().map(|a| a.title.as_str()).collect();
        titles.sort_unstable();
        assert_eq!(titles, ["Essay 1", "Quiz 2"]);
        assert!(snapshot
            .assignments
            .iter()
            .all(|a| a.extraction_method == ExtractionMethod::Fallback));
    }
}

#[tokio::test(start_paused = true)]
async fn scheduler_and_cooldown_collapse_trigger_bursts() {
    let inference = Arc::new(MockInference::new().with_events(ai_events()));
    let store = Arc::new(MemoryStore::new());
    let config = PipelineConfig::default()
        .with_cooldown(Duration::from_secs(8))
        .with_settle_delay(Duration::from_millis(500))
        .with_load_stage_delays(vec![]);
    let orchestrator = Arc::new(Orchestrator::new(
        inference.clone(),
        store.clone(),
        config.clone(),
    ));
    let page = Arc::new(StaticPage::new(PageSnapshot::new(
        ASSIGNMENTS_URL,
        COURSE_PAGE,
    )));
    let scheduler = Scheduler::spawn(orchestrator, page, config);

    // Two triggers inside the cooldown window: one run
    scheduler.notify(PageEvent::Mutation {
        added_text: vec!["assignment added".into()],
    });
    tokio::time::sleep(Duration::from_secs(2)).await;
    scheduler.notify(PageEvent::Navigation {
        url: ASSIGNMENTS_URL.into(),
    });
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(inference.call_count(), 1);

    // A third trigger after the cooldown: a second run (served from cache,
    // so the service still saw exactly one request)
    tokio::time::sleep(Duration::from_secs(8)).await;
    scheduler.notify(PageEvent::Mutation {
        added_text: vec!["assignment updated".into()],
    });
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(store.record_count(), 2);
    assert_eq!(inference.call_count(), 1);
    scheduler.shutdown();
}

#[tokio::test]
async fn dashboard_page_with_no_assignments_reports_no_candidates() {
    let inference = Arc::new(MockInference::new());
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(inference, store.clone(), PipelineConfig::default());

    let page = PageSnapshot::new(
        "https://lms.example.edu/dashboard",
        "<html><body><main><p>Welcome back!</p></main></body></html>",
    );
    let outcome = orchestrator.run(&page).await;

    assert_eq!(outcome, RunOutcome::NoCandidates);
    assert_eq!(store.record_count(), 0);
}

#[tokio::test]
async fn recovery_after_service_outage_uses_ai_again() {
    let inference = Arc::new(
        MockInference::new()
            .with_events(ai_events())
            .with_failure(MockFailure::Network),
    );
    let store = Arc::new(MemoryStore::new());
    let config = PipelineConfig::default().with_cooldown(Duration::from_millis(0));
    let orchestrator = Orchestrator::new(inference.clone(), store.clone(), config);

    // Outage: fallback records land first
    let page = PageSnapshot::new(ASSIGNMENTS_URL, COURSE_PAGE);
    orchestrator.run(&page).await;

    let outage_calls = inference.call_count();
    assert_eq!(store.record_count(), 2);

    // Service recovers and the page changes (new content hash, so the
    // cache misses); the AI path resumes and the merge stays idempotent
    inference.recover();
    let changed = PageSnapshot::new(ASSIGNMENTS_URL, &COURSE_PAGE.replace("pts", "points"));
    orchestrator.run(&changed).await;

    assert_eq!(inference.call_count(), outage_calls + 1);
    let snapshot = store.load().await.unwrap();
    assert_eq!(snapshot.assignments.len(), 2);
    assert_eq!(
        snapshot
            .assignments
            .iter()
            .filter(|a| a.title == "Essay 1")
            .count(),
        1
    );
}
