//! End-to-end runs against mock TestRail and Jira servers with an
//! in-memory SQLite state store.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{api, first_page, jira_config, settings, unthrottled, COVERAGE_FIELD, PASS_RATE_FIELD};
use coverage_sync::adapters::plugins::{JiraClient, TestRailClient};
use coverage_sync::adapters::sqlite::{create_migrated_test_pool, SqliteStateStore};
use coverage_sync::application::ScheduledTask;
use coverage_sync::domain::models::{Checkpoint, Config, IssuePercentages, PercentagePair};
use coverage_sync::domain::ports::{CheckpointStore, SettingsStore};
use coverage_sync::services::{InvocationResponse, Publisher, SyncJob, TargetFields};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

async fn page(server: &mut ServerGuard, method: &str, field: &str, items: Value, hits: usize) -> Mock {
    server
        .mock("GET", first_page(method).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ field: items }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Projects 2, 1, 3 (unsorted on the wire).
///
/// - project 1, milestone 10 -> ABC-1, ABC-2: one plan, 80% coverage / 60% pass
/// - project 2, milestone 20 -> ABC-1: one run, 40% / 40%
/// - project 2, milestone 21: no refs
/// - project 3: no milestones
async fn mock_testrail(server: &mut ServerGuard, hits: usize) -> Vec<Mock> {
    vec![
        page(server, "get_projects", "projects", json!([{ "id": 2 }, { "id": 1 }, { "id": 3 }]), hits).await,
        page(
            server,
            "get_milestones/1",
            "milestones",
            json!([{ "id": 10, "name": "R1", "refs": "ABC-1, ABC-2" }]),
            hits,
        )
        .await,
        page(
            server,
            "get_milestones/2",
            "milestones",
            json!([{ "id": 20, "refs": "ABC-1" }, { "id": 21, "refs": null }]),
            hits,
        )
        .await,
        page(server, "get_milestones/3", "milestones", json!([]), hits).await,
        page(server, "get_plans/1&milestone_id=10", "plans", json!([{ "id": 100 }]), hits).await,
        server
            .mock("GET", api("get_plan/100").as_str())
            .with_status(200)
            .with_body(
                json!({ "id": 100, "passed_count": 6, "failed_count": 2, "untested_count": 2 }).to_string(),
            )
            .expect(hits)
            .create_async()
            .await,
        page(server, "get_runs/1&milestone_id=10", "runs", json!([]), hits).await,
        page(server, "get_plans/2&milestone_id=20", "plans", json!([]), hits).await,
        page(
            server,
            "get_runs/2&milestone_id=20",
            "runs",
            json!([{ "id": 7, "passed_count": 4, "untested_count": "6" }]),
            hits,
        )
        .await,
    ]
}

async fn mock_jira_update(server: &mut ServerGuard, key: &str, coverage: u8, pass_rate: u8, hits: usize) -> Mock {
    server
        .mock("PUT", format!("/rest/api/3/issue/{key}").as_str())
        .match_body(Matcher::Json(json!({
            "fields": { COVERAGE_FIELD: coverage, PASS_RATE_FIELD: pass_rate }
        })))
        .with_status(204)
        .expect(hits)
        .create_async()
        .await
}

fn config(jira_url: &str) -> Config {
    Config {
        testrail: unthrottled(),
        jira: jira_config(jira_url),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_full_cycle_publishes_averages_and_restarts() {
    common::setup_test_logging();
    let mut testrail = Server::new_async().await;
    let mut jira = Server::new_async().await;

    let testrail_mocks = mock_testrail(&mut testrail, 2).await;
    let abc1 = mock_jira_update(&mut jira, "ABC-1", 60, 50, 2).await;
    let abc2 = mock_jira_update(&mut jira, "ABC-2", 80, 60, 2).await;

    let pool = create_migrated_test_pool().await.unwrap();
    let store = SqliteStateStore::new(pool.clone());
    store.save_settings(&settings(&testrail.url())).await.unwrap();

    let task = ScheduledTask::new(config(&jira.url()), pool);

    let report = task.run_once().await.unwrap();
    assert_eq!(report.project_count, 3);
    assert_eq!(report.start_index, 0);
    assert_eq!(report.next_index, 3);
    assert_eq!(report.milestones_aggregated, 2);
    assert_eq!(report.milestones_skipped, 1);
    assert_eq!(report.issues_published, 2);
    assert!(report.issues_failed.is_empty());
    assert!(report.cycle_complete);

    let expected: IssuePercentages = [
        (
            "ABC-1".to_string(),
            vec![PercentagePair::new(80, 60), PercentagePair::new(40, 40)],
        ),
        ("ABC-2".to_string(), vec![PercentagePair::new(80, 60)]),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        store.load().await.unwrap(),
        Checkpoint {
            last_index: 3,
            jira_percentages: expected.clone(),
        }
    );

    // The cursor sits at the end, so the next invocation starts a new cycle
    // instead of stacking a second copy of every sample.
    assert_eq!(task.invoke().await, InvocationResponse::success());
    assert_eq!(store.load().await.unwrap().jira_percentages, expected);

    for mock in testrail_mocks {
        mock.assert_async().await;
    }
    abc1.assert_async().await;
    abc2.assert_async().await;
}

#[tokio::test]
async fn test_upstream_failure_keeps_checkpoint() {
    let mut testrail = Server::new_async().await;
    let mut jira = Server::new_async().await;

    page(&mut testrail, "get_projects", "projects", json!([{ "id": 1 }, { "id": 2 }]), 1).await;
    testrail
        .mock("GET", first_page("get_milestones/2").as_str())
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;
    let untouched = jira
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let pool = create_migrated_test_pool().await.unwrap();
    let store = Arc::new(SqliteStateStore::new(pool));
    let before = Checkpoint {
        last_index: 1,
        jira_percentages: [("ABC-1".to_string(), vec![PercentagePair::new(50, 25)])]
            .into_iter()
            .collect(),
    };
    store.save(&before).await.unwrap();

    let job = SyncJob::new(
        Arc::new(TestRailClient::new(&settings(&testrail.url()), &unthrottled()).unwrap()),
        Publisher::new(
            Arc::new(JiraClient::new(&jira_config(&jira.url())).unwrap()),
            TargetFields {
                coverage_field_id: COVERAGE_FIELD.to_string(),
                pass_rate_field_id: PASS_RATE_FIELD.to_string(),
            },
        ),
        store.clone(),
        Duration::from_secs(840),
    );

    let response = job.invoke().await;
    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, "Error processing scheduled task");
    assert_eq!(store.load().await.unwrap(), before);
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_jira_rejection_does_not_fail_run() {
    let mut testrail = Server::new_async().await;
    let mut jira = Server::new_async().await;

    page(&mut testrail, "get_projects", "projects", json!([{ "id": 1 }]), 1).await;
    page(
        &mut testrail,
        "get_milestones/1",
        "milestones",
        json!([{ "id": 10, "refs": "GONE-1,ABC-9" }]),
        1,
    )
    .await;
    page(&mut testrail, "get_plans/1&milestone_id=10", "plans", json!([]), 1).await;
    page(
        &mut testrail,
        "get_runs/1&milestone_id=10",
        "runs",
        json!([{ "passed_count": 1, "failed_count": 1 }]),
        1,
    )
    .await;

    jira.mock("PUT", "/rest/api/3/issue/GONE-1")
        .with_status(404)
        .create_async()
        .await;
    let ok = mock_jira_update(&mut jira, "ABC-9", 100, 50, 1).await;

    let pool = create_migrated_test_pool().await.unwrap();
    SqliteStateStore::new(pool.clone())
        .save_settings(&settings(&testrail.url()))
        .await
        .unwrap();

    let report = ScheduledTask::new(config(&jira.url()), pool).run_once().await.unwrap();
    assert_eq!(report.issues_published, 1);
    assert_eq!(report.issues_failed, vec!["GONE-1".to_string()]);
    ok.assert_async().await;
}
