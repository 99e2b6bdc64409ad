//! Chained planning: enhance -> architect -> decompose, with the
//! intermediate artifacts persisted on the job row.

mod common;

use std::sync::Arc;

use common::*;
use genui_db::models::status::{ComponentStatus, JobStatus};
use genui_db::JobStore;
use genui_pipeline::{JobRunner, PlanStrategy, ProviderFactory};

fn chained_runner(store: &Arc<MemoryStore>, factory: &Arc<ScriptedFactory>) -> JobRunner {
    JobRunner::new(
        Arc::clone(store) as Arc<dyn JobStore>,
        Arc::clone(factory) as Arc<dyn ProviderFactory>,
        PlanStrategy::Chained,
    )
}

fn brief_json() -> String {
    serde_json::json!({
        "enhanced_prompt": "A serene meditation app with guided sessions.",
        "app_name": "Calm Corner",
        "summary": "Guided meditation for beginners.",
        "detected_device": "iPhone 16 Pro",
        "style_guide_keywords": ["minimalist", "pastel"],
        "primary_user_goals": ["start a session quickly"],
        "secondary_goals": [],
        "constraints": []
    })
    .to_string()
}

fn architecture_json() -> String {
    serde_json::json!({
        "app_name": "Calm Corner",
        "device": "iPhone 16 Pro",
        "style_guide_keywords": ["minimalist", "pastel"],
        "screens": [
            {"screen_id": "welcome", "screen_name": "Welcome", "screen_type": "onboarding"},
            {"screen_id": "home", "screen_name": "Home", "screen_type": "dashboard"}
        ],
        "flows": []
    })
    .to_string()
}

#[tokio::test]
async fn chain_persists_artifacts_and_plans() {
    let store = MemoryStore::new(job(2), components(2), 10);
    let factory = ScriptedFactory::new(vec![
        // One provider serves all three chain steps, in order.
        ScriptedProvider::queued(vec![
            Ok(brief_json()),
            Ok(architecture_json()),
            Ok(planner_json(2)),
        ]),
        ScriptedProvider::routed(vec![
            ("brief-1".into(), Ok(screen_doc("Welcome"))),
            ("brief-2".into(), Ok(screen_doc("Home"))),
        ]),
    ]);

    let summary = chained_runner(&store, &factory).run(JOB_ID).await.unwrap();
    assert_eq!(summary.success_count, 2);

    let finished = store.job(JOB_ID);
    assert_eq!(finished.status_id, JobStatus::Completed.id());
    assert_eq!(
        finished.optimized_prompt.as_deref(),
        Some("A serene meditation app with guided sessions.")
    );
    let architecture = finished.information_architecture.unwrap();
    assert_eq!(architecture["app_name"], "Calm Corner");
}

#[tokio::test]
async fn mid_chain_failure_salvages_run() {
    let store = MemoryStore::new(job(2), components(2), 10);
    // Enhancement succeeds, the architecture step returns prose.
    let factory = ScriptedFactory::new(vec![ScriptedProvider::queued(vec![
        Ok(brief_json()),
        Ok("I would suggest five screens.".into()),
    ])]);

    let summary = chained_runner(&store, &factory).run(JOB_ID).await.unwrap();
    assert_eq!(summary.success_count, 0);

    let finished = store.job(JOB_ID);
    assert_eq!(finished.status_id, JobStatus::Completed.id());
    assert!(finished
        .error_message
        .as_ref()
        .unwrap()
        .contains("information architecture"));
    for component in store.components() {
        assert_eq!(component.status_id, ComponentStatus::Failed.id());
    }
    assert_eq!(store.credits(USER_ID), 10);
}
