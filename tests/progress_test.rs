mod common;

use anyhow::Result;
use sea_orm::EntityTrait;
use uuid::Uuid;

use common::{
    insert_activity, insert_module, insert_plan, quiz_payload, setup_test_db, text_payload,
};
use studyplan_kit::entities::activity::ActivityKind;
use studyplan_kit::entities::daily_module;
use studyplan_kit::entities::plan::{self, PlanStatus};
use studyplan_kit::error::AppError;
use studyplan_kit::services::progress;

#[tokio::test]
async fn two_day_plan_walkthrough() -> Result<()> {
    let db = setup_test_db().await;
    let plan_row = insert_plan(&db, Uuid::new_v4(), "Two day plan", 2).await;

    // Each day: one text activity (materials section) + one quiz = 2 sections.
    let day1 = insert_module(&db, plan_row.id, 1, "Day 1").await;
    let d1_text = insert_activity(&db, day1.id, 0, ActivityKind::Text, text_payload()).await;
    let d1_quiz = insert_activity(&db, day1.id, 1, ActivityKind::Quiz, quiz_payload()).await;
    let day2 = insert_module(&db, plan_row.id, 2, "Day 2").await;
    let d2_text = insert_activity(&db, day2.id, 0, ActivityKind::Text, text_payload()).await;
    let d2_quiz = insert_activity(&db, day2.id, 1, ActivityKind::Quiz, quiz_payload()).await;

    let s = progress::set_activity_completion(&db, day1.id, d1_text.id, true).await?;
    assert_eq!(s.progress, 25);
    assert_eq!(s.current_day, 1);
    assert!(!s.module_completed);

    let s = progress::set_activity_completion(&db, day1.id, d1_quiz.id, true).await?;
    assert_eq!(s.progress, 50);
    assert_eq!(s.current_day, 2);
    assert!(s.module_completed);
    let m = daily_module::Entity::find_by_id(day1.id).one(&db).await?.unwrap();
    assert!(m.is_completed);

    let s = progress::set_activities_completion(&db, day2.id, &[d2_text.id, d2_quiz.id], true).await?;
    assert_eq!(s.progress, 100);
    assert_eq!(s.current_day, 2, "current day stays clamped to total_days");
    assert_eq!(s.status, PlanStatus::Completed);

    let stored = plan::Entity::find_by_id(plan_row.id).one(&db).await?.unwrap();
    assert_eq!(stored.progress, 100);
    assert_eq!(stored.current_day, 2);
    assert_eq!(stored.status, PlanStatus::Completed);

    Ok(())
}

#[tokio::test]
async fn progress_is_monotonic_and_ends_at_100() -> Result<()> {
    let db = setup_test_db().await;
    let plan_row = insert_plan(&db, Uuid::new_v4(), "Three day plan", 3).await;

    let mut targets = Vec::new();
    for day in 1..=3 {
        let module = insert_module(&db, plan_row.id, day, &format!("Day {day}")).await;
        let text = insert_activity(&db, module.id, 0, ActivityKind::Text, text_payload()).await;
        let quiz = insert_activity(&db, module.id, 1, ActivityKind::Quiz, quiz_payload()).await;
        targets.push((module.id, text.id));
        targets.push((module.id, quiz.id));
    }

    let mut last = 0;
    for (module_id, activity_id) in &targets {
        let s = progress::set_activity_completion(&db, *module_id, *activity_id, true).await?;
        assert!(s.progress >= last, "progress regressed: {} -> {}", last, s.progress);
        last = s.progress;
    }
    assert_eq!(last, 100);

    Ok(())
}

#[tokio::test]
async fn current_day_clamps_to_total_days() -> Result<()> {
    let db = setup_test_db().await;
    let plan_row = insert_plan(&db, Uuid::new_v4(), "Three day plan", 3).await;

    let mut modules = Vec::new();
    for day in 1..=3 {
        let module = insert_module(&db, plan_row.id, day, &format!("Day {day}")).await;
        insert_activity(&db, module.id, 0, ActivityKind::Text, text_payload()).await;
        modules.push(module);
    }

    let s = progress::complete_module(&db, modules[0].id).await?;
    assert_eq!(s.current_day, 2);
    let s = progress::complete_module(&db, modules[1].id).await?;
    assert_eq!(s.current_day, 3);
    let s = progress::complete_module(&db, modules[2].id).await?;
    assert_eq!(s.current_day, 3, "never exceeds total_days");
    assert_eq!(s.status, PlanStatus::Completed);

    Ok(())
}

#[tokio::test]
async fn status_flips_back_to_active_when_an_activity_is_undone() -> Result<()> {
    let db = setup_test_db().await;
    let plan_row = insert_plan(&db, Uuid::new_v4(), "One day plan", 1).await;
    let module = insert_module(&db, plan_row.id, 1, "Day 1").await;
    let text = insert_activity(&db, module.id, 0, ActivityKind::Text, text_payload()).await;
    let quiz = insert_activity(&db, module.id, 1, ActivityKind::Quiz, quiz_payload()).await;

    let s = progress::set_activities_completion(&db, module.id, &[text.id, quiz.id], true).await?;
    assert_eq!(s.status, PlanStatus::Completed);

    let s = progress::set_activity_completion(&db, module.id, quiz.id, false).await?;
    assert_eq!(s.status, PlanStatus::Active);
    assert_eq!(s.progress, 50);
    assert!(!s.module_completed);
    let m = daily_module::Entity::find_by_id(module.id).one(&db).await?.unwrap();
    assert!(!m.is_completed);

    Ok(())
}

#[tokio::test]
async fn unknown_module_is_not_found() {
    let db = setup_test_db().await;
    let err = progress::set_activity_completion(&db, Uuid::new_v4(), Uuid::new_v4(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn foreign_activity_is_rejected() -> Result<()> {
    let db = setup_test_db().await;
    let plan_row = insert_plan(&db, Uuid::new_v4(), "Plan", 2).await;
    let module_a = insert_module(&db, plan_row.id, 1, "Day 1").await;
    let module_b = insert_module(&db, plan_row.id, 2, "Day 2").await;
    insert_activity(&db, module_a.id, 0, ActivityKind::Text, text_payload()).await;
    let other = insert_activity(&db, module_b.id, 0, ActivityKind::Text, text_payload()).await;

    let err = progress::set_activity_completion(&db, module_a.id, other.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn quiz_only_module_counts_each_quiz_as_a_section() -> Result<()> {
    let db = setup_test_db().await;
    let plan_row = insert_plan(&db, Uuid::new_v4(), "Quiz day", 1).await;
    let module = insert_module(&db, plan_row.id, 1, "Day 1").await;
    let q1 = insert_activity(&db, module.id, 0, ActivityKind::Quiz, quiz_payload()).await;
    insert_activity(&db, module.id, 1, ActivityKind::Quiz, quiz_payload()).await;

    let s = progress::set_activity_completion(&db, module.id, q1.id, true).await?;
    assert_eq!(s.progress, 50);

    Ok(())
}
