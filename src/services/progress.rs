use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::activity::{self, ActivityKind};
use crate::entities::daily_module;
use crate::entities::plan::{self, PlanStatus};
use crate::error::AppError;

/// Plan-level aggregates after a completion change.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProgressSummary {
    pub plan_id: Uuid,
    pub progress: i32,
    pub current_day: i32,
    pub status: PlanStatus,
    /// Whether the touched module is now fully completed.
    pub module_completed: bool,
}

pub async fn set_activity_completion(
    db: &DatabaseConnection,
    module_id: Uuid,
    activity_id: Uuid,
    completed: bool,
) -> Result<ProgressSummary, AppError> {
    set_activities_completion(db, module_id, &[activity_id], completed).await
}

/// Flip completion flags for the given activities of one module, then
/// recompute the module rollup and the plan aggregates, all in one
/// transaction. A store error rolls the whole update back.
pub async fn set_activities_completion(
    db: &DatabaseConnection,
    module_id: Uuid,
    activity_ids: &[Uuid],
    completed: bool,
) -> Result<ProgressSummary, AppError> {
    let txn = db.begin().await?;

    let module = daily_module::Entity::find_by_id(module_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Module {module_id} not found")))?;

    let acts = activity::Entity::find()
        .filter(activity::Column::ModuleId.eq(module_id))
        .order_by_asc(activity::Column::Position)
        .all(&txn)
        .await?;

    for id in activity_ids {
        if !acts.iter().any(|a| a.id == *id) {
            return Err(AppError::Validation(format!(
                "Activity {id} does not belong to module {module_id}"
            )));
        }
    }

    apply_completion(&txn, &module, &acts, activity_ids, completed).await?;
    let module_completed = acts
        .iter()
        .all(|a| if activity_ids.contains(&a.id) { completed } else { a.is_completed });

    let summary = recompute_plan(&txn, module.plan_id).await?;
    txn.commit().await?;

    Ok(ProgressSummary { module_completed, ..summary })
}

/// Convenience: mark every activity in the module completed.
pub async fn complete_module(
    db: &DatabaseConnection,
    module_id: Uuid,
) -> Result<ProgressSummary, AppError> {
    let txn = db.begin().await?;

    let module = daily_module::Entity::find_by_id(module_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Module {module_id} not found")))?;

    let acts = activity::Entity::find()
        .filter(activity::Column::ModuleId.eq(module_id))
        .all(&txn)
        .await?;
    let ids: Vec<Uuid> = acts.iter().map(|a| a.id).collect();

    apply_completion(&txn, &module, &acts, &ids, true).await?;
    let summary = recompute_plan(&txn, module.plan_id).await?;
    txn.commit().await?;

    Ok(ProgressSummary { module_completed: true, ..summary })
}

async fn apply_completion<C: ConnectionTrait>(
    conn: &C,
    module: &daily_module::Model,
    acts: &[activity::Model],
    activity_ids: &[Uuid],
    completed: bool,
) -> Result<(), AppError> {
    let now = Utc::now().naive_utc();

    if !activity_ids.is_empty() {
        activity::Entity::update_many()
            .col_expr(activity::Column::IsCompleted, Expr::value(completed))
            .col_expr(activity::Column::UpdatedAt, Expr::value(now))
            .filter(activity::Column::Id.is_in(activity_ids.iter().copied()))
            .exec(conn)
            .await?;
    }

    let all_completed = acts
        .iter()
        .all(|a| if activity_ids.contains(&a.id) { completed } else { a.is_completed });

    if module.is_completed != all_completed {
        daily_module::Entity::update_many()
            .col_expr(daily_module::Column::IsCompleted, Expr::value(all_completed))
            .col_expr(daily_module::Column::UpdatedAt, Expr::value(now))
            .filter(daily_module::Column::Id.eq(module.id))
            .exec(conn)
            .await?;
    }

    Ok(())
}

/// Recompute and persist `progress`, `current_day`, and `status` for a plan
/// from all of its modules and activities. Runs on the caller's connection,
/// normally a transaction that already holds the completion writes.
pub async fn recompute_plan<C: ConnectionTrait>(
    conn: &C,
    plan_id: Uuid,
) -> Result<ProgressSummary, AppError> {
    let plan_row = plan::Entity::find_by_id(plan_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {plan_id} not found")))?;

    let modules = daily_module::Entity::find()
        .filter(daily_module::Column::PlanId.eq(plan_id))
        .order_by_asc(daily_module::Column::DayNumber)
        .all(conn)
        .await?;

    let module_ids: Vec<Uuid> = modules.iter().map(|m| m.id).collect();
    let acts = activity::Entity::find()
        .filter(activity::Column::ModuleId.is_in(module_ids))
        .order_by_asc(activity::Column::Position)
        .all(conn)
        .await?;

    let per_module: Vec<Vec<(ActivityKind, bool)>> = modules
        .iter()
        .map(|m| {
            acts.iter()
                .filter(|a| a.module_id == m.id)
                .map(|a| (a.kind, a.is_completed))
                .collect()
        })
        .collect();

    let (done, total) = section_counts(&per_module);
    let progress = progress_percent(done, total);

    let modules_completed: Vec<bool> = per_module
        .iter()
        .map(|acts| !acts.is_empty() && acts.iter().all(|(_, c)| *c))
        .collect();
    let current_day = current_day_cursor(&modules_completed, plan_row.total_days);

    let total_activities: usize = per_module.iter().map(|m| m.len()).sum();
    let all_done = total_activities > 0 && per_module.iter().flatten().all(|(_, c)| *c);
    let status = if all_done { PlanStatus::Completed } else { PlanStatus::Active };

    plan::Entity::update_many()
        .col_expr(plan::Column::Progress, Expr::value(progress))
        .col_expr(plan::Column::CurrentDay, Expr::value(current_day))
        .col_expr(plan::Column::Status, Expr::value(status))
        .col_expr(plan::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(plan::Column::Id.eq(plan_id))
        .exec(conn)
        .await?;

    Ok(ProgressSummary {
        plan_id,
        progress,
        current_day,
        status,
        module_completed: false,
    })
}

/// Section counting rule: each module contributes one "materials" section,
/// represented by its first non-quiz activity, plus one section per quiz.
/// Returns (completed, total) over all modules.
fn section_counts(modules: &[Vec<(ActivityKind, bool)>]) -> (usize, usize) {
    let mut done = 0;
    let mut total = 0;
    for acts in modules {
        if let Some((_, completed)) = acts.iter().find(|(k, _)| *k != ActivityKind::Quiz) {
            total += 1;
            if *completed {
                done += 1;
            }
        }
        for (kind, completed) in acts {
            if *kind == ActivityKind::Quiz {
                total += 1;
                if *completed {
                    done += 1;
                }
            }
        }
    }
    (done, total)
}

fn progress_percent(done: usize, total: usize) -> i32 {
    if total == 0 {
        0
    } else {
        ((done as f64) * 100.0 / (total as f64)).round() as i32
    }
}

/// 1 + the longest all-completed prefix of modules in day order, clamped
/// to the plan length.
fn current_day_cursor(modules_completed: &[bool], total_days: i32) -> i32 {
    let prefix = modules_completed.iter().take_while(|c| **c).count() as i32;
    (prefix + 1).min(total_days.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ActivityKind::*;

    #[test]
    fn sections_count_materials_once_and_each_quiz() {
        // text + video + quiz + quiz: 1 materials section + 2 quiz sections
        let module = vec![(Text, true), (Video, false), (Quiz, true), (Quiz, false)];
        assert_eq!(section_counts(&[module]), (2, 3));
    }

    #[test]
    fn quiz_only_module_has_no_materials_section() {
        let module = vec![(Quiz, false), (Quiz, true)];
        assert_eq!(section_counts(&[module]), (1, 2));
    }

    #[test]
    fn empty_plan_has_zero_progress() {
        assert_eq!(section_counts(&[]), (0, 0));
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn progress_rounds_to_nearest_integer() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 4), 25);
        assert_eq!(progress_percent(4, 4), 100);
    }

    #[test]
    fn current_day_is_next_incomplete_day() {
        assert_eq!(current_day_cursor(&[true, true, false], 3), 3);
        assert_eq!(current_day_cursor(&[true, false, false], 3), 2);
        assert_eq!(current_day_cursor(&[false, false, false], 3), 1);
    }

    #[test]
    fn current_day_never_exceeds_total_days() {
        assert_eq!(current_day_cursor(&[true, true, true], 3), 3);
        assert_eq!(current_day_cursor(&[], 1), 1);
    }
}
