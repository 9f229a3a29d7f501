//! Reward engine: mission progress fan-out, leveling and achievements.
//!
//! One action event (`jugar_memoria`, `gastar_puntos`, ...) advances every
//! mission sharing that trigger. Completing a mission pays its reward and
//! cascades into [`evaluate_level`] and [`evaluate_achievements`]. All
//! mutations are staged on the [`Ledger`]; the caller commits once.

use chrono::Utc;

use crate::error::Result;
use crate::ledger::{Ledger, Notice};
use crate::leveling::xp_threshold;
use crate::student::MissionProgress;

/// Advance every mission whose trigger is `trigger` by `amount`.
///
/// Completed missions are left untouched. The counter is capped at the
/// mission goal. A trigger matching no mission is a no-op.
///
/// # Errors
///
/// Returns an error if the ledger cannot read missions or progress.
pub fn process_action<L: Ledger + ?Sized>(ledger: &mut L, trigger: &str, amount: i64) -> Result<()> {
    let missions = ledger.missions_for_trigger(trigger)?;
    let student_id = ledger.student().id;

    if missions.is_empty() {
        tracing::debug!(student_id = %student_id, trigger, "No missions for action trigger");
        return Ok(());
    }

    for mission in missions {
        let mut progress = ledger
            .mission_progress(mission.id)?
            .unwrap_or_else(|| MissionProgress::new(student_id, mission.id));

        if progress.completed {
            continue;
        }

        progress.progress = progress.progress.saturating_add(amount).min(mission.goal);
        progress.updated_at = Utc::now();

        let reached = progress.progress >= mission.goal;
        if reached {
            progress.completed = true;
        }
        ledger.save_mission_progress(progress);

        if reached {
            let student = ledger.student_mut();
            student.points += mission.reward_points;
            student.xp += mission.reward_xp;
            student.updated_at = Utc::now();

            tracing::info!(
                student_id = %student_id,
                mission_id = %mission.id,
                trigger,
                reward_points = mission.reward_points,
                reward_xp = mission.reward_xp,
                "Mission completed"
            );

            ledger.notify(Notice::MissionCompleted {
                mission_id: mission.id,
                name: mission.name.clone(),
                reward_points: mission.reward_points,
                reward_xp: mission.reward_xp,
            });

            evaluate_level(ledger)?;
            evaluate_achievements(ledger)?;
        }
    }

    Ok(())
}

/// Raise the student's level while their experience meets the threshold of
/// the current level, re-evaluating achievements after every step.
///
/// Evaluation starts from the stored level; it never lowers it.
///
/// # Errors
///
/// Returns an error if achievement evaluation fails.
pub fn evaluate_level<L: Ledger + ?Sized>(ledger: &mut L) -> Result<()> {
    while ledger.student().xp >= xp_threshold(ledger.student().level) {
        let student = ledger.student_mut();
        student.level += 1;
        student.updated_at = Utc::now();
        let (student_id, level) = (student.id, student.level);

        tracing::info!(student_id = %student_id, level, "Level up");
        ledger.notify(Notice::LevelUp { level });

        evaluate_achievements(ledger)?;
    }
    Ok(())
}

/// Grant every achievement whose required level is met and that the student
/// does not hold yet. Returns how many were granted.
///
/// # Errors
///
/// Returns an error if the catalog or grants cannot be read.
pub fn evaluate_achievements<L: Ledger + ?Sized>(ledger: &mut L) -> Result<usize> {
    let level = ledger.student().level;
    let student_id = ledger.student().id;
    let mut granted = 0;

    for achievement in ledger.achievements()? {
        if achievement.required_level > level || ledger.holds_achievement(achievement.id)? {
            continue;
        }

        ledger.grant_achievement(achievement.id);
        granted += 1;

        tracing::info!(
            student_id = %student_id,
            achievement_id = %achievement.id,
            "Achievement unlocked"
        );
        ledger.notify(Notice::AchievementUnlocked {
            achievement_id: achievement.id,
            name: achievement.name,
        });
    }

    Ok(granted)
}
