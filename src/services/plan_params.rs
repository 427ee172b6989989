use serde::Serialize;

use crate::models::{GoalType, MuscleGroup, TrainingLevel};

/// Volume prescription for one exercise in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanParams {
    pub target_sets: i32,
    pub reps_min: i32,
    pub reps_max: i32,
    pub warmup_sets: i32,
}

impl PlanParams {
    const fn new(target_sets: i32, reps_min: i32, reps_max: i32, warmup_sets: i32) -> Self {
        Self {
            target_sets,
            reps_min,
            reps_max,
            warmup_sets,
        }
    }
}

/// Pick sets, rep range and warmups for an exercise.
///
/// The level sets the baseline, the goal only moves the rep range, and core
/// or calves work always gets its own fixed prescription.
pub fn select_plan_params(
    level: TrainingLevel,
    goal: Option<GoalType>,
    muscle_group: MuscleGroup,
) -> PlanParams {
    let mut params = match level {
        TrainingLevel::Beginner => PlanParams::new(2, 12, 15, 1),
        TrainingLevel::Intermediate => PlanParams::new(4, 8, 12, 2),
        TrainingLevel::Advanced => PlanParams::new(5, 6, 10, 2),
    };

    let rep_range = match goal {
        Some(GoalType::WeightLoss | GoalType::Endurance) => Some((12, 15)),
        Some(GoalType::MuscleGain) => Some((8, 12)),
        Some(GoalType::Strength) => Some((6, 8)),
        Some(GoalType::Flexibility) | None => None,
    };
    if let Some((reps_min, reps_max)) = rep_range {
        params.reps_min = reps_min;
        params.reps_max = reps_max;
    }

    match muscle_group {
        MuscleGroup::Core => PlanParams::new(3, 15, 20, 0),
        MuscleGroup::Calves => PlanParams::new(3, 12, 15, 1),
        _ => params,
    }
}
