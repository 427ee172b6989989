use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

use crate::models::{validate_not_blank, TrainingLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "muscle_group", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
    Calves,
    Cardio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "equipment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Bodyweight,
    Dumbbell,
    Barbell,
    Machine,
    ResistanceBand,
    Kettlebell,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: MuscleGroup,
    pub equipment: Option<Equipment>,
    pub difficulty: TrainingLevel,
    pub video_url: Option<String>,
    pub instructions: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExerciseRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: MuscleGroup,
    pub equipment: Option<Equipment>,
    pub difficulty: TrainingLevel,
    #[validate(url, length(max = 500))]
    pub video_url: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseQuery {
    pub muscle_group: Option<MuscleGroup>,
}
