//! Project assembly from an extracted structured record
//!
//! Maps the model's record into a persist-ready project: fresh stable
//! identifiers for every sub-entity, policy defaults for absent optional
//! fields. A partially hollow but parseable record still yields a usable
//! project; only required structural shape (a step without a description,
//! an item without a name) fails assembly.

use chrono::Utc;
use fixcam_common::ids::new_entity_id;
use serde_json::Value;

use crate::error::DiagnosisError;
use crate::models::{
    skill_level_name, InstructionStep, ItemCategory, MaterialOrTool, Project, RecordItem,
    StructuredRecord,
};
use crate::services::media_normalizer::NormalizedMedia;

const DEFAULT_TITLE: &str = "Repair Project";
const DEFAULT_HARDWARE: &str = "Unknown";
const DEFAULT_ISSUE_TYPE: &str = "General repair";
const DEFAULT_SKILL_LEVEL: i64 = 2;
const DEFAULT_ESTIMATED_TIME: &str = "1-2 hours";
const DEFAULT_COST: &str = "varies";

/// Assemble a persist-ready project from the extracted record value.
pub fn assemble(record: Value, media: &NormalizedMedia) -> Result<Project, DiagnosisError> {
    let record: StructuredRecord = serde_json::from_value(record)
        .map_err(|e| DiagnosisError::InvalidStructuredRecord(e.to_string()))?;

    let skill_level = record.skill_level.unwrap_or(DEFAULT_SKILL_LEVEL);

    let steps = record
        .steps
        .into_iter()
        .map(|s| InstructionStep {
            id: new_entity_id(),
            step_number: s.step_number,
            title: s.title,
            description: s.description,
            warning: s.warning,
            image_hint: s.image_hint,
            generated_images: Vec::new(),
            images_generating: false,
        })
        .collect();

    let materials = assemble_items(record.materials, ItemCategory::Material);
    let tools = assemble_items(record.tools, ItemCategory::Tool);

    Ok(Project {
        id: new_entity_id(),
        title: record.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: record.description.unwrap_or_default(),
        hardware_identified: record
            .hardware_identified
            .unwrap_or_else(|| DEFAULT_HARDWARE.to_string()),
        issue_type: record
            .issue_type
            .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
        skill_level,
        skill_level_name: skill_level_name(skill_level).to_string(),
        estimated_time: record
            .estimated_time
            .unwrap_or_else(|| DEFAULT_ESTIMATED_TIME.to_string()),
        primary_image: media.primary_image.clone(),
        thumbnail_image: media.thumbnail_image.clone(),
        steps,
        materials,
        tools,
        safety_warnings: record.safety_warnings,
        created_at: Utc::now(),
    })
}

fn assemble_items(items: Vec<RecordItem>, category: ItemCategory) -> Vec<MaterialOrTool> {
    items
        .into_iter()
        .map(|item| MaterialOrTool {
            id: new_entity_id(),
            name: item.name,
            category,
            estimated_cost: item.estimated_cost.unwrap_or_else(|| DEFAULT_COST.to_string()),
            already_owned: false,
        })
        .collect()
}
