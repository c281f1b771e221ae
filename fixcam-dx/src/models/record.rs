//! Structured record schema expected from the vision model
//!
//! The model is asked to answer with a single JSON object; this is the
//! typed shape that object must reduce to. Fields the assembler can
//! default are optional here; fields with no sensible default (a step's
//! description, an item's name) are required, and their absence surfaces
//! as an invalid-record error rather than a silently hollow project.

use serde::Deserialize;

/// Top-level analysis record
#[derive(Debug, Clone, Deserialize)]
pub struct StructuredRecord {
    pub title: Option<String>,
    pub hardware_identified: Option<String>,
    pub issue_type: Option<String>,
    pub description: Option<String>,
    pub skill_level: Option<i64>,
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub safety_warnings: Vec<String>,
    #[serde(default)]
    pub steps: Vec<RecordStep>,
    #[serde(default)]
    pub materials: Vec<RecordItem>,
    #[serde(default)]
    pub tools: Vec<RecordItem>,
}

/// One instruction step as emitted by the model
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStep {
    pub step_number: i64,
    pub title: String,
    pub description: String,
    pub warning: Option<String>,
    pub image_hint: Option<String>,
}

/// One material or tool entry as emitted by the model
#[derive(Debug, Clone, Deserialize)]
pub struct RecordItem {
    pub name: String,
    pub estimated_cost: Option<String>,
}
