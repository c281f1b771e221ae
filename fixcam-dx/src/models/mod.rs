//! Data models for fixcam-dx

pub mod project;
pub mod record;

pub use project::{skill_level_name, InstructionStep, ItemCategory, MaterialOrTool, Project};
pub use record::{RecordItem, RecordStep, StructuredRecord};
