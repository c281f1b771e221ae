//! Repair project domain model
//!
//! A `Project` is the root aggregate produced by one diagnosis request.
//! Sub-entity identifiers are generated server-side at construction and are
//! never regenerated; they key the two partial-update operations (ownership
//! toggle, generated-image attachment).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Convert skill level number to display name
///
/// Levels outside 1-4 map to the default label rather than failing; the
/// model occasionally emits 0 or 5 despite the rubric.
pub fn skill_level_name(level: i64) -> &'static str {
    match level {
        1 => "Novice",
        2 => "Beginner",
        3 => "Intermediate",
        4 => "Expert",
        _ => "Beginner",
    }
}

/// Discriminator for the shared material/tool shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Material,
    Tool,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Material => "material",
            ItemCategory::Tool => "tool",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "material" => Some(ItemCategory::Material),
            "tool" => Some(ItemCategory::Tool),
            _ => None,
        }
    }
}

/// A material or tool required by the repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialOrTool {
    /// Stable identifier, assigned once at construction
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    /// Free text or a sentinel ("varies", "included", "common household item")
    pub estimated_cost: String,
    /// Mutated only via the ownership toggle
    #[serde(default)]
    pub already_owned: bool,
}

/// One ordered instruction step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    /// Stable identifier, the addressing key for image attachment
    pub id: String,
    /// 1-based ordinal as supplied by the model; not re-derived from
    /// array position, duplicates and gaps are tolerated
    pub step_number: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub warning: Option<String>,
    /// What to look for / how to frame the shot (drives image generation)
    #[serde(default)]
    pub image_hint: Option<String>,
    /// Data-URI strings, empty until image generation succeeds
    #[serde(default)]
    pub generated_images: Vec<String>,
    /// Advisory in-flight flag; not a mutual-exclusion mechanism
    #[serde(default)]
    pub images_generating: bool,
}

/// Root aggregate: one persisted repair project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub hardware_identified: String,
    pub issue_type: String,
    /// Integer in 1-4; out-of-range values keep the default display label
    pub skill_level: i64,
    /// Always derived from `skill_level` via [`skill_level_name`]
    pub skill_level_name: String,
    pub estimated_time: String,
    /// Canonical data URI of the submitted media preview
    pub primary_image: String,
    /// Canonical data URI of the bounded list-view thumbnail
    pub thumbnail_image: String,
    pub steps: Vec<InstructionStep>,
    pub materials: Vec<MaterialOrTool>,
    pub tools: Vec<MaterialOrTool>,
    #[serde(default)]
    pub safety_warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_level_name_mapping() {
        assert_eq!(skill_level_name(1), "Novice");
        assert_eq!(skill_level_name(2), "Beginner");
        assert_eq!(skill_level_name(3), "Intermediate");
        assert_eq!(skill_level_name(4), "Expert");
    }

    #[test]
    fn test_skill_level_name_out_of_range_defaults() {
        assert_eq!(skill_level_name(0), "Beginner");
        assert_eq!(skill_level_name(5), "Beginner");
        assert_eq!(skill_level_name(-3), "Beginner");
    }

    #[test]
    fn test_item_category_round_trip() {
        assert_eq!(
            ItemCategory::from_str(ItemCategory::Material.as_str()),
            Some(ItemCategory::Material)
        );
        assert_eq!(
            ItemCategory::from_str(ItemCategory::Tool.as_str()),
            Some(ItemCategory::Tool)
        );
        assert_eq!(ItemCategory::from_str("widget"), None);
    }

    #[test]
    fn test_item_category_serde_lowercase() {
        let json = serde_json::to_string(&ItemCategory::Material).unwrap();
        assert_eq!(json, "\"material\"");
    }
}
