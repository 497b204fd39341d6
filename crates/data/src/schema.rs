//! Raw serde-facing forms of the config files. These mirror the file
//! layout field-for-field; `load` converts them into core registry
//! types and rejects anything the closed vocabularies do not name.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EnemyFile {
    pub enemies: Vec<RawEnemy>,
}

#[derive(Debug, Deserialize)]
pub struct RawEnemy {
    pub name: String,
    pub hp: i64,
    #[serde(default)]
    pub description: String,
    /// Presentation-layer asset path; accepted and ignored by the kernel.
    #[serde(default)]
    pub image_path: String,
    pub abilities: Vec<RawAbility>,
}

#[derive(Debug, Deserialize)]
pub struct RawAbility {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trigger: RawTrigger,
    #[serde(default)]
    pub cooldown: i64,
    pub effects: Vec<RawEffect>,
}

#[derive(Debug, Deserialize)]
pub struct RawTrigger {
    #[serde(rename = "type")]
    pub kind: String,
    pub event: Option<String>,
    pub count: Option<u32>,
    pub threshold: Option<f64>,
    pub once: Option<bool>,
    pub chance: Option<f64>,
    pub action: Option<String>,
    pub segment_percent: Option<u32>,
    pub damage_threshold: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RawEffect {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub value: Option<i64>,
    pub duration: Option<i64>,
    pub amount: Option<i64>,
    pub percent: Option<i64>,
    pub target: Option<String>,
    pub text: Option<String>,
    pub tag: Option<String>,
    pub count: Option<usize>,
    pub strategy: Option<String>,
    pub stat: Option<String>,
    pub delta: Option<i64>,
    pub max: Option<i64>,
    pub on_max: Option<Box<RawEffect>>,
}

#[derive(Debug, Deserialize)]
pub struct TagFile {
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
pub struct RawTag {
    pub tag: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub color_r: i64,
    pub color_g: i64,
    pub color_b: i64,
    pub trigger: RawTagTrigger,
    pub effects: Vec<RawEffect>,
}

#[derive(Debug, Deserialize)]
pub struct RawTagTrigger {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TrinketFile {
    pub trinkets: Vec<RawTrinket>,
}

/// Flat trinket layout: the primary passive lives in `passive_*`, the
/// optional secondary in `passive_*_2`. Stack payloads share the
/// `stack_*` fields between both passives.
#[derive(Debug, Deserialize)]
pub struct RawTrinket {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub flavor: String,
    pub rarity: String,
    #[serde(default)]
    pub base_value: i64,

    pub passive_trigger: String,
    pub passive_effect_type: String,
    pub passive_effect_value: Option<i64>,
    pub passive_status: Option<String>,
    pub passive_status_duration: Option<i64>,
    pub passive_tag: Option<String>,
    pub passive_target: Option<String>,
    pub passive_text: Option<String>,
    pub passive_condition_bet_gte: Option<i64>,

    pub passive_trigger_2: Option<String>,
    pub passive_effect_type_2: Option<String>,
    pub passive_effect_value_2: Option<i64>,
    pub passive_status_2: Option<String>,
    pub passive_status_duration_2: Option<i64>,
    pub passive_tag_2: Option<String>,
    pub passive_target_2: Option<String>,
    pub passive_text_2: Option<String>,

    pub stack_stat: Option<String>,
    pub stack_delta: Option<i64>,
    pub stack_max: Option<i64>,
    pub on_max_type: Option<String>,
    pub on_max_value: Option<i64>,

    #[serde(default)]
    pub heal_punish_charges: i64,
}
