//! Plan records: the decision matrix, blueprint and build guide a project
//! accumulates. Every field is optional and tolerant of bad shapes (see
//! `models::lenient`); the report renders whatever is usable.

use serde::Deserialize;

use crate::models::blocks::ContentBlock;
use crate::models::lenient;

/// A report section as supplied by the caller.
#[derive(Debug, Clone)]
pub enum SectionSource<T> {
    /// Already flattened content.
    Blocks(Vec<ContentBlock>),
    /// A structured record still to be flattened.
    Record(T),
}

// ────────────────────────────────────────────────────────────────────────────
// Decision matrix
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMatrix {
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub subsystems: Vec<Subsystem>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsystem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub options: Vec<SubsystemOption>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemOption {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub cons: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cost: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub availability: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub recommended: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Blueprint
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    #[serde(default, deserialize_with = "lenient::record")]
    pub problem: Option<ProblemDefinition>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub architecture: Option<Architecture>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub components: Vec<ComponentChoice>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub execution_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub testing_methods: Vec<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub failure_modes: Vec<FailureMode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDefinition {
    #[serde(default, deserialize_with = "lenient::text")]
    pub statement: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub constraints: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub success_criteria: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Architecture {
    #[serde(default, deserialize_with = "lenient::text")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub block_diagram: Vec<DiagramBlock>,
}

/// One box of the block diagram.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramBlock {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub connects_to: Vec<String>,
}

/// The option frozen for a subsystem.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentChoice {
    #[serde(default, deserialize_with = "lenient::text")]
    pub subsystem: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub choice: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureMode {
    #[serde(default, deserialize_with = "lenient::text")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cause: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mitigation: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Build guide
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildGuide {
    #[serde(default, deserialize_with = "lenient::record")]
    pub wiring: Option<Wiring>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub firmware: Option<Firmware>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub calibration: Vec<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub common_failures: Vec<CommonFailure>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub safety_notes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wiring {
    #[serde(default, deserialize_with = "lenient::records")]
    pub connections: Vec<WiringConnection>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiringConnection {
    #[serde(default, deserialize_with = "lenient::text")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub signal: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firmware {
    #[serde(default, deserialize_with = "lenient::text")]
    pub structure: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub key_logic: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonFailure {
    #[serde(default, deserialize_with = "lenient::text")]
    pub symptom: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cause: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fix: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
