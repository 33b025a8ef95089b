//! Content Flattener: turns plan records into ordered content blocks.
//!
//! One extraction function per record kind. Each walks the record's known
//! fields and emits a heading per named subsection, paragraphs for prose and
//! lists for arrays. Missing or empty fields produce nothing.

use crate::models::blocks::ContentBlock;
use crate::models::plan::{
    Architecture, Blueprint, BuildGuide, CommonFailure, ComponentChoice, DecisionMatrix,
    DiagramBlock, FailureMode, Firmware, ProblemDefinition, Subsystem, SubsystemOption, Wiring,
    WiringConnection,
};

/// A plan record tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum PlanRecord<'a> {
    DecisionMatrix(&'a DecisionMatrix),
    Blueprint(&'a Blueprint),
    BuildGuide(&'a BuildGuide),
}

/// Flattens a record into blocks in document order.
pub fn flatten(record: PlanRecord<'_>) -> Vec<ContentBlock> {
    let mut out = Blocks::default();
    match record {
        PlanRecord::DecisionMatrix(matrix) => flatten_decision_matrix(matrix, &mut out),
        PlanRecord::Blueprint(blueprint) => flatten_blueprint(blueprint, &mut out),
        PlanRecord::BuildGuide(guide) => flatten_build_guide(guide, &mut out),
    }
    out.0
}

// ────────────────────────────────────────────────────────────────────────────
// Decision matrix
// ────────────────────────────────────────────────────────────────────────────

fn flatten_decision_matrix(matrix: &DecisionMatrix, out: &mut Blocks) {
    if let Some(summary) = &matrix.summary {
        out.heading("Overview", 1);
        out.paragraph(summary);
    }

    for (index, subsystem) in matrix.subsystems.iter().enumerate() {
        flatten_subsystem(index, subsystem, out);
    }

    if let Some(recommendation) = &matrix.recommendation {
        out.heading("Recommendation", 1);
        out.paragraph(recommendation);
    }
}

fn flatten_subsystem(index: usize, subsystem: &Subsystem, out: &mut Blocks) {
    let name = subsystem
        .name
        .clone()
        .unwrap_or_else(|| format!("Subsystem {}", index + 1));
    out.heading(name, 1);
    out.opt_paragraph(subsystem.purpose.as_deref());

    for (index, option) in subsystem.options.iter().enumerate() {
        flatten_option(index, option, out);
    }

    if let Some(recommendation) = &subsystem.recommendation {
        out.paragraph(format!("Recommendation: {recommendation}"));
    }
}

fn flatten_option(index: usize, option: &SubsystemOption, out: &mut Blocks) {
    let mut name = option
        .name
        .clone()
        .unwrap_or_else(|| format!("Option {}", index + 1));
    if option.recommended {
        name.push_str(" (Recommended)");
    }
    out.heading(name, 2);
    out.opt_paragraph(option.description.as_deref());

    let facts: Vec<String> = [
        option.cost.as_ref().map(|c| format!("Estimated cost: {c}")),
        option
            .availability
            .as_ref()
            .map(|a| format!("Availability: {a}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !facts.is_empty() {
        out.paragraph(facts.join(" | "));
    }

    out.titled_list("Pros", 3, &option.pros);
    out.titled_list("Cons", 3, &option.cons);
}

// ────────────────────────────────────────────────────────────────────────────
// Blueprint
// ────────────────────────────────────────────────────────────────────────────

fn flatten_blueprint(blueprint: &Blueprint, out: &mut Blocks) {
    if let Some(problem) = &blueprint.problem {
        flatten_problem(problem, out);
    }
    if let Some(architecture) = &blueprint.architecture {
        flatten_architecture(architecture, out);
    }

    let components: Vec<String> = blueprint
        .components
        .iter()
        .filter_map(component_line)
        .collect();
    out.titled_list("Selected Components", 1, &components);

    out.titled_ordered_list("Execution Plan", 1, &blueprint.execution_steps);
    out.titled_list("Testing Methods", 1, &blueprint.testing_methods);

    let failure_modes: Vec<String> = blueprint
        .failure_modes
        .iter()
        .filter_map(failure_mode_line)
        .collect();
    out.titled_list("Failure Modes", 1, &failure_modes);
}

fn flatten_problem(problem: &ProblemDefinition, out: &mut Blocks) {
    let has_content = problem.statement.is_some()
        || !problem.constraints.is_empty()
        || !problem.success_criteria.is_empty();
    if !has_content {
        return;
    }
    out.heading("Problem Statement", 1);
    out.opt_paragraph(problem.statement.as_deref());
    out.titled_list("Constraints", 2, &problem.constraints);
    out.titled_list("Success Criteria", 2, &problem.success_criteria);
}

fn flatten_architecture(architecture: &Architecture, out: &mut Blocks) {
    let diagram: Vec<String> = architecture
        .block_diagram
        .iter()
        .filter_map(diagram_line)
        .collect();
    if architecture.overview.is_none() && diagram.is_empty() {
        return;
    }
    out.heading("Architecture Overview", 1);
    out.opt_paragraph(architecture.overview.as_deref());
    out.titled_list("Block Diagram", 2, &diagram);
}

fn diagram_line(block: &DiagramBlock) -> Option<String> {
    let name = block.name.as_deref()?;
    let mut line = match &block.description {
        Some(description) => format!("{name}: {description}"),
        None => name.to_string(),
    };
    if !block.connects_to.is_empty() {
        line.push_str(&format!(" (-> {})", block.connects_to.join(", ")));
    }
    Some(line)
}

fn component_line(component: &ComponentChoice) -> Option<String> {
    let choice = component.choice.as_deref()?;
    let mut line = match &component.subsystem {
        Some(subsystem) => format!("{subsystem}: {choice}"),
        None => choice.to_string(),
    };
    if let Some(rationale) = &component.rationale {
        line.push_str(&format!(" - {rationale}"));
    }
    Some(line)
}

fn failure_mode_line(failure: &FailureMode) -> Option<String> {
    let mode = failure.mode.as_deref()?;
    let mut line = mode.to_string();
    if let Some(cause) = &failure.cause {
        line.push_str(&format!(" (cause: {cause})"));
    }
    if let Some(mitigation) = &failure.mitigation {
        line.push_str(&format!(". Mitigation: {mitigation}"));
    }
    Some(line)
}

// ────────────────────────────────────────────────────────────────────────────
// Build guide
// ────────────────────────────────────────────────────────────────────────────

fn flatten_build_guide(guide: &BuildGuide, out: &mut Blocks) {
    if let Some(wiring) = &guide.wiring {
        flatten_wiring(wiring, out);
    }
    if let Some(firmware) = &guide.firmware {
        flatten_firmware(firmware, out);
    }

    out.titled_ordered_list("Calibration", 1, &guide.calibration);

    let failures: Vec<String> = guide
        .common_failures
        .iter()
        .filter_map(common_failure_line)
        .collect();
    out.titled_list("Common Failures", 1, &failures);
    out.titled_list("Safety Notes", 1, &guide.safety_notes);
    out.titled_list("Next Steps", 1, &guide.next_steps);
}

fn flatten_wiring(wiring: &Wiring, out: &mut Blocks) {
    let connections: Vec<String> = wiring
        .connections
        .iter()
        .filter_map(connection_line)
        .collect();
    if connections.is_empty() && wiring.notes.is_empty() {
        return;
    }
    out.heading("Wiring", 1);
    out.list(connections);
    out.titled_list("Wiring Notes", 2, &wiring.notes);
}

fn connection_line(connection: &WiringConnection) -> Option<String> {
    let (from, to) = (connection.from.as_deref()?, connection.to.as_deref()?);
    let mut line = format!("{from} -> {to}");
    if let Some(signal) = &connection.signal {
        line.push_str(&format!(" [{signal}]"));
    }
    if let Some(notes) = &connection.notes {
        line.push_str(&format!(": {notes}"));
    }
    Some(line)
}

fn flatten_firmware(firmware: &Firmware, out: &mut Blocks) {
    if firmware.structure.is_none() && firmware.key_logic.is_empty() {
        return;
    }
    out.heading("Firmware", 1);
    if let Some(structure) = &firmware.structure {
        out.heading("Structure", 2);
        out.paragraph(structure);
    }
    out.titled_list("Key Logic", 2, &firmware.key_logic);
}

fn common_failure_line(failure: &CommonFailure) -> Option<String> {
    let symptom = failure.symptom.as_deref()?;
    let mut line = symptom.to_string();
    if let Some(cause) = &failure.cause {
        line.push_str(&format!(": {cause}"));
    }
    if let Some(fix) = &failure.fix {
        line.push_str(&format!(". Fix: {fix}"));
    }
    Some(line)
}

// ────────────────────────────────────────────────────────────────────────────
// Block builder
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Blocks(Vec<ContentBlock>);

impl Blocks {
    fn heading(&mut self, text: impl Into<String>, level: u8) {
        self.0.push(ContentBlock::heading(text, level));
    }

    fn paragraph(&mut self, text: impl Into<String>) {
        self.0.push(ContentBlock::paragraph(text));
    }

    fn opt_paragraph(&mut self, text: Option<&str>) {
        if let Some(text) = text {
            self.paragraph(text);
        }
    }

    fn list(&mut self, items: Vec<String>) {
        if !items.is_empty() {
            self.0.push(ContentBlock::list(items));
        }
    }

    /// Heading + list, or nothing when `items` is empty.
    fn titled_list(&mut self, title: &str, level: u8, items: &[String]) {
        if !items.is_empty() {
            self.heading(title, level);
            self.0.push(ContentBlock::list(items.to_vec()));
        }
    }

    fn titled_ordered_list(&mut self, title: &str, level: u8, items: &[String]) {
        if !items.is_empty() {
            self.heading(title, level);
            self.0.push(ContentBlock::ordered_list(items.to_vec()));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};

    fn parse<T: DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).expect("lenient record")
    }

    fn headings(blocks: &[ContentBlock]) -> Vec<&str> {
        blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Heading { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_decision_matrix_one_heading_per_option_in_order() {
        let matrix: DecisionMatrix = parse(json!({
            "subsystems": [
                {"name": "Drive", "options": [{"name": "Brushed DC"}, {"name": "BLDC"}, {}]},
                {"name": "Sensing", "options": [{"name": "Lidar", "recommended": true}]}
            ]
        }));
        let blocks = flatten(PlanRecord::DecisionMatrix(&matrix));
        let option_headings: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Heading { text, level: 2 } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            option_headings,
            vec!["Brushed DC", "BLDC", "Option 3", "Lidar (Recommended)"]
        );
    }

    #[test]
    fn test_decision_matrix_option_details() {
        let matrix: DecisionMatrix = parse(json!({
            "summary": "Choose the drivetrain.",
            "subsystems": [{
                "name": "Drive",
                "purpose": "Move the rover",
                "options": [{
                    "name": "BLDC",
                    "description": "Efficient",
                    "pros": ["quiet", "efficient"],
                    "cons": ["needs ESC"],
                    "cost": "$40",
                    "availability": "In stock"
                }],
                "recommendation": "BLDC"
            }],
            "recommendation": "Go with BLDC."
        }));
        let blocks = flatten(PlanRecord::DecisionMatrix(&matrix));
        assert_eq!(
            blocks,
            vec![
                ContentBlock::heading("Overview", 1),
                ContentBlock::paragraph("Choose the drivetrain."),
                ContentBlock::heading("Drive", 1),
                ContentBlock::paragraph("Move the rover"),
                ContentBlock::heading("BLDC", 2),
                ContentBlock::paragraph("Efficient"),
                ContentBlock::paragraph("Estimated cost: $40 | Availability: In stock"),
                ContentBlock::heading("Pros", 3),
                ContentBlock::list(vec!["quiet".into(), "efficient".into()]),
                ContentBlock::heading("Cons", 3),
                ContentBlock::list(vec!["needs ESC".into()]),
                ContentBlock::paragraph("Recommendation: BLDC"),
                ContentBlock::heading("Recommendation", 1),
                ContentBlock::paragraph("Go with BLDC."),
            ]
        );
    }

    #[test]
    fn test_blueprint_problem_statement_then_constraints() {
        let blueprint: Blueprint = parse(json!({
            "problem": {"statement": "S", "constraints": ["A", "B"]}
        }));
        let blocks = flatten(PlanRecord::Blueprint(&blueprint));
        assert_eq!(
            blocks,
            vec![
                ContentBlock::heading("Problem Statement", 1),
                ContentBlock::paragraph("S"),
                ContentBlock::heading("Constraints", 2),
                ContentBlock::list(vec!["A".into(), "B".into()]),
            ]
        );
    }

    #[test]
    fn test_blueprint_full_walk() {
        let blueprint: Blueprint = parse(json!({
            "architecture": {
                "overview": "Hub and spoke",
                "blockDiagram": [
                    {"name": "MCU", "description": "Main brain", "connectsTo": ["IMU", "ESC"]},
                    {"description": "nameless"}
                ]
            },
            "components": [{"subsystem": "Drive", "choice": "BLDC", "rationale": "efficient"}],
            "executionSteps": ["Order parts", "Assemble"],
            "testingMethods": ["Bench test"],
            "failureModes": [{"mode": "Brownout", "cause": "sag", "mitigation": "bigger cap"}]
        }));
        let blocks = flatten(PlanRecord::Blueprint(&blueprint));
        assert_eq!(
            headings(&blocks),
            vec![
                "Architecture Overview",
                "Block Diagram",
                "Selected Components",
                "Execution Plan",
                "Testing Methods",
                "Failure Modes"
            ]
        );
        assert!(blocks.contains(&ContentBlock::list(vec![
            "MCU: Main brain (-> IMU, ESC)".into()
        ])));
        assert!(blocks.contains(&ContentBlock::ordered_list(vec![
            "Order parts".into(),
            "Assemble".into()
        ])));
        assert!(blocks.contains(&ContentBlock::list(vec![
            "Brownout (cause: sag). Mitigation: bigger cap".into()
        ])));
        assert!(blocks.contains(&ContentBlock::list(vec!["Drive: BLDC - efficient".into()])));
    }

    #[test]
    fn test_build_guide_full_walk() {
        let guide: BuildGuide = parse(json!({
            "wiring": {
                "connections": [
                    {"from": "Battery +", "to": "ESC VIN", "signal": "12V", "notes": "14 AWG"},
                    {"from": "dangling"}
                ],
                "notes": ["Twist motor leads"]
            },
            "firmware": {"structure": "Superloop", "keyLogic": ["PID at 1kHz"]},
            "calibration": ["Zero the IMU", "Trim the ESC"],
            "commonFailures": [{"symptom": "Jitter", "cause": "noise", "fix": "ferrite"}],
            "safetyNotes": ["Fuse the battery"],
            "nextSteps": ["Outdoor test"]
        }));
        let blocks = flatten(PlanRecord::BuildGuide(&guide));
        assert_eq!(
            headings(&blocks),
            vec![
                "Wiring",
                "Wiring Notes",
                "Firmware",
                "Structure",
                "Key Logic",
                "Calibration",
                "Common Failures",
                "Safety Notes",
                "Next Steps"
            ]
        );
        assert_eq!(
            blocks[1],
            ContentBlock::list(vec!["Battery + -> ESC VIN [12V]: 14 AWG".into()])
        );
        assert!(blocks.contains(&ContentBlock::ordered_list(vec![
            "Zero the IMU".into(),
            "Trim the ESC".into()
        ])));
        assert!(blocks.contains(&ContentBlock::list(vec!["Jitter: noise. Fix: ferrite".into()])));
    }

    #[test]
    fn test_empty_records_flatten_to_nothing() {
        assert!(flatten(PlanRecord::DecisionMatrix(&DecisionMatrix::default())).is_empty());
        assert!(flatten(PlanRecord::Blueprint(&Blueprint::default())).is_empty());
        assert!(flatten(PlanRecord::BuildGuide(&BuildGuide::default())).is_empty());
    }

    #[test]
    fn test_malformed_fields_are_skipped() {
        let guide: BuildGuide = parse(json!({
            "wiring": "see photo",
            "firmware": {"keyLogic": "not a list"},
            "calibration": [null, "Level the bed"],
            "safetyNotes": 7
        }));
        let blocks = flatten(PlanRecord::BuildGuide(&guide));
        assert_eq!(
            blocks,
            vec![
                ContentBlock::heading("Calibration", 1),
                ContentBlock::ordered_list(vec!["Level the bed".into()]),
            ]
        );
    }
}
