/// Placeholder token a user prompt may embed to control where the rubric
/// list is inserted.
pub const RUBRIC_PLACEHOLDER: &str = "{{RUBRIC_SECTIONS}}";

/// The fixed checklist of review sections every composed prompt carries.
pub const DEFAULT_RUBRIC: [&str; 9] = [
    "Problem definition / goals (explicit KPIs)",
    "Scope / out of scope",
    "Personas / user journeys",
    "Functional requirements (user stories + acceptance criteria)",
    "Non-functional requirements (SLO / security / availability / incident response)",
    "Data / events / logging / metrics (A/B)",
    "External integrations / APIs / constraints",
    "Risks / assumptions / dependencies / milestones",
    "Release / rollout / monitoring / operations",
];

/// Merge a user prompt with the rubric checklist.
///
/// The rubric is rendered as a markdown bullet list in input order. If the
/// prompt contains [`RUBRIC_PLACEHOLDER`], its first occurrence is replaced
/// with the list; otherwise the list is appended under a `[Rubric]` marker.
/// Pure function: no I/O, deterministic for identical arguments.
pub fn compose_prompt(user_prompt: &str, rubric: &[&str]) -> String {
    let list = rubric
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    if user_prompt.contains(RUBRIC_PLACEHOLDER) {
        user_prompt.replacen(RUBRIC_PLACEHOLDER, &list, 1)
    } else {
        format!("{}\n\n[Rubric]\n{list}", user_prompt.trim())
    }
}
