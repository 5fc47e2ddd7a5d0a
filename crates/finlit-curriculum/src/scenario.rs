use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One telling of a scenario step, written for particular learner goals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioVariant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audience: Vec<String>,
    #[serde(default)]
    pub default: bool,
    /// Prompt, choices, and any other step payload.
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

/// Pick the variant for a learner goal.
///
/// Order of preference: a variant whose `audience` names the goal
/// (case-insensitive), the variant flagged `default`, the first variant.
/// Only an empty slice yields `None`.
pub fn select_variant<'a>(
    variants: &'a [ScenarioVariant],
    goal: Option<&str>,
) -> Option<&'a ScenarioVariant> {
    let goal = goal.map(str::trim).filter(|g| !g.is_empty());
    goal.and_then(|goal| {
        variants.iter().find(|variant| {
            variant
                .audience
                .iter()
                .any(|audience| audience.trim().eq_ignore_ascii_case(goal))
        })
    })
    .or_else(|| variants.iter().find(|variant| variant.default))
    .or_else(|| variants.first())
}
