//! Lead request construction.
//!
//! Turns the user's criteria plus the identities already collected into the
//! instruction payload sent to a search provider.

use scout_core::criteria::or_any;
use scout_core::{LeadIdentity, ScoutConfig, SearchCriteria, ABSENT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Write as _;

/// Fields every raw lead object declares, in schema order.
pub const LEAD_FIELDS: [&str; 10] = [
    "firstName",
    "lastName",
    "email",
    "phone",
    "jobTitle",
    "companyName",
    "location",
    "linkedin",
    "website",
    "emailConfidence",
];

/// Fields the provider must always fill.
pub const REQUIRED_LEAD_FIELDS: [&str; 5] = [
    "firstName",
    "lastName",
    "jobTitle",
    "companyName",
    "emailConfidence",
];

/// Bounds applied while building a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    /// Maximum known identities listed as exclusions
    pub exclusion_limit: usize,
    /// Minimum leads requested per response
    pub min_batch_size: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self::from(&ScoutConfig::default())
    }
}

impl From<&ScoutConfig> for RequestLimits {
    fn from(config: &ScoutConfig) -> Self {
        Self {
            exclusion_limit: config.exclusion_limit,
            min_batch_size: config.min_batch_size,
        }
    }
}

/// Instruction payload for a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRequest {
    /// Standing instructions: filters, rules, exclusions
    pub system_instruction: String,
    /// The user-turn prompt
    pub prompt: String,
    /// Identities the provider must not return again
    pub exclusions: Vec<String>,
    /// Minimum number of leads asked for
    pub batch_size: usize,
    /// JSON schema the response array must follow
    pub response_schema: Value,
    /// Whether the provider should ground answers in live search
    pub grounding: bool,
}

/// Build the request for one search cycle.
///
/// `known` is the collection's identities in collection order (newest
/// first); only the first `limits.exclusion_limit` are listed.
#[must_use]
pub fn build_lead_request(
    criteria: &SearchCriteria,
    known: &[LeadIdentity],
    limits: RequestLimits,
) -> LeadRequest {
    let exclusions: Vec<String> = known
        .iter()
        .take(limits.exclusion_limit)
        .map(|identity| identity.as_str().to_string())
        .collect();
    let batch_size = limits.min_batch_size;

    let mut instruction = String::from(
        "You are a B2B lead researcher. Use live web search to find real people who \
         currently hold the target roles and match the filters below.\n\n",
    );
    let _ = writeln!(instruction, "Target roles: {}", or_any(&criteria.target_roles));
    let _ = writeln!(instruction, "Industries: {}", or_any(&criteria.industries));
    let _ = writeln!(instruction, "Keywords: {}", or_any(&criteria.keywords));
    let _ = writeln!(instruction, "Location: {}", or_any(&criteria.location));

    instruction.push_str("\nRules:\n");
    instruction.push_str(
        "- Only return people and details you actually found in search results. \
         Do not fabricate names, emails, phone numbers or URLs.\n",
    );
    let _ = writeln!(
        instruction,
        "- When a detail cannot be found, prefer absence over a guess: use \"{ABSENT}\" \
         for email and phone and leave other fields empty."
    );
    if !criteria.include_contact_info {
        let _ = writeln!(
            instruction,
            "- Contact details are not needed: set email and phone to \"{ABSENT}\"."
        );
    }
    instruction.push_str(
        "- emailConfidence must be one of Verified, High, Low or Estimated.\n",
    );
    let _ = writeln!(
        instruction,
        "- Return at least {batch_size} leads in a single response."
    );

    if !exclusions.is_empty() {
        instruction.push_str("- Do not return anyone with these emails or profile URLs:\n");
        for identity in &exclusions {
            let _ = writeln!(instruction, "  - {identity}");
        }
    }

    let prompt = format!(
        "Find at least {batch_size} new leads: {}. Respond with a JSON array only.",
        criteria.summary()
    );

    LeadRequest {
        system_instruction: instruction,
        prompt,
        exclusions,
        batch_size,
        response_schema: lead_response_schema(),
        grounding: true,
    }
}

/// Response schema: an array of raw lead objects.
#[must_use]
pub fn lead_response_schema() -> Value {
    let properties: serde_json::Map<String, Value> = LEAD_FIELDS
        .iter()
        .map(|field| ((*field).to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": REQUIRED_LEAD_FIELDS,
        }
    })
}
