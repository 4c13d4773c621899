//! Lead post-processing: normalize, re-validate, deduplicate.
//!
//! Provider output is untrusted. Every record is normalized into a [`Lead`],
//! its email is checked again locally, and anything already collected (or
//! already accepted earlier in the same batch) is dropped.

use scout_core::{absent, is_valid_email, EmailConfidence, Lead, LeadId, LeadIdentity, ABSENT};
use scout_llm::RawLead;
use std::collections::HashSet;

/// Placeholder for missing names, titles, companies and locations.
pub const UNKNOWN: &str = "Unknown";

/// Trimmed value, or `None` when missing, blank or the absence sentinel.
fn present(value: Option<&String>) -> Option<&str> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ABSENT))
}

fn or_unknown(value: Option<&String>) -> String {
    present(value).unwrap_or(UNKNOWN).to_string()
}

fn or_absent(value: Option<&String>) -> String {
    present(value).map_or_else(absent, ToString::to_string)
}

fn or_empty(value: Option<&String>) -> String {
    present(value).unwrap_or_default().to_string()
}

/// Only the exact sentinel counts as a missing email. Variants like "null"
/// stay in place so [`revalidate`] downgrades their confidence.
fn email_or_absent(value: Option<&String>) -> String {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != ABSENT)
        .map_or_else(absent, ToString::to_string)
}

/// Convert one raw record into a lead with defaults filled in.
///
/// The lead gets a fresh id and the given source label. No validation
/// happens here; see [`revalidate`].
#[must_use]
pub fn normalize(raw: &RawLead, source: &str) -> Lead {
    Lead {
        id: LeadId::generate(),
        first_name: or_unknown(raw.first_name.as_ref()),
        last_name: or_unknown(raw.last_name.as_ref()),
        job_title: or_unknown(raw.job_title.as_ref()),
        company_name: or_unknown(raw.company_name.as_ref()),
        location: or_unknown(raw.location.as_ref()),
        website: or_empty(raw.website.as_ref()),
        linkedin: or_empty(raw.linkedin.as_ref()),
        email: email_or_absent(raw.email.as_ref()),
        phone: or_absent(raw.phone.as_ref()),
        email_confidence: present(raw.email_confidence.as_ref())
            .map(EmailConfidence::from_claim)
            .unwrap_or_default(),
        source: Some(source.to_string()),
    }
}

/// Replace an invalid email with the sentinel and force `Low` confidence.
///
/// Returns `true` if the lead was downgraded.
pub fn revalidate(lead: &mut Lead) -> bool {
    if lead.email == ABSENT || is_valid_email(&lead.email) {
        return false;
    }
    tracing::debug!(email = %lead.email, "Dropping invalid email from lead");
    lead.email = absent();
    lead.email_confidence = EmailConfidence::Low;
    true
}

/// Run the full pipeline over one provider batch.
///
/// `existing` holds the identities already in the collection. The result
/// keeps provider order and contains only leads that are new.
#[must_use]
pub fn process_batch(raw: &[RawLead], existing: &HashSet<LeadIdentity>, source: &str) -> Vec<Lead> {
    let mut seen: HashSet<LeadIdentity> = HashSet::new();
    let mut accepted = Vec::with_capacity(raw.len());
    let mut downgraded = 0usize;

    for record in raw {
        let mut lead = normalize(record, source);
        if revalidate(&mut lead) {
            downgraded += 1;
        }

        // Leads with neither email nor LinkedIn are never filtered.
        if let Some(identity) = lead.identity() {
            if existing.contains(&identity) || !seen.insert(identity) {
                continue;
            }
        }
        accepted.push(lead);
    }

    tracing::debug!(
        received = raw.len(),
        accepted = accepted.len(),
        downgraded,
        "Post-processed lead batch"
    );
    accepted
}
