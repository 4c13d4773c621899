//! Lead export renderers.
//!
//! CSV for spreadsheets and a plain newline-separated email list for the
//! clipboard. Both keep collection order (newest first).

use crate::email::is_valid_email;
use crate::error::{Result, ScoutError};
use crate::types::Lead;
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 10] = [
    "First Name",
    "Last Name",
    "Email",
    "Job Title",
    "Company",
    "Location",
    "Phone",
    "LinkedIn",
    "Website",
    "Confidence",
];

/// Render leads as CSV with every field quoted.
pub fn leads_to_csv(leads: &[Lead]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(export_error)?;

    for lead in leads {
        writer
            .write_record([
                lead.first_name.as_str(),
                lead.last_name.as_str(),
                lead.email.as_str(),
                lead.job_title.as_str(),
                lead.company_name.as_str(),
                lead.location.as_str(),
                lead.phone.as_str(),
                lead.linkedin.as_str(),
                lead.website.as_str(),
                lead.email_confidence.label(),
            ])
            .map_err(export_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScoutError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ScoutError::Export(e.to_string()))
}

/// Newline-joined emails of leads whose address passes validation.
#[must_use]
pub fn emails_for_clipboard(leads: &[Lead]) -> String {
    leads
        .iter()
        .filter_map(Lead::email)
        .filter(|email| is_valid_email(email))
        .collect::<Vec<_>>()
        .join("\n")
}

fn export_error(err: csv::Error) -> ScoutError {
    ScoutError::Export(err.to_string())
}
