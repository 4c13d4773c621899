//! Search criteria submitted by the user.

use crate::email::is_valid_email;
use crate::error::{FieldError, ScoutError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Goal count for a search, restricted to a fixed set of sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ResultsAmount {
    /// 10 leads
    Ten,
    /// 25 leads
    TwentyFive,
    /// 50 leads
    Fifty,
    /// 100 leads
    Hundred,
    /// 250 leads
    TwoHundredFifty,
}

impl ResultsAmount {
    /// Every allowed goal, smallest first.
    pub const ALL: [Self; 5] = [
        Self::Ten,
        Self::TwentyFive,
        Self::Fifty,
        Self::Hundred,
        Self::TwoHundredFifty,
    ];

    /// Number of leads this goal asks for.
    #[must_use]
    pub fn count(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
            Self::TwoHundredFifty => 250,
        }
    }
}

impl Default for ResultsAmount {
    fn default() -> Self {
        Self::Fifty
    }
}

impl TryFrom<u32> for ResultsAmount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|amount| amount.count() == value as usize)
            .ok_or_else(|| {
                format!("unsupported results amount {value}, expected one of 10, 25, 50, 100, 250")
            })
    }
}

impl From<ResultsAmount> for u32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from(amount: ResultsAmount) -> Self {
        amount.count() as u32
    }
}

impl fmt::Display for ResultsAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// What the user is looking for.
///
/// Free-text fields may be empty, which means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    /// Roles to target, e.g. "CTO, VP Engineering"
    pub target_roles: String,
    /// Extra keywords
    pub keywords: String,
    /// Industries to target
    pub industries: String,
    /// Free-text location
    pub location: String,
    /// Whether the provider should look for email and phone
    pub include_contact_info: bool,
    /// Goal count for the session
    pub results_amount: ResultsAmount,
}

impl SearchCriteria {
    /// Check the criteria before they are sent anywhere.
    ///
    /// Any keyword token containing `@` must be a valid email address.
    /// Every bad token is reported, each as its own [`FieldError`].
    pub fn validate(&self) -> Result<(), ScoutError> {
        let errors: Vec<FieldError> = keyword_tokens(&self.keywords)
            .filter(|token| token.contains('@') && !is_valid_email(token))
            .map(|token| {
                FieldError::new("keywords", format!("'{token}' is not a valid email address"))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScoutError::Validation(errors))
        }
    }

    /// Short human summary used in log lines.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} in {}",
            or_any(&self.target_roles),
            or_any(&self.location)
        )
    }
}

fn keyword_tokens(keywords: &str) -> impl Iterator<Item = &str> {
    keywords
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

/// Render a blank criteria field as "any".
#[must_use]
pub fn or_any(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "any"
    } else {
        trimmed
    }
}
