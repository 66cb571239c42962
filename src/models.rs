use crate::errors::{AppError, LookupError};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

// ============ Lookup input ============

/// Opaque location key (BAG id) supplied by the caller.
///
/// Only checked for being non-empty; it is passed through unchanged into the
/// request message and into every result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        if value.is_empty() {
            return Err(AppError::InvalidIdentifier);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The application sending the StUF question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub application: String,
    pub user: String,
}

/// The register answering the StUF question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverIdentity {
    pub application: String,
    pub organisation: String,
}

// ============ Parsed answer ============

/// A resident registered at an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    /// Always present for alive residents; dead residents are not validated.
    pub birthdate: Option<NaiveDate>,
    /// Raw death date; absent or empty means the person is alive.
    pub date_of_death: Option<String>,
}

impl PersonRecord {
    pub fn is_alive(&self) -> bool {
        self.date_of_death
            .as_deref()
            .map_or(true, |date| date.trim().is_empty())
    }
}

/// Plain address fields as found in the answer. Nil elements are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDetails {
    pub postcode: Option<String>,
    pub place: Option<String>,
    pub street_name: Option<String>,
    pub house_number: Option<String>,
    pub house_letter: Option<String>,
    pub house_number_addition: Option<String>,
}

/// One matched address entity with its residents, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub identifier: Identifier,
    pub details: AddressDetails,
    pub residents: Vec<PersonRecord>,
}

// ============ Indicators ============

/// Severity of an indicator; `High` (2) takes priority over `Normal` (3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningLevel {
    High,
    Normal,
}

impl WarningLevel {
    pub fn value(&self) -> u8 {
        match self {
            WarningLevel::High => 2,
            WarningLevel::Normal => 3,
        }
    }
}

impl Serialize for WarningLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum IndicatorKind {
    #[serde(rename = "vulnerable persons")]
    VulnerablePersons,
    #[serde(rename = "number of persons")]
    NumberOfPersons,
}

/// A derived fire-brigade risk flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Indicator {
    /// Warning level, 2 or 3.
    #[schema(value_type = u8, example = 2)]
    pub level: WarningLevel,
    pub kind: IndicatorKind,
    #[schema(example = "age")]
    pub label: String,
    #[schema(example = "Registered: 0-12: 0, 13-69: 1, 70+: 0.")]
    pub detail: String,
}

// ============ Lookup output ============

/// The location a result refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Location {
    #[schema(value_type = String, example = "0363200000399540")]
    pub identifier: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number_addition: Option<String>,
}

impl Location {
    pub fn bare(identifier: Identifier) -> Self {
        Self::with_details(identifier, AddressDetails::default())
    }

    pub fn with_details(identifier: Identifier, details: AddressDetails) -> Self {
        Self {
            identifier,
            postcode: details.postcode,
            place: details.place,
            street_name: details.street_name,
            house_number: details.house_number,
            house_letter: details.house_letter,
            house_number_addition: details.house_number_addition,
        }
    }
}

/// Successful lookup of one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AddressIndicators {
    pub location: Location,
    pub indicators: Vec<Indicator>,
}

/// Failed lookup; `location` only carries the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LookupFailure {
    pub location: Location,
    #[schema(value_type = String, example = "no address found")]
    pub error: LookupError,
}

/// Result entry for one identifier (or one of its addresses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LookupResult {
    Found(AddressIndicators),
    Failed(LookupFailure),
}

impl LookupResult {
    pub fn found(location: Location, indicators: Vec<Indicator>) -> Self {
        LookupResult::Found(AddressIndicators {
            location,
            indicators,
        })
    }

    pub fn failed(identifier: Identifier, error: LookupError) -> Self {
        LookupResult::Failed(LookupFailure {
            location: Location::bare(identifier),
            error,
        })
    }

    pub fn identifier(&self) -> &Identifier {
        match self {
            LookupResult::Found(found) => &found.location.identifier,
            LookupResult::Failed(failed) => &failed.location.identifier,
        }
    }

    pub fn indicators(&self) -> Option<&[Indicator]> {
        match self {
            LookupResult::Found(found) => Some(&found.indicators),
            LookupResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<LookupError> {
        match self {
            LookupResult::Found(_) => None,
            LookupResult::Failed(failed) => Some(failed.error),
        }
    }
}
