//! Lookup enums stored as SMALLINT columns.
//!
//! Each enum variant's discriminant matches the `CHECK` range declared on the
//! corresponding column in the migrations (1-based). The [`Lookup`] trait
//! gives every enum a stable snake_case key and a human-readable display name,
//! which the metadata catalog exposes to the dashboard.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Lookup ID type matching SMALLINT in the database.
pub type LookupId = i16;

/// One `{id, key, display_name}` entry of a metadata category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupItem {
    pub id: DbId,
    pub key: String,
    pub display_name: String,
}

/// A named list of lookup items (e.g. `"incident_severity"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupCategory {
    pub category: String,
    pub items: Vec<LookupItem>,
}

/// Common behaviour of SMALLINT-backed enums.
pub trait Lookup: Sized + Copy + 'static {
    /// Metadata category name, e.g. `"care_level"`.
    const CATEGORY: &'static str;

    /// Every variant in id order.
    const ALL: &'static [Self];

    fn id(self) -> LookupId;

    fn key(self) -> &'static str;

    fn display_name(self) -> &'static str;

    fn from_id(id: LookupId) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.id() == id)
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.key() == key)
    }

    /// Build the metadata category listing every variant.
    fn category() -> LookupCategory {
        LookupCategory {
            category: Self::CATEGORY.to_string(),
            items: Self::ALL
                .iter()
                .map(|v| LookupItem {
                    id: DbId::from(v.id()),
                    key: v.key().to_string(),
                    display_name: v.display_name().to_string(),
                })
                .collect(),
        }
    }
}

/// Resolve a lookup id supplied by a client, rejecting out-of-range values.
pub fn parse_lookup<E: Lookup>(id: LookupId) -> Result<E, CoreError> {
    E::from_id(id).ok_or_else(|| {
        CoreError::Validation(format!("Invalid {} id: {id}", E::CATEGORY))
    })
}

/// Validate an optional lookup id (e.g. from a partial update).
pub fn parse_optional_lookup<E: Lookup>(id: Option<LookupId>) -> Result<Option<E>, CoreError> {
    id.map(parse_lookup::<E>).transpose()
}

macro_rules! define_lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($category:literal) {
            $( $variant:ident = $val:literal => ($key:literal, $display:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant = $val ),+
        }

        impl $crate::lookups::Lookup for $name {
            const CATEGORY: &'static str = $category;
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn id(self) -> $crate::lookups::LookupId {
                self as $crate::lookups::LookupId
            }

            fn key(self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }

            fn display_name(self) -> &'static str {
                match self {
                    $( $name::$variant => $display ),+
                }
            }
        }

        impl From<$name> for $crate::lookups::LookupId {
            fn from(value: $name) -> Self {
                value as $crate::lookups::LookupId
            }
        }
    };
}

pub(crate) use define_lookup_enum;

define_lookup_enum! {
    /// Client gender as recorded on intake.
    Gender("gender") {
        Male = 1 => ("male", "Male"),
        Female = 2 => ("female", "Female"),
        NonBinary = 3 => ("non_binary", "Non-binary"),
        PreferNotToSay = 4 => ("prefer_not_to_say", "Prefer not to say"),
    }
}

define_lookup_enum! {
    /// Level of support a client requires.
    CareLevel("care_level") {
        Low = 1 => ("low", "Low"),
        Medium = 2 => ("medium", "Medium"),
        High = 3 => ("high", "High"),
        Complex = 4 => ("complex", "Complex"),
    }
}

define_lookup_enum! {
    /// Kind of work logged in a job-time entry.
    JobType("job_type") {
        PersonalCare = 1 => ("personal_care", "Personal Care"),
        Medication = 2 => ("medication", "Medication Support"),
        Companionship = 3 => ("companionship", "Companionship"),
        Domestic = 4 => ("domestic", "Domestic Support"),
        Transport = 5 => ("transport", "Transport"),
        Respite = 6 => ("respite", "Respite"),
        Other = 7 => ("other", "Other"),
    }
}

define_lookup_enum! {
    /// Incident classification.
    IncidentType("incident_type") {
        Fall = 1 => ("fall", "Fall"),
        Medication = 2 => ("medication", "Medication Error"),
        Behavioural = 3 => ("behavioural", "Behavioural"),
        Injury = 4 => ("injury", "Injury"),
        Safeguarding = 5 => ("safeguarding", "Safeguarding"),
        Complaint = 6 => ("complaint", "Complaint"),
        Other = 7 => ("other", "Other"),
    }
}

define_lookup_enum! {
    /// Incident severity.
    IncidentSeverity("incident_severity") {
        Low = 1 => ("low", "Low"),
        Medium = 2 => ("medium", "Medium"),
        High = 3 => ("high", "High"),
        Critical = 4 => ("critical", "Critical"),
    }
}

define_lookup_enum! {
    /// Incident follow-up status.
    IncidentStatus("incident_status") {
        Open = 1 => ("open", "Open"),
        UnderReview = 2 => ("under_review", "Under Review"),
        Resolved = 3 => ("resolved", "Resolved"),
        Closed = 4 => ("closed", "Closed"),
    }
}

impl IncidentStatus {
    /// Resolved and closed incidents carry a `resolved_at` timestamp.
    pub fn is_terminal(self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Closed)
    }
}

define_lookup_enum! {
    /// Category of a required client document.
    DocumentType("document_type") {
        CarePlan = 1 => ("care_plan", "Care Plan"),
        RiskAssessment = 2 => ("risk_assessment", "Risk Assessment"),
        Consent = 3 => ("consent", "Consent Form"),
        MedicalReport = 4 => ("medical_report", "Medical Report"),
        Review = 5 => ("review", "Review"),
        Other = 6 => ("other", "Other"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_migration_ranges() {
        assert_eq!(Gender::Male.id(), 1);
        assert_eq!(Gender::PreferNotToSay.id(), 4);
        assert_eq!(CareLevel::Complex.id(), 4);
        assert_eq!(JobType::Other.id(), 7);
        assert_eq!(IncidentType::Other.id(), 7);
        assert_eq!(IncidentSeverity::Critical.id(), 4);
        assert_eq!(IncidentStatus::Closed.id(), 4);
        assert_eq!(DocumentType::Other.id(), 6);
    }

    #[test]
    fn from_id_rejects_out_of_range() {
        assert_eq!(CareLevel::from_id(0), None);
        assert_eq!(CareLevel::from_id(5), None);
        assert_eq!(CareLevel::from_id(-1), None);
        assert_eq!(CareLevel::from_id(2), Some(CareLevel::Medium));
    }

    #[test]
    fn from_key_finds_variant() {
        assert_eq!(
            IncidentStatus::from_key("under_review"),
            Some(IncidentStatus::UnderReview)
        );
        assert_eq!(IncidentStatus::from_key("Under Review"), None);
    }

    #[test]
    fn category_lists_every_variant_in_order() {
        let cat = IncidentSeverity::category();
        assert_eq!(cat.category, "incident_severity");
        let ids: Vec<DbId> = cat.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(cat.items[3].display_name, "Critical");
    }

    #[test]
    fn parse_lookup_reports_category_in_error() {
        let err = parse_lookup::<DocumentType>(42).unwrap_err();
        assert!(
            err.to_string().contains("document_type"),
            "unexpected message: {err}"
        );
        assert_eq!(parse_lookup::<DocumentType>(1).unwrap(), DocumentType::CarePlan);
    }

    #[test]
    fn parse_optional_lookup_passes_none_through() {
        assert_eq!(parse_optional_lookup::<Gender>(None).unwrap(), None);
        assert_eq!(
            parse_optional_lookup::<Gender>(Some(2)).unwrap(),
            Some(Gender::Female)
        );
        assert!(parse_optional_lookup::<Gender>(Some(9)).is_err());
    }

    #[test]
    fn terminal_incident_statuses() {
        assert!(IncidentStatus::Resolved.is_terminal());
        assert!(IncidentStatus::Closed.is_terminal());
        assert!(!IncidentStatus::Open.is_terminal());
        assert!(!IncidentStatus::UnderReview.is_terminal());
    }
}
