//! Domain entities exchanged with the HireTrack API.
//!
//! The remote system owns these records; values here are transient copies.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HireTrackError;

// ============================================================================
// Enums
// ============================================================================

/// Where an applicant sits in the hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus {
    New,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl ApplicantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::New => "new",
            ApplicantStatus::Screening => "screening",
            ApplicantStatus::Interview => "interview",
            ApplicantStatus::Offer => "offer",
            ApplicantStatus::Hired => "hired",
            ApplicantStatus::Rejected => "rejected",
        }
    }

    pub fn variants() -> &'static [ApplicantStatus] {
        &[
            ApplicantStatus::New,
            ApplicantStatus::Screening,
            ApplicantStatus::Interview,
            ApplicantStatus::Offer,
            ApplicantStatus::Hired,
            ApplicantStatus::Rejected,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionStatus {
    Draft,
    Open,
    OnHold,
    Closed,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Draft => "draft",
            PositionStatus::Open => "open",
            PositionStatus::OnHold => "on-hold",
            PositionStatus::Closed => "closed",
        }
    }

    pub fn variants() -> &'static [PositionStatus] {
        &[
            PositionStatus::Draft,
            PositionStatus::Open,
            PositionStatus::OnHold,
            PositionStatus::Closed,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
        }
    }

    pub fn variants() -> &'static [EmploymentType] {
        &[
            EmploymentType::FullTime,
            EmploymentType::PartTime,
            EmploymentType::Contract,
            EmploymentType::Internship,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn variants() -> &'static [SortOrder] {
        &[SortOrder::Asc, SortOrder::Desc]
    }
}

/// Role declared in the user profile. Drives route gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Recruiter,
    Candidate,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Recruiter => "recruiter",
            UserType::Candidate => "candidate",
            UserType::Admin => "admin",
        }
    }

    pub fn variants() -> &'static [UserType] {
        &[UserType::Recruiter, UserType::Candidate, UserType::Admin]
    }
}

/// Display and parsing for the wire-format enums, driven by `as_str`/`variants`.
macro_rules! wire_enum {
    ($($ty:ident => $label:literal),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = HireTrackError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
                    $ty::variants()
                        .iter()
                        .copied()
                        .find(|v| v.as_str() == wanted)
                        .ok_or_else(|| {
                            let expected: Vec<&str> =
                                $ty::variants().iter().map(|v| v.as_str()).collect();
                            HireTrackError::Validation(format!(
                                "unknown {} '{}' (expected one of: {})",
                                $label,
                                s,
                                expected.join(", ")
                            ))
                        })
                }
            }
        )*
    };
}

wire_enum! {
    ApplicantStatus => "applicant status",
    PositionStatus => "position status",
    EmploymentType => "employment type",
    SortOrder => "sort order",
    UserType => "user type",
}

// ============================================================================
// Applicants
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub position_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
    pub status: ApplicantStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    /// Reviewer score, 1-5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub applied_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating an applicant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicant {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub position_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

impl NewApplicant {
    /// Presence checks only; the API owns real validation.
    pub fn validate(&self) -> Result<(), HireTrackError> {
        require_field("name", &self.name)?;
        require_field("email", &self.email)?;
        require_field("positionId", &self.position_id)
    }
}

// ============================================================================
// Positions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: EmploymentType,
    pub status: PositionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u32>,
    #[serde(default)]
    pub applicant_count: u32,
    pub posted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: EmploymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PositionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u32>,
}

impl NewPosition {
    pub fn validate(&self) -> Result<(), HireTrackError> {
        require_field("title", &self.title)?;
        require_field("department", &self.department)
    }
}

/// Partial update for a position. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PositionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u32>,
}

impl PositionUpdate {
    pub fn is_empty(&self) -> bool {
        *self == PositionUpdate::default()
    }
}

// ============================================================================
// Users
// ============================================================================

/// Client-declared profile, stored alongside the token and in a cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
}

// ============================================================================
// Response shapes
// ============================================================================

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

/// List endpoints answer either with a page object or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListPayload<T> {
    Page(Paginated<T>),
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub(crate) fn into_page(self) -> Paginated<T> {
        match self {
            ListPayload::Page(page) => page,
            ListPayload::Bare(items) => {
                let count = items.len() as u32;
                Paginated {
                    total: items.len() as u64,
                    page: 1,
                    limit: count,
                    data: items,
                }
            }
        }
    }
}

/// Single-entity endpoints answer either `{ "data": … }` or the bare entity.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SinglePayload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> SinglePayload<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            SinglePayload::Wrapped { data } => data,
            SinglePayload::Bare(item) => item,
        }
    }
}

fn require_field(name: &str, value: &str) -> Result<(), HireTrackError> {
    if value.trim().is_empty() {
        return Err(HireTrackError::Validation(format!("{} is required", name)));
    }
    Ok(())
}
