use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "profilerole", rename_all = "lowercase")]
pub(crate) enum ProfileRole {
    Student,
    Tutor,
    Hod,
    Admin,
    Principal,
    Office,
}

impl ProfileRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Tutor => "tutor",
            Self::Hod => "hod",
            Self::Admin => "admin",
            Self::Principal => "principal",
            Self::Office => "office",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "tutor" => Some(Self::Tutor),
            "hod" => Some(Self::Hod),
            "admin" => Some(Self::Admin),
            "principal" => Some(Self::Principal),
            "office" => Some(Self::Office),
            _ => None,
        }
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request status vocabulary. The wire strings are exact and case-sensitive;
/// stored rows and dashboard filters both use them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "requeststatus")]
pub(crate) enum RequestStatus {
    #[serde(rename = "Pending Tutor Approval")]
    #[sqlx(rename = "Pending Tutor Approval")]
    PendingTutorApproval,
    #[serde(rename = "Pending HOD Approval")]
    #[sqlx(rename = "Pending HOD Approval")]
    PendingHodApproval,
    #[serde(rename = "Pending Admin Approval")]
    #[sqlx(rename = "Pending Admin Approval")]
    PendingAdminApproval,
    #[serde(rename = "Pending Principal Approval")]
    #[sqlx(rename = "Pending Principal Approval")]
    PendingPrincipalApproval,
    #[serde(rename = "Approved")]
    #[sqlx(rename = "Approved")]
    Approved,
    #[serde(rename = "Returned by Tutor")]
    #[sqlx(rename = "Returned by Tutor")]
    ReturnedByTutor,
    #[serde(rename = "Returned by HOD")]
    #[sqlx(rename = "Returned by HOD")]
    ReturnedByHod,
    #[serde(rename = "Returned by Admin")]
    #[sqlx(rename = "Returned by Admin")]
    ReturnedByAdmin,
    #[serde(rename = "Returned by Principal")]
    #[sqlx(rename = "Returned by Principal")]
    ReturnedByPrincipal,
}

impl RequestStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::PendingTutorApproval => "Pending Tutor Approval",
            Self::PendingHodApproval => "Pending HOD Approval",
            Self::PendingAdminApproval => "Pending Admin Approval",
            Self::PendingPrincipalApproval => "Pending Principal Approval",
            Self::Approved => "Approved",
            Self::ReturnedByTutor => "Returned by Tutor",
            Self::ReturnedByHod => "Returned by HOD",
            Self::ReturnedByAdmin => "Returned by Admin",
            Self::ReturnedByPrincipal => "Returned by Principal",
        }
    }

    /// Terminal statuses never transition again; a returned request stays as
    /// history and resubmission happens through a brand-new request.
    pub(crate) fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Approved
                | Self::ReturnedByTutor
                | Self::ReturnedByHod
                | Self::ReturnedByAdmin
                | Self::ReturnedByPrincipal
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "batchstatus")]
pub(crate) enum BatchStatus {
    #[serde(rename = "Active")]
    #[sqlx(rename = "Active")]
    Active,
    #[serde(rename = "Inactive")]
    #[sqlx(rename = "Inactive")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "templatetype", rename_all = "lowercase")]
pub(crate) enum TemplateType {
    Html,
    Pdf,
    Word,
}
