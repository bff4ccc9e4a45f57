use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{BatchStatus, ProfileRole, RequestStatus, TemplateType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Profile {
    pub(crate) id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) role: ProfileRole,
    pub(crate) department_id: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Department {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Batch {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) section: Option<String>,
    pub(crate) department_id: String,
    pub(crate) tutor_id: Option<String>,
    pub(crate) status: BatchStatus,
    pub(crate) semester_override: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CertificateTemplate {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) template_type: TemplateType,
    pub(crate) content: Option<String>,
    pub(crate) file_url: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CertificateRequest {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) request_date: Date,
    pub(crate) request_type: String,
    pub(crate) sub_type: Option<String>,
    pub(crate) reason: String,
    pub(crate) status: RequestStatus,
    pub(crate) template_id: Option<String>,
    pub(crate) return_reason: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Composed read view of a student: profile fields plus the resolved batch,
/// department, tutor, and HOD references. Produced by a repository join;
/// never written back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentDetails {
    pub(crate) student_id: String,
    pub(crate) register_number: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) parent_name: Option<String>,
    pub(crate) gender: String,
    pub(crate) batch_id: Option<String>,
    pub(crate) batch_name: Option<String>,
    pub(crate) batch_section: Option<String>,
    pub(crate) department_id: Option<String>,
    pub(crate) department_name: Option<String>,
    pub(crate) tutor_id: Option<String>,
    pub(crate) tutor_name: Option<String>,
    pub(crate) hod_id: Option<String>,
    pub(crate) hod_name: Option<String>,
}
