use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_date, format_primitive};
use crate::db::models::CertificateRequest;
use crate::db::types::{RequestStatus, TemplateType};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RequestCreate {
    #[validate(length(min = 1, max = 120))]
    pub(crate) request_type: String,
    #[validate(length(max = 120))]
    pub(crate) sub_type: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub(crate) reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionPayload {
    pub(crate) target_status: RequestStatus,
    #[serde(default)]
    pub(crate) template_id: Option<String>,
    #[serde(default)]
    pub(crate) return_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) request_date: String,
    pub(crate) request_type: String,
    pub(crate) sub_type: Option<String>,
    pub(crate) reason: String,
    pub(crate) status: RequestStatus,
    pub(crate) template_id: Option<String>,
    pub(crate) return_reason: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl RequestResponse {
    pub(crate) fn from_db(request: CertificateRequest) -> Self {
        Self {
            id: request.id,
            student_id: request.student_id,
            request_date: format_date(request.request_date),
            request_type: request.request_type,
            sub_type: request.sub_type,
            reason: request.reason,
            status: request.status,
            template_id: request.template_id,
            return_reason: request.return_reason,
            created_at: format_primitive(request.created_at),
            updated_at: format_primitive(request.updated_at),
        }
    }
}

/// Issued certificate, either rendered text (html templates) or a pointer to
/// the template's uploaded document (pdf/word templates).
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum CertificateResponse {
    Text { request_id: String, template_id: String, body: String },
    File { request_id: String, template_id: String, template_type: TemplateType, file_url: String },
}
