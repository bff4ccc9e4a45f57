use serde::Serialize;

use crate::db::models::CertificateTemplate;
use crate::db::types::TemplateType;

#[derive(Debug, Serialize)]
pub(crate) struct TemplateResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) template_type: TemplateType,
    pub(crate) content: Option<String>,
    pub(crate) file_url: Option<String>,
}

impl TemplateResponse {
    pub(crate) fn from_db(template: CertificateTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name,
            template_type: template.template_type,
            content: template.content,
            file_url: template.file_url,
        }
    }
}
