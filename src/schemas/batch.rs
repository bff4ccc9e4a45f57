use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::format_date;
use crate::db::types::BatchStatus;
use crate::repositories::batches::BatchWithDepartment;
use crate::services::calendar;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct BatchCreate {
    #[validate(length(min = 9, max = 40))]
    pub(crate) name: String,
    #[validate(length(min = 1, max = 20))]
    pub(crate) section: Option<String>,
    #[validate(length(min = 1))]
    pub(crate) department_id: String,
    pub(crate) tutor_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct BatchUpdate {
    #[validate(length(min = 9, max = 40))]
    pub(crate) name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub(crate) section: Option<String>,
    pub(crate) tutor_id: Option<String>,
    pub(crate) status: Option<BatchStatus>,
    /// Operator escape hatch; the derived semester is used when absent.
    pub(crate) semester_override: Option<i32>,
    #[serde(default)]
    pub(crate) clear_semester_override: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) section: Option<String>,
    pub(crate) department_id: String,
    pub(crate) department_name: String,
    pub(crate) tutor_id: Option<String>,
    pub(crate) status: BatchStatus,
    pub(crate) current_semester: i32,
    pub(crate) semester_starts_on: String,
    pub(crate) semester_ends_on: String,
    pub(crate) semester_override: Option<i32>,
}

impl BatchResponse {
    pub(crate) fn from_db(row: BatchWithDepartment, today: Date) -> Self {
        let batch = row.batch;
        let current_semester = batch
            .semester_override
            .unwrap_or_else(|| calendar::current_semester(&batch.name, today));
        let (from, to) = calendar::semester_date_range(&batch.name, current_semester, today);

        Self {
            id: batch.id,
            name: batch.name,
            section: batch.section,
            department_id: batch.department_id,
            department_name: row.department_name,
            tutor_id: batch.tutor_id,
            status: batch.status,
            current_semester,
            semester_starts_on: format_date(from),
            semester_ends_on: format_date(to),
            semester_override: batch.semester_override,
        }
    }
}
