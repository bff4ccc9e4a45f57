use serde::Serialize;
use time::Date;

use crate::core::time::format_date;
use crate::db::models::StudentDetails;
use crate::services::calendar;

#[derive(Debug, Serialize)]
pub(crate) struct StudentDetailsResponse {
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
    pub(crate) current_semester: Option<i32>,
    pub(crate) semester_starts_on: Option<String>,
    pub(crate) semester_ends_on: Option<String>,
}

impl StudentDetailsResponse {
    /// Calendar fields are derived at read time so "today" is always the
    /// actual call-time date, never a stale stored value.
    pub(crate) fn from_db(details: StudentDetails, today: Date) -> Self {
        let snapshot = details.batch_name.as_deref().map(|batch_name| {
            let semester = calendar::current_semester(batch_name, today);
            let (from, to) = calendar::semester_date_range(batch_name, semester, today);
            (semester, from, to)
        });

        Self {
            student_id: details.student_id,
            register_number: details.register_number,
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone,
            parent_name: details.parent_name,
            gender: details.gender,
            batch_id: details.batch_id,
            batch_name: details.batch_name,
            batch_section: details.batch_section,
            department_id: details.department_id,
            department_name: details.department_name,
            tutor_id: details.tutor_id,
            tutor_name: details.tutor_name,
            hod_id: details.hod_id,
            hod_name: details.hod_name,
            current_semester: snapshot.map(|(semester, _, _)| semester),
            semester_starts_on: snapshot.map(|(_, from, _)| format_date(from)),
            semester_ends_on: snapshot.map(|(_, _, to)| format_date(to)),
        }
    }
}
