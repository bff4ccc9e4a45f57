use serde::Serialize;

use crate::db::models::Department;

#[derive(Debug, Serialize)]
pub(crate) struct DepartmentResponse {
    pub(crate) id: String,
    pub(crate) name: String,
}

impl DepartmentResponse {
    pub(crate) fn from_db(department: Department) -> Self {
        Self { id: department.id, name: department.name }
    }
}
