use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use time::Date;

use crate::core::time::format_certificate_date;
use crate::db::models::{CertificateRequest, CertificateTemplate, StudentDetails};
use crate::db::types::TemplateType;
use crate::services::calendar;

pub(crate) const SIGNATURE_LINE: &str =
    "This certificate is electronically generated and does not require a signature.";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RenderError {
    #[error("certificate template is missing")]
    MissingTemplate,
    #[error("student record is missing")]
    MissingStudent,
}

/// Where a certificate's body comes from. Only html templates carry inline
/// content for the substitution pipeline; uploaded templates resolve to their
/// file reference and bypass rendering entirely.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TemplateSource<'a> {
    Inline(&'a str),
    File(&'a str),
}

pub(crate) fn template_source(
    template: &CertificateTemplate,
) -> Result<TemplateSource<'_>, RenderError> {
    match template.template_type {
        TemplateType::Html => {
            template.content.as_deref().map(TemplateSource::Inline).ok_or(RenderError::MissingTemplate)
        }
        TemplateType::Pdf | TemplateType::Word => {
            template.file_url.as_deref().map(TemplateSource::File).ok_or(RenderError::MissingTemplate)
        }
    }
}

struct GrammarProfile {
    salutation: &'static str,
    parent_relation: &'static str,
    he_she: &'static str,
    his_her: &'static str,
}

fn grammar_for(gender: &str) -> GrammarProfile {
    if gender == "Female" {
        GrammarProfile { salutation: "Ms.", parent_relation: "D/o", he_she: "She", his_her: "her" }
    } else {
        GrammarProfile { salutation: "Mr.", parent_relation: "S/o", he_she: "He", his_her: "his" }
    }
}

fn standalone_he() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bHe\b").expect("valid word pattern"))
}

fn standalone_his() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bhis\b").expect("valid word pattern"))
}

fn or_na(value: Option<&str>) -> String {
    value.map(str::to_string).unwrap_or_else(|| "N/A".to_string())
}

/// Renders the certificate text for an HTML-type template.
///
/// Templates are authored as prose carrying natural English gender markers
/// alongside explicit machine placeholders, so substitution runs as an
/// ordered pipeline: content placeholders first, then bare prose markers
/// (longest pattern first), then the explicit grammar placeholders. The
/// order is load-bearing; a later rule must never re-match text a previous
/// rule inserted. Pure over its inputs, so re-rendering the same tuple gives
/// byte-identical output.
///
/// File-backed templates (pdf/word) never reach this function; callers hand
/// out the template's file reference instead.
pub(crate) fn render(
    request: &CertificateRequest,
    student: Option<&StudentDetails>,
    template: Option<&CertificateTemplate>,
    include_signature: bool,
    today: Date,
) -> Result<String, RenderError> {
    let template = template.ok_or(RenderError::MissingTemplate)?;
    let student = student.ok_or(RenderError::MissingStudent)?;
    let content = template.content.as_deref().ok_or(RenderError::MissingTemplate)?;

    let grammar = grammar_for(&student.gender);
    let student_name =
        format!("{} {}", student.first_name, student.last_name).trim().to_string();
    let semester = student
        .batch_name
        .as_deref()
        .map(|batch_name| calendar::current_semester(batch_name, today));

    // {reason} is a legacy alias of {purpose}; the free-text reason is only
    // exposed through {detailedReason}.
    let placeholders: [(&str, String); 11] = [
        ("{studentName}", student_name),
        ("{studentId}", student.register_number.clone()),
        ("{purpose}", request.request_type.clone()),
        ("{subPurpose}", request.sub_type.clone().unwrap_or_default()),
        ("{reason}", request.request_type.clone()),
        ("{detailedReason}", request.reason.clone()),
        ("{parentName}", or_na(student.parent_name.as_deref())),
        ("{department}", or_na(student.department_name.as_deref())),
        ("{batch}", or_na(student.batch_name.as_deref())),
        ("{currentSemester}", semester.map(|s| s.to_string()).unwrap_or_else(|| "N/A".to_string())),
        ("{date}", format_certificate_date(today)),
    ];

    let mut text = content.to_string();
    for (token, value) in &placeholders {
        text = text.replace(token, value);
    }

    text = text.replace("Mr/Ms", grammar.salutation);
    text = text.replace("S/o or D/o", grammar.parent_relation);
    text = text.replace("He/She", grammar.he_she);
    text = text.replace("his/her", grammar.his_her);
    text = standalone_he().replace_all(&text, grammar.he_she).into_owned();
    text = standalone_his().replace_all(&text, grammar.his_her).into_owned();

    text = text.replace("{salutation}", grammar.salutation);
    text = text.replace("{parentRelation}", grammar.parent_relation);
    text = text.replace("{heShe}", grammar.he_she);
    text = text.replace("{hisHer}", grammar.his_her);

    if include_signature {
        text.push_str("\n\n");
        text.push_str(SIGNATURE_LINE);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::{RequestStatus, TemplateType};
    use time::macros::{date, datetime};

    fn sample_request() -> CertificateRequest {
        let created = datetime!(2026 - 02 - 01 10 : 00 : 00);
        CertificateRequest {
            id: "req-1".to_string(),
            student_id: "stu-1".to_string(),
            request_date: date!(2026 - 02 - 01),
            request_type: "Bank Loan".to_string(),
            sub_type: Some("Education Loan".to_string()),
            reason: "Needed for the sanction letter".to_string(),
            status: RequestStatus::Approved,
            template_id: Some("tpl-1".to_string()),
            return_reason: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn sample_student(gender: &str) -> StudentDetails {
        StudentDetails {
            student_id: "stu-1".to_string(),
            register_number: "7376211CS239".to_string(),
            first_name: "Priya".to_string(),
            last_name: "Raman".to_string(),
            email: "priya@example.edu".to_string(),
            phone: Some("9876543210".to_string()),
            parent_name: Some("Raman K".to_string()),
            gender: gender.to_string(),
            batch_id: Some("batch-1".to_string()),
            batch_name: Some("2023-2027".to_string()),
            batch_section: Some("A".to_string()),
            department_id: Some("dept-1".to_string()),
            department_name: Some("Computer Science".to_string()),
            tutor_id: Some("tut-1".to_string()),
            tutor_name: Some("Anitha S".to_string()),
            hod_id: Some("hod-1".to_string()),
            hod_name: Some("Kumar V".to_string()),
        }
    }

    fn html_template(content: &str) -> CertificateTemplate {
        let created = datetime!(2026 - 01 - 01 00 : 00 : 00);
        CertificateTemplate {
            id: "tpl-1".to_string(),
            name: "Standard Bonafide".to_string(),
            template_type: TemplateType::Html,
            content: Some(content.to_string()),
            file_url: None,
            created_at: created,
            updated_at: created,
        }
    }

    const TODAY: Date = date!(2026 - 03 - 15);

    #[test]
    fn missing_template_and_student_are_reported() {
        let request = sample_request();
        let student = sample_student("Female");
        let template = html_template("x");

        assert_eq!(
            render(&request, Some(&student), None, false, TODAY),
            Err(RenderError::MissingTemplate)
        );
        assert_eq!(
            render(&request, None, Some(&template), false, TODAY),
            Err(RenderError::MissingStudent)
        );
    }

    #[test]
    fn content_placeholders_substitute_every_occurrence() {
        let template = html_template(
            "{studentName} ({studentId}) of {department}, batch {batch}, semester \
             {currentSemester}, requests a certificate for {purpose} / {subPurpose}. \
             Purpose again: {reason}. Details: {detailedReason}. Parent: {parentName}. \
             Dated {date}. Repeat: {studentName}.",
        );
        let rendered =
            render(&sample_request(), Some(&sample_student("Female")), Some(&template), false, TODAY)
                .expect("render");

        assert!(rendered.starts_with("Priya Raman (7376211CS239) of Computer Science"));
        assert!(rendered.contains("batch 2023-2027, semester 6"));
        assert!(rendered.contains("for Bank Loan / Education Loan"));
        assert!(rendered.contains("Purpose again: Bank Loan."));
        assert!(rendered.contains("Details: Needed for the sanction letter."));
        assert!(rendered.contains("Parent: Raman K."));
        assert!(rendered.contains("Dated 15/03/2026."));
        assert!(rendered.ends_with("Repeat: Priya Raman."));
    }

    #[test]
    fn female_grammar_profile_applies_to_prose_and_placeholders() {
        let template = html_template(
            "Mr/Ms {studentName}, S/o or D/o {parentName}. He/She studies here; his/her record \
             is clean. He met his tutor. {salutation} {parentRelation} {heShe} {hisHer}",
        );
        let rendered =
            render(&sample_request(), Some(&sample_student("Female")), Some(&template), false, TODAY)
                .expect("render");

        assert!(rendered.starts_with("Ms. Priya Raman, D/o Raman K."));
        assert!(rendered.contains("She studies here; her record is clean."));
        assert!(rendered.contains("She met her tutor."));
        assert!(rendered.ends_with("Ms. D/o She her"));
    }

    #[test]
    fn default_grammar_profile_is_male() {
        let template = html_template("Mr/Ms X, S/o or D/o Y. He/She left. his/her file. He and his dog.");
        let rendered =
            render(&sample_request(), Some(&sample_student("Male")), Some(&template), false, TODAY)
                .expect("render");

        assert_eq!(rendered, "Mr. X, S/o Y. He left. his file. He and his dog.");
    }

    #[test]
    fn standalone_words_do_not_match_inside_other_words() {
        let template = html_template("Hero history She Health; this is his.");
        let rendered =
            render(&sample_request(), Some(&sample_student("Female")), Some(&template), false, TODAY)
                .expect("render");

        assert_eq!(rendered, "Hero history She Health; this is her.");
    }

    #[test]
    fn missing_optional_fields_render_as_na() {
        let mut student = sample_student("Female");
        student.parent_name = None;
        student.department_name = None;
        student.batch_name = None;
        let mut request = sample_request();
        request.sub_type = None;

        let template = html_template("{parentName}|{department}|{batch}|{currentSemester}|{subPurpose}|");
        let rendered =
            render(&request, Some(&student), Some(&template), false, TODAY).expect("render");

        assert_eq!(rendered, "N/A|N/A|N/A|N/A||");
    }

    #[test]
    fn signature_line_is_appended_on_request() {
        let template = html_template("Body");
        let without =
            render(&sample_request(), Some(&sample_student("Female")), Some(&template), false, TODAY)
                .expect("render");
        let with =
            render(&sample_request(), Some(&sample_student("Female")), Some(&template), true, TODAY)
                .expect("render");

        assert_eq!(without, "Body");
        assert_eq!(with, format!("Body\n\n{SIGNATURE_LINE}"));
    }

    #[test]
    fn uploaded_templates_resolve_to_their_file_reference() {
        let created = datetime!(2026 - 01 - 01 00 : 00 : 00);
        let template = CertificateTemplate {
            id: "tpl-2".to_string(),
            name: "Letterhead Bonafide".to_string(),
            template_type: TemplateType::Pdf,
            content: None,
            file_url: Some("https://files.example.edu/tpl-2.pdf".to_string()),
            created_at: created,
            updated_at: created,
        };

        assert_eq!(
            template_source(&template),
            Ok(TemplateSource::File("https://files.example.edu/tpl-2.pdf"))
        );

        let inline = html_template("Body");
        assert_eq!(template_source(&inline), Ok(TemplateSource::Inline("Body")));
    }

    #[test]
    fn rendering_is_idempotent() {
        let template = html_template("Mr/Ms {studentName}, semester {currentSemester}, {date}. He/She.");
        let first =
            render(&sample_request(), Some(&sample_student("Female")), Some(&template), true, TODAY)
                .expect("render");
        let second =
            render(&sample_request(), Some(&sample_student("Female")), Some(&template), true, TODAY)
                .expect("render");

        assert_eq!(first, second);
    }
}
