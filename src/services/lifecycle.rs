use thiserror::Error;

use crate::db::models::CertificateRequest;
use crate::db::types::{ProfileRole, RequestStatus};

/// A transition outside the reviewing table, or one attempted without its
/// required side data. Always surfaced to the caller; never coerced into a
/// silent no-op.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("transition from '{from}' to '{to}' is not allowed for role '{role}': {detail}")]
pub(crate) struct IllegalTransition {
    pub(crate) role: ProfileRole,
    pub(crate) from: RequestStatus,
    pub(crate) to: RequestStatus,
    pub(crate) detail: &'static str,
}

/// Side data accompanying a transition: the tutor-forward step carries the
/// chosen template, every returning step carries a reason.
#[derive(Debug, Default, Clone)]
pub(crate) struct TransitionData {
    pub(crate) template_id: Option<String>,
    pub(crate) return_reason: Option<String>,
}

enum Action<'a> {
    Forward,
    SelectTemplate(&'a str),
    Return(&'a str),
}

/// Validates `(actor_role, current status, target status)` against the
/// reviewing table and returns the updated request.
///
/// Only `status` plus the transition's own side data field (`template_id` on
/// the tutor forward, `return_reason` on returns) are touched. Department and
/// batch scoping is the caller's concern; this function checks role/state
/// compatibility only. The caller must have fetched the request immediately
/// before and must persist the result conditioned on the status still
/// matching `request.status`.
pub(crate) fn apply_transition(
    request: &CertificateRequest,
    actor_role: ProfileRole,
    target: RequestStatus,
    data: &TransitionData,
) -> Result<CertificateRequest, IllegalTransition> {
    let from = request.status;
    let illegal = |detail: &'static str| IllegalTransition { role: actor_role, from, to: target, detail };

    if from.is_terminal() {
        return Err(illegal("the request already reached a terminal status"));
    }

    let template_id = data.template_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
    let return_reason =
        data.return_reason.as_deref().map(str::trim).filter(|reason| !reason.is_empty());

    let action = match (actor_role, from, target) {
        (ProfileRole::Tutor, RequestStatus::PendingTutorApproval, RequestStatus::PendingHodApproval) => {
            Action::SelectTemplate(
                template_id.ok_or_else(|| illegal("a certificate template must be chosen"))?,
            )
        }
        (ProfileRole::Tutor, RequestStatus::PendingTutorApproval, RequestStatus::ReturnedByTutor)
        | (ProfileRole::Hod, RequestStatus::PendingHodApproval, RequestStatus::ReturnedByHod)
        | (
            ProfileRole::Principal,
            RequestStatus::PendingPrincipalApproval,
            RequestStatus::ReturnedByPrincipal,
        ) => Action::Return(return_reason.ok_or_else(|| illegal("a return reason is required"))?),
        (ProfileRole::Hod, RequestStatus::PendingHodApproval, RequestStatus::PendingPrincipalApproval) => {
            Action::Forward
        }
        (ProfileRole::Principal, RequestStatus::PendingPrincipalApproval, RequestStatus::Approved) => {
            if request.template_id.is_none() {
                return Err(illegal("no certificate template was selected for this request"));
            }
            Action::Forward
        }
        _ => return Err(illegal("no such transition for this role")),
    };

    let mut updated = request.clone();
    updated.status = target;
    match action {
        Action::Forward => {}
        Action::SelectTemplate(template_id) => updated.template_id = Some(template_id.to_string()),
        Action::Return(reason) => updated.return_reason = Some(reason.to_string()),
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn request_with_status(status: RequestStatus) -> CertificateRequest {
        let created = datetime!(2026 - 01 - 10 09 : 30 : 00);
        CertificateRequest {
            id: "req-1".to_string(),
            student_id: "stu-1".to_string(),
            request_date: date!(2026 - 01 - 10),
            request_type: "Bonafide".to_string(),
            sub_type: Some("Bank Loan".to_string()),
            reason: "Education loan application".to_string(),
            status,
            template_id: None,
            return_reason: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn with_template(mut request: CertificateRequest) -> CertificateRequest {
        request.template_id = Some("tpl-1".to_string());
        request
    }

    fn forward_data(template_id: &str) -> TransitionData {
        TransitionData { template_id: Some(template_id.to_string()), return_reason: None }
    }

    fn return_data(reason: &str) -> TransitionData {
        TransitionData { template_id: None, return_reason: Some(reason.to_string()) }
    }

    #[test]
    fn tutor_forward_records_the_chosen_template() {
        let request = request_with_status(RequestStatus::PendingTutorApproval);
        let updated = apply_transition(
            &request,
            ProfileRole::Tutor,
            RequestStatus::PendingHodApproval,
            &forward_data("tpl-1"),
        )
        .expect("tutor forward");

        assert_eq!(updated.status, RequestStatus::PendingHodApproval);
        assert_eq!(updated.template_id.as_deref(), Some("tpl-1"));
        assert_eq!(updated.return_reason, None);
        assert_eq!(updated.reason, request.reason);
    }

    #[test]
    fn tutor_forward_without_template_is_illegal() {
        let request = request_with_status(RequestStatus::PendingTutorApproval);
        let err = apply_transition(
            &request,
            ProfileRole::Tutor,
            RequestStatus::PendingHodApproval,
            &TransitionData::default(),
        )
        .expect_err("missing template");

        assert_eq!(err.from, RequestStatus::PendingTutorApproval);
        assert_eq!(err.to, RequestStatus::PendingHodApproval);
    }

    #[test]
    fn blank_template_id_counts_as_missing() {
        let request = request_with_status(RequestStatus::PendingTutorApproval);
        apply_transition(
            &request,
            ProfileRole::Tutor,
            RequestStatus::PendingHodApproval,
            &forward_data("   "),
        )
        .expect_err("blank template id");
    }

    #[test]
    fn returns_require_a_reason() {
        let request = request_with_status(RequestStatus::PendingHodApproval);
        apply_transition(
            &request,
            ProfileRole::Hod,
            RequestStatus::ReturnedByHod,
            &TransitionData::default(),
        )
        .expect_err("missing reason");
        apply_transition(&request, ProfileRole::Hod, RequestStatus::ReturnedByHod, &return_data(" "))
            .expect_err("blank reason");
    }

    #[test]
    fn return_populates_the_reason() {
        let request = request_with_status(RequestStatus::PendingPrincipalApproval);
        let updated = apply_transition(
            &request,
            ProfileRole::Principal,
            RequestStatus::ReturnedByPrincipal,
            &return_data("Seal missing on the enclosure"),
        )
        .expect("principal return");

        assert_eq!(updated.status, RequestStatus::ReturnedByPrincipal);
        assert_eq!(updated.return_reason.as_deref(), Some("Seal missing on the enclosure"));
    }

    #[test]
    fn hod_forward_carries_no_side_data() {
        let request = with_template(request_with_status(RequestStatus::PendingHodApproval));
        let updated = apply_transition(
            &request,
            ProfileRole::Hod,
            RequestStatus::PendingPrincipalApproval,
            &TransitionData::default(),
        )
        .expect("hod forward");

        assert_eq!(updated.status, RequestStatus::PendingPrincipalApproval);
        assert_eq!(updated.template_id, request.template_id);
    }

    #[test]
    fn approval_requires_a_previously_selected_template() {
        let request = request_with_status(RequestStatus::PendingPrincipalApproval);
        apply_transition(
            &request,
            ProfileRole::Principal,
            RequestStatus::Approved,
            &TransitionData::default(),
        )
        .expect_err("approve without template");

        let updated = apply_transition(
            &with_template(request),
            ProfileRole::Principal,
            RequestStatus::Approved,
            &TransitionData::default(),
        )
        .expect("approve");
        assert_eq!(updated.status, RequestStatus::Approved);
    }

    #[test]
    fn role_must_match_the_stage() {
        let request = with_template(request_with_status(RequestStatus::PendingHodApproval));
        for role in [ProfileRole::Student, ProfileRole::Tutor, ProfileRole::Admin, ProfileRole::Office]
        {
            apply_transition(
                &request,
                role,
                RequestStatus::PendingPrincipalApproval,
                &TransitionData::default(),
            )
            .expect_err("wrong role");
        }
    }

    #[test]
    fn skipping_a_stage_is_illegal() {
        let request = with_template(request_with_status(RequestStatus::PendingTutorApproval));
        apply_transition(
            &request,
            ProfileRole::Principal,
            RequestStatus::Approved,
            &TransitionData::default(),
        )
        .expect_err("skip to approval");
        apply_transition(
            &request,
            ProfileRole::Tutor,
            RequestStatus::PendingPrincipalApproval,
            &forward_data("tpl-1"),
        )
        .expect_err("skip hod");
    }

    #[test]
    fn admin_stages_have_no_reviewing_transitions() {
        let pending = with_template(request_with_status(RequestStatus::PendingAdminApproval));
        apply_transition(
            &pending,
            ProfileRole::Admin,
            RequestStatus::PendingPrincipalApproval,
            &TransitionData::default(),
        )
        .expect_err("admin forward is not part of the chain");
        apply_transition(
            &pending,
            ProfileRole::Admin,
            RequestStatus::ReturnedByAdmin,
            &return_data("out of band"),
        )
        .expect_err("admin return is not part of the chain");
    }

    #[test]
    fn only_the_documented_transitions_are_legal() {
        const ALL_STATUSES: [RequestStatus; 9] = [
            RequestStatus::PendingTutorApproval,
            RequestStatus::PendingHodApproval,
            RequestStatus::PendingAdminApproval,
            RequestStatus::PendingPrincipalApproval,
            RequestStatus::Approved,
            RequestStatus::ReturnedByTutor,
            RequestStatus::ReturnedByHod,
            RequestStatus::ReturnedByAdmin,
            RequestStatus::ReturnedByPrincipal,
        ];
        const ALL_ROLES: [ProfileRole; 6] = [
            ProfileRole::Student,
            ProfileRole::Tutor,
            ProfileRole::Hod,
            ProfileRole::Admin,
            ProfileRole::Principal,
            ProfileRole::Office,
        ];
        let legal = [
            (ProfileRole::Tutor, RequestStatus::PendingTutorApproval, RequestStatus::PendingHodApproval),
            (ProfileRole::Tutor, RequestStatus::PendingTutorApproval, RequestStatus::ReturnedByTutor),
            (ProfileRole::Hod, RequestStatus::PendingHodApproval, RequestStatus::PendingPrincipalApproval),
            (ProfileRole::Hod, RequestStatus::PendingHodApproval, RequestStatus::ReturnedByHod),
            (ProfileRole::Principal, RequestStatus::PendingPrincipalApproval, RequestStatus::Approved),
            (
                ProfileRole::Principal,
                RequestStatus::PendingPrincipalApproval,
                RequestStatus::ReturnedByPrincipal,
            ),
        ];

        // Full side data everywhere, so legality depends on the table alone.
        let data = TransitionData {
            template_id: Some("tpl-1".to_string()),
            return_reason: Some("needs another look".to_string()),
        };

        for role in ALL_ROLES {
            for from in ALL_STATUSES {
                for to in ALL_STATUSES {
                    let request = with_template(request_with_status(from));
                    let result = apply_transition(&request, role, to, &data);
                    assert_eq!(
                        result.is_ok(),
                        legal.contains(&(role, from, to)),
                        "role {role} from '{from}' to '{to}'"
                    );
                }
            }
        }
    }

    #[test]
    fn terminal_statuses_reject_every_transition() {
        for status in [
            RequestStatus::Approved,
            RequestStatus::ReturnedByTutor,
            RequestStatus::ReturnedByHod,
            RequestStatus::ReturnedByAdmin,
            RequestStatus::ReturnedByPrincipal,
        ] {
            let request = with_template(request_with_status(status));
            let err = apply_transition(
                &request,
                ProfileRole::Principal,
                RequestStatus::Approved,
                &TransitionData::default(),
            )
            .expect_err("terminal");
            assert_eq!(err.from, status);
        }
    }
}
