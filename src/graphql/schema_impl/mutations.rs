use async_graphql::{Context, Object, ResultExt};

use crate::{
    app_state::AppState,
    auth::extract_caller_from_context,
    models::{
        domain::Certificate,
        dto::{
            request::{IssueCertificateRequest, SubmitAssessmentRequest},
            response::SubmissionResponse,
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn submit_assessment(
        &self,
        ctx: &Context<'_>,
        input: SubmitAssessmentRequest,
    ) -> async_graphql::Result<SubmissionResponse> {
        let state = ctx.data::<AppState>()?;
        let caller = extract_caller_from_context(ctx).extend()?;

        state.assessment_service.submit(&caller, &input).await.extend()
    }

    async fn issue_certificate(
        &self,
        ctx: &Context<'_>,
        assessment_id: String,
        student_name: String,
    ) -> async_graphql::Result<Certificate> {
        let state = ctx.data::<AppState>()?;
        let caller = extract_caller_from_context(ctx).extend()?;

        state
            .certificate_service
            .issue_for_caller(&caller, &assessment_id, &IssueCertificateRequest { student_name })
            .await
            .extend()
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Claims;
    use crate::graphql::create_schema;
    use crate::models::domain::UserRole;
    use crate::test_utils::test_helpers::seeded_state;

    const SUBMIT: &str = r#"mutation {
        submitAssessment(input: {
            assessmentId: "assessment-1",
            answers: [
                {questionId: "mc", answer: "1"},
                {questionId: "tf", answer: "false"},
                {questionId: "sa", answer: "let"},
                {questionId: "essay", answer: "REST APIs use HTTP verbs to manipulate resources statelessly."}
            ]
        }) { score passed attemptNumber canRetake }
    }"#;

    #[tokio::test]
    async fn test_submit_and_issue_through_graphql() {
        let (state, _) = seeded_state().await;
        let schema = create_schema(state);
        let claims = Claims::new("user-1", "Ada", UserRole::User, 1);

        let response = schema
            .execute(async_graphql::Request::new(SUBMIT).data(claims.clone()))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["submitAssessment"]["score"], 100);
        assert_eq!(data["submitAssessment"]["passed"], true);

        let issue = r#"mutation { issueCertificate(assessmentId: "assessment-1", studentName: "Ada") { id score studentName } }"#;
        let response = schema
            .execute(async_graphql::Request::new(issue).data(claims))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["issueCertificate"]["studentName"], "Ada");
    }

    #[tokio::test]
    async fn test_second_submission_after_pass_carries_error_code() {
        let (state, _) = seeded_state().await;
        let schema = create_schema(state);
        let claims = Claims::new("user-1", "Ada", UserRole::User, 1);

        schema
            .execute(async_graphql::Request::new(SUBMIT).data(claims.clone()))
            .await;
        let response = schema
            .execute(async_graphql::Request::new(SUBMIT).data(claims))
            .await;

        assert_eq!(response.errors.len(), 1);
        let code = response.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("ALREADY_PASSED")));
    }

    #[tokio::test]
    async fn test_missing_claims_is_rejected() {
        let (state, _) = seeded_state().await;
        let schema = create_schema(state);

        let response = schema
            .execute(r#"{ assessment(id: "assessment-1") { id } }"#)
            .await;

        assert_eq!(response.errors.len(), 1);
    }
}
