use async_graphql::{Context, Object, ResultExt};

use crate::{
    app_state::AppState,
    auth::extract_caller_from_context,
    models::{
        domain::Certificate,
        dto::{
            assessment_dto::PublicAssessment,
            request::PaginationParams,
            response::{EligibilityResponse, PaginatedAttempts},
        },
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The assessment as shown before submission. No answer keys.
    async fn assessment(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<PublicAssessment> {
        let state = ctx.data::<AppState>()?;
        let caller = extract_caller_from_context(ctx).extend()?;

        state
            .assessment_service
            .get_public_assessment(&caller, &id)
            .await
            .extend()
    }

    async fn eligibility(
        &self,
        ctx: &Context<'_>,
        assessment_id: String,
    ) -> async_graphql::Result<EligibilityResponse> {
        let state = ctx.data::<AppState>()?;
        let caller = extract_caller_from_context(ctx).extend()?;

        state
            .assessment_service
            .check_eligibility(&caller, &assessment_id)
            .await
            .extend()
    }

    async fn my_attempts(
        &self,
        ctx: &Context<'_>,
        assessment_id: String,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> async_graphql::Result<PaginatedAttempts> {
        let state = ctx.data::<AppState>()?;
        let caller = extract_caller_from_context(ctx).extend()?;

        state
            .assessment_service
            .attempt_history(&caller, &assessment_id, None, &PaginationParams { offset, limit })
            .await
            .extend()
    }

    async fn my_certificates(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Certificate>> {
        let state = ctx.data::<AppState>()?;
        let caller = extract_caller_from_context(ctx).extend()?;

        state.certificate_service.list_for_caller(&caller).await.extend()
    }

    async fn certificate(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Certificate> {
        let state = ctx.data::<AppState>()?;
        let caller = extract_caller_from_context(ctx).extend()?;

        state
            .certificate_service
            .get_certificate(&caller, &id)
            .await
            .extend()
    }
}
