use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::Caller,
};

pub fn require_owner_or_admin(caller: &Caller, resource_owner: &str) -> AppResult<()> {
    if !caller.is_admin() && caller.user_id != resource_owner {
        return Err(AppError::Forbidden(
            "You can only access your own resources".to_string(),
        ));
    }
    Ok(())
}

pub fn extract_caller_from_context(ctx: &Context<'_>) -> AppResult<Caller> {
    ctx.data::<Claims>()
        .map(Claims::caller)
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
