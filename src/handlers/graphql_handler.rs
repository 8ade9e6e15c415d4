use actix_web::web;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{auth::AuthenticatedUser, graphql::Schema};

/// Executes a GraphQL request with the caller's claims in request data.
pub async fn graphql_handler(
    schema: web::Data<Schema>,
    auth: AuthenticatedUser,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner().data(auth.0)).await.into()
}
