use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{auth::extractors::LoggedInUser, db_interaction::get_all_items, models::Item, routes::internal_error, utils::{get_pooled_connection, DbPool}};

#[derive(Serialize, Debug)]
pub struct ItemsListResponse{
    pub items: Vec<Item>
}

#[tracing::instrument(
    "Get all items",
    skip_all
)]
pub async fn list_items(
    pool: web::Data<DbPool>,
    _: LoggedInUser
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| internal_error("Not able to list items", e))?;

    let items = get_all_items(conn)
        .await
        .map_err(|e| internal_error("Not able to list items", e))?;

    Ok(HttpResponse::Ok().json(ItemsListResponse{ items }))
}
