use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::{auth::extractors::IsVendor, db_interaction::{insert_item, ItemInsertError}, models::Item, routes::message_response, utils::{error_fmt_chain, get_pooled_connection, not_blank, DbPool}};

#[derive(Deserialize, Debug, Validate)]
pub struct AddItemRequest{
    #[validate(
        length(min = 1, max = 128, message = "item_name must be 1 to 128 characters long"),
        custom(function = "not_blank")
    )]
    pub item_name: String,
    #[validate(range(min = 0, message = "calories_per_gm can't be negative"))]
    pub calories_per_gm: i32,
    #[validate(range(min = 0, message = "available_quantity can't be negative"))]
    pub available_quantity: i32,
    #[validate(
        length(min = 1, max = 128, message = "restaurant_name must be 1 to 128 characters long"),
        custom(function = "not_blank")
    )]
    pub restaurant_name: String,
    #[validate(range(min = 0, message = "unit_price can't be negative"))]
    pub unit_price: i32
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AddItemResponse{
    pub message: String,
    pub item_id: Uuid
}

#[derive(Error)]
pub enum AddItemError{
    #[error("{0}")]
    ValidationError(String),
    #[error("Not able to add item")]
    InsertError(#[from] ItemInsertError),
    #[error("Not able to add item")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for AddItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for AddItemError {
    fn status_code(&self) -> StatusCode {
        match self {
            AddItemError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        message_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    "Adding item for vendor",
    skip(pool, vendor),
    fields(vendor_id = %vendor.0.user_id)
)]
pub async fn add_item(
    pool: web::Data<DbPool>,
    request: web::Json<AddItemRequest>,
    vendor: IsVendor
) -> Result<HttpResponse, AddItemError>{
    request.validate()
        .map_err(|e| AddItemError::ValidationError(e.to_string()))?;

    let request = request.into_inner();
    let now = Utc::now();
    let item = Item{
        item_id: Uuid::new_v4(),
        vendor_id: vendor.0.user_id,
        item_name: request.item_name.trim().to_string(),
        calories_per_gm: request.calories_per_gm,
        available_quantity: request.available_quantity,
        restaurant_name: request.restaurant_name.trim().to_string(),
        unit_price: request.unit_price,
        is_active: true,
        created_ts: now,
        updated_ts: now
    };
    let item_id = item.item_id;

    let conn = get_pooled_connection(&pool)
                .await
                .context("Failed to get connection from pool")?;

    insert_item(conn, item).await?;

    Ok(HttpResponse::Ok().json(AddItemResponse{
        message: "Item added successfully".to_string(),
        item_id
    }))
}
