use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsCustomer, db_interaction::{create_cart, CreateCartError}, domain::order_lines::{merge_order_lines, OrderLine, OrderLinesError}, routes::message_response, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct OrderItemRequest{
    pub item_id: Uuid,
    pub quantity: i32
}

#[derive(Deserialize, Debug)]
pub struct CreateItemsOrderRequest{
    pub order_items: Vec<OrderItemRequest>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateItemsOrderResponse{
    pub message: String,
    pub order_id: Uuid
}

#[derive(Error)]
pub enum CreateItemsOrderError{
    #[error("{0}")]
    InvalidLines(#[from] OrderLinesError),
    #[error("{0}")]
    UnavailableItems(#[source] CreateCartError),
    #[error("Not able to add order")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for CreateItemsOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for CreateItemsOrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            CreateItemsOrderError::InvalidLines(_) => StatusCode::BAD_REQUEST,
            CreateItemsOrderError::UnavailableItems(_) => StatusCode::NOT_FOUND,
            CreateItemsOrderError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        message_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    "Adding items order to cart",
    skip(pool, request, customer),
    fields(customer_id = %customer.0.user_id)
)]
pub async fn create_items_order(
    pool: web::Data<DbPool>,
    request: web::Json<CreateItemsOrderRequest>,
    customer: IsCustomer
) -> Result<HttpResponse, CreateItemsOrderError> {
    let lines = request.into_inner()
        .order_items
        .into_iter()
        .map(|line| OrderLine{ item_id: line.item_id, quantity: line.quantity })
        .collect();
    let lines = merge_order_lines(lines)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let order_id = create_cart(conn, customer.0.user_id, lines)
        .await
        .map_err(|e| {
            match e {
                CreateCartError::UnavailableItems(_) => CreateItemsOrderError::UnavailableItems(e),
                _ => CreateItemsOrderError::UnexpectedError(e.into())
            }
        })?;

    Ok(HttpResponse::Ok().json(CreateItemsOrderResponse{
        message: "Order added to cart successfully".to_string(),
        order_id
    }))
}
