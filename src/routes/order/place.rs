use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::IsCustomer, db_interaction::{place_order as place_order_in_database, PlaceOrderError}, routes::message_response, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct PlaceOrderRequest{
    pub order_id: Uuid
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PlaceOrderResponse{
    pub message: String,
    pub total_amount: i64
}

#[derive(Error)]
pub enum PlaceOrderRouteError{
    #[error("{0}")]
    Rejected(#[source] PlaceOrderError),
    #[error("Not able to place order")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for PlaceOrderRouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<PlaceOrderError> for PlaceOrderRouteError {
    fn from(e: PlaceOrderError) -> Self {
        match e {
            PlaceOrderError::ThreadpoolError(_) | PlaceOrderError::RunQueryError(_) => {
                PlaceOrderRouteError::UnexpectedError(e.into())
            },
            _ => PlaceOrderRouteError::Rejected(e)
        }
    }
}

impl ResponseError for PlaceOrderRouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            PlaceOrderRouteError::Rejected(e) => match e {
                PlaceOrderError::NoOrderIdError(_) => StatusCode::NOT_FOUND,
                PlaceOrderError::EmptyOrder(_) | PlaceOrderError::TotalOverflow => StatusCode::BAD_REQUEST,
                PlaceOrderError::AlreadyPlaced(_)
                | PlaceOrderError::ItemUnavailable(_)
                | PlaceOrderError::InsufficientStock{ .. } => StatusCode::CONFLICT,
                PlaceOrderError::ThreadpoolError(_)
                | PlaceOrderError::RunQueryError(_) => StatusCode::INTERNAL_SERVER_ERROR
            },
            PlaceOrderRouteError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        message_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    "Placing order",
    skip(pool, customer),
    fields(customer_id = %customer.0.user_id)
)]
pub async fn place_order(
    pool: web::Data<DbPool>,
    request: web::Json<PlaceOrderRequest>,
    customer: IsCustomer
) -> Result<HttpResponse, PlaceOrderRouteError> {
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let total_amount = place_order_in_database(conn, customer.0.user_id, request.order_id).await?;

    Ok(HttpResponse::Ok().json(PlaceOrderResponse{
        message: "Order is successfully placed".to_string(),
        total_amount
    }))
}
