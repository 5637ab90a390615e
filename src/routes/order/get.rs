use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::extractors::{IsAdmin, LoggedInUser}, db_interaction::{get_all_orders, get_placed_orders_for_customer, CustomerOrder}, domain::user_level::UserLevel, models::Order, routes::{internal_error, message_response}, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct ListOrdersRequest{
    pub cust_id: Uuid
}

#[derive(Serialize, Debug)]
pub struct ListOrdersResponse{
    pub orders: Vec<CustomerOrder>
}

#[derive(Serialize, Debug)]
pub struct AllOrdersResponse{
    pub orders: Vec<Order>
}

#[derive(Error)]
pub enum ListOrdersError{
    #[error("Customers can only list their own orders")]
    Forbidden,
    #[error("Not able to list orders")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for ListOrdersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ListOrdersError {
    fn status_code(&self) -> StatusCode {
        match self {
            ListOrdersError::Forbidden => StatusCode::FORBIDDEN,
            ListOrdersError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        message_response(self.status_code(), self.to_string())
    }
}

// Customers only see their own orders, vendors and admins may look up anyone
fn may_list_orders_of(caller: &LoggedInUser, customer_id: Uuid) -> bool {
    caller.level != UserLevel::Customer || caller.user_id == customer_id
}

#[tracing::instrument(
    "Getting placed orders of customer",
    skip(pool, caller),
    fields(caller_id = %caller.user_id)
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    request: web::Json<ListOrdersRequest>,
    caller: LoggedInUser
) -> Result<HttpResponse, ListOrdersError> {
    if !may_list_orders_of(&caller, request.cust_id) {
        return Err(ListOrdersError::Forbidden)
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let orders = get_placed_orders_for_customer(conn, request.cust_id).await?;

    Ok(HttpResponse::Ok().json(ListOrdersResponse{ orders }))
}

#[tracing::instrument(
    "Getting every order for admin",
    skip_all
)]
pub async fn list_all_orders(
    pool: web::Data<DbPool>,
    _: IsAdmin
) -> Result<HttpResponse, actix_web::Error> {
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| internal_error("Not able to list orders", e))?;

    let orders = get_all_orders(conn)
        .await
        .map_err(|e| internal_error("Not able to list orders", e))?;

    Ok(HttpResponse::Ok().json(AllOrdersResponse{ orders }))
}
