use std::{collections::HashMap, error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::order_lines::{order_total, OrderLine}, models::{Item, Order, OrderItemModel}, schema::{items, order_items, orders}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

// Error associated with creating a cart and its order_items
#[derive(Error)]
pub enum CreateCartError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("items not found or not active: {}", format_ids(.0))]
    UnavailableItems(Vec<Uuid>)
}

impl Debug for CreateCartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

fn format_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[tracing::instrument(
    "Creating cart with order items",
    skip(conn, lines),
    fields(line_count = lines.len())
)]
pub async fn create_cart(
    mut conn: DbConnection,
    user_id: Uuid,
    lines: Vec<OrderLine>
) -> Result<Uuid, CreateCartError> {

    let order_id = spawn_blocking_with_tracing(move || {
        conn.transaction::<Uuid, CreateCartError, _>(|conn| {
            let requested: Vec<Uuid> = lines.iter().map(|line| line.item_id).collect();

            let active: Vec<Uuid> = items::table
                .filter(items::item_id.eq_any(requested.clone()))
                .filter(items::is_active.eq(true))
                .select(items::item_id)
                .load::<Uuid>(conn)?;

            let missing: Vec<Uuid> = requested
                .into_iter()
                .filter(|id| !active.contains(id))
                .collect();

            if !missing.is_empty() {
                return Err(CreateCartError::UnavailableItems(missing))
            }

            let now = Utc::now();
            let order = Order{
                order_id: Uuid::new_v4(),
                user_id,
                total_amount: 0,
                is_placed: false,
                is_active: true,
                created_ts: now,
                updated_ts: now
            };

            diesel::insert_into(orders::table)
                .values(&order)
                .execute(conn)?;

            let rows: Vec<OrderItemModel> = lines
                .iter()
                .map(|line| OrderItemModel{
                    id: Uuid::new_v4(),
                    order_id: order.order_id,
                    item_id: line.item_id,
                    quantity: line.quantity,
                    is_active: true
                })
                .collect();

            diesel::insert_into(order_items::table)
                .values(&rows)
                .execute(conn)?;

            Ok(order.order_id)
        })
    })
    .await??;

    Ok(order_id)
}

// Error associated with placing an order and decrementing item stock
#[derive(Error)]
pub enum PlaceOrderError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("order_id: {0} doesn't exist")]
    NoOrderIdError(Uuid),
    #[error("order_id: {0} is already placed")]
    AlreadyPlaced(Uuid),
    #[error("order_id: {0} has no items")]
    EmptyOrder(Uuid),
    #[error("item_id: {0} is no longer available")]
    ItemUnavailable(Uuid),
    #[error("item_id: {item_id} has {available} units left, {requested} requested")]
    InsufficientStock{
        item_id: Uuid,
        requested: i32,
        available: i32
    },
    #[error("order total is too large")]
    TotalOverflow
}

impl Debug for PlaceOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

/// Places the caller's cart: decrements stock for every active line and
/// stores the total. Either every line is applied or none is.
#[tracing::instrument(
    "Placing order and updating item stock",
    skip(conn)
)]
pub async fn place_order(
    mut conn: DbConnection,
    user_id: Uuid,
    order_id: Uuid
) -> Result<i64, PlaceOrderError> {

    let total = spawn_blocking_with_tracing(move || {
        conn.transaction::<i64, PlaceOrderError, _>(|conn| {
            let order = orders::table
                .find(order_id)
                .filter(orders::is_active.eq(true))
                .select(Order::as_select())
                .for_update()
                .get_result::<Order>(conn)
                .optional()?;

            // Someone else's order is reported exactly like a missing one
            let order = match order {
                Some(order) if order.user_id == user_id => order,
                _ => return Err(PlaceOrderError::NoOrderIdError(order_id))
            };

            if order.is_placed {
                return Err(PlaceOrderError::AlreadyPlaced(order_id))
            }

            // Lock items in a stable order so concurrent placements can't deadlock
            let lines = order_items::table
                .filter(order_items::order_id.eq(order_id))
                .filter(order_items::is_active.eq(true))
                .order(order_items::item_id.asc())
                .select(OrderItemModel::as_select())
                .load::<OrderItemModel>(conn)?;

            if lines.is_empty() {
                return Err(PlaceOrderError::EmptyOrder(order_id))
            }

            let mut priced_lines = Vec::with_capacity(lines.len());

            for line in lines.iter() {
                let item = items::table
                    .find(line.item_id)
                    .filter(items::is_active.eq(true))
                    .select(Item::as_select())
                    .for_update()
                    .get_result::<Item>(conn)
                    .optional()?
                    .ok_or(PlaceOrderError::ItemUnavailable(line.item_id))?;

                if item.available_quantity < line.quantity {
                    return Err(PlaceOrderError::InsufficientStock{
                        item_id: item.item_id,
                        requested: line.quantity,
                        available: item.available_quantity
                    })
                }

                diesel::update(items::table.find(item.item_id))
                    .set((
                        items::available_quantity.eq(items::available_quantity - line.quantity),
                        items::updated_ts.eq(Utc::now())
                    ))
                    .execute(conn)?;

                priced_lines.push((line.quantity, item.unit_price));
            }

            let total = order_total(priced_lines).ok_or(PlaceOrderError::TotalOverflow)?;

            diesel::update(orders::table.find(order_id))
                .set((
                    orders::total_amount.eq(total),
                    orders::is_placed.eq(true),
                    orders::updated_ts.eq(Utc::now())
                ))
                .execute(conn)?;

            Ok(total)
        })
    })
    .await??;

    Ok(total)
}

// Struct to represent a line within CustomerOrder
#[derive(Serialize, Deserialize, Debug)]
pub struct OrderLineView{
    pub item_id: Uuid,
    pub quantity: i32
}

// Struct to represent a placed order (with associated lines)
#[derive(Serialize, Deserialize, Debug)]
pub struct CustomerOrder{
    pub order_id: Uuid,
    pub total_amount: i64,
    pub items: Vec<OrderLineView>
}

#[tracing::instrument(
    "Getting placed orders of customer",
    skip(conn)
)]
pub async fn get_placed_orders_for_customer(
    mut conn: DbConnection,
    customer_id: Uuid
) -> Result<Vec<CustomerOrder>, anyhow::Error> {

    spawn_blocking_with_tracing(move || -> Result<Vec<CustomerOrder>, anyhow::Error> {
        let placed = orders::table
            .filter(orders::user_id.eq(customer_id))
            .filter(orders::is_active.eq(true))
            .filter(orders::is_placed.eq(true))
            .order(orders::created_ts.asc())
            .select(Order::as_select())
            .load::<Order>(&mut conn)
            .context("Failed to load placed orders")?;

        let order_ids: Vec<Uuid> = placed.iter().map(|order| order.order_id).collect();

        let lines = order_items::table
            .filter(order_items::order_id.eq_any(order_ids))
            .filter(order_items::is_active.eq(true))
            .select(OrderItemModel::as_select())
            .load::<OrderItemModel>(&mut conn)
            .context("Failed to load order items")?;

        let mut grouped: HashMap<Uuid, Vec<OrderLineView>> = HashMap::new();
        for line in lines {
            grouped.entry(line.order_id).or_default().push(OrderLineView{
                item_id: line.item_id,
                quantity: line.quantity
            });
        }

        Ok(placed
            .into_iter()
            .map(|order| CustomerOrder{
                items: grouped.remove(&order.order_id).unwrap_or_default(),
                order_id: order.order_id,
                total_amount: order.total_amount
            })
            .collect())
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting every order",
    skip_all
)]
pub async fn get_all_orders(
    mut conn: DbConnection
) -> Result<Vec<Order>, anyhow::Error> {
    let res = spawn_blocking_with_tracing(move || {
        orders::table
            .order(orders::created_ts.asc())
            .select(Order::as_select())
            .load::<Order>(&mut conn)
            .context("Failed to load orders")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}
