use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;

use crate::{models::Item, schema::items, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting all items from db",
    skip_all
)]
pub async fn get_all_items(
    mut conn: DbConnection
) -> Result<Vec<Item>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        items::table
            .order(items::created_ts.asc())
            .select(Item::as_select())
            .load::<Item>(&mut conn)
            .context("Failed to get items")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum ItemInsertError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to insert into items table")]
    InsertError(#[from] diesel::result::Error)
}

impl Debug for ItemInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Insert an item to db",
    skip_all,
    fields(item_id = %item.item_id, vendor_id = %item.vendor_id)
)]
pub async fn insert_item(
    mut conn: DbConnection,
    item: Item
) -> Result<(), ItemInsertError> {

    spawn_blocking_with_tracing(move || {
        diesel::insert_into(items::table)
            .values(item)
            .execute(&mut conn)
    })
    .await??;

    Ok(())
}
