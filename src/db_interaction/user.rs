use std::{collections::HashMap, error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::{user_level::UserLevel, username::Username}, models::{Item, User}, password::{compute_password_hash, PasswordError}, schema::{items, users}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting user by username",
    skip(conn)
)]
pub async fn get_user_by_username(
    mut conn: DbConnection,
    username: Username
) -> Result<Option<User>, anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::username.eq(username.as_ref()))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
            .context("Failed to query user by username")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting user by id",
    skip(conn)
)]
pub async fn get_user_by_id(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Option<User>, anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
            .context("Failed to query user by id")
    })
    .await
    .context("Failed due to threadpool error")?
}

// Error associated with inserting user to users table
#[derive(Error)]
pub enum UserInsertError{
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    #[error("Failed to hash password")]
    HashError(#[from] PasswordError),
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to insert into users table")]
    InsertError(#[source] diesel::result::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip(conn, password)
)]
pub async fn insert_user_into_database(
    mut conn: DbConnection,
    name: String,
    username: Username,
    password: SecretString,
    level: UserLevel
) -> Result<Uuid, UserInsertError> {

    let password_hash = compute_password_hash(password).await?;

    let now = Utc::now();
    let user = User{
        user_id: Uuid::new_v4(),
        name,
        username: username.inner(),
        password_hash: password_hash.expose_secret().to_string(),
        level: level.as_i16(),
        created_ts: now,
        updated_ts: now
    };
    let user_id = user.user_id;

    spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&user)
            .execute(&mut conn)
            .map_err(|e| {
                match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _
                    ) => UserInsertError::UsernameTaken(user.username.clone()),

                    _ => UserInsertError::InsertError(e)
                }
            })
    })
    .await??;

    Ok(user_id)
}

/// Sets the user's level to vendor. Returns `false` when no user has this id.
#[tracing::instrument(
    "Promoting user to vendor",
    skip(conn)
)]
pub async fn promote_user_to_vendor(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<bool, anyhow::Error> {
    let affected_rows = spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set((
                users::level.eq(UserLevel::Vendor.as_i16()),
                users::updated_ts.eq(Utc::now())
            ))
            .execute(&mut conn)
            .context("Failed to update user level")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(affected_rows > 0)
}

// Item summary nested under a vendor
#[derive(Serialize, Debug)]
pub struct VendorItem{
    pub item_id: Uuid,
    pub item_name: String,
    pub restaurant_name: String,
    pub available_quantity: i32
}

#[derive(Serialize, Debug)]
pub struct VendorWithItems{
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub items: Vec<VendorItem>
}

#[tracing::instrument(
    "Getting vendors along with their items",
    skip_all
)]
pub async fn get_vendors_with_items(
    mut conn: DbConnection
) -> Result<Vec<VendorWithItems>, anyhow::Error> {
    spawn_blocking_with_tracing(move || -> Result<Vec<VendorWithItems>, anyhow::Error> {
        let vendors = users::table
            .filter(users::level.eq(UserLevel::Vendor.as_i16()))
            .order(users::created_ts.asc())
            .select(User::as_select())
            .load::<User>(&mut conn)
            .context("Failed to load vendors")?;

        let vendor_ids: Vec<Uuid> = vendors.iter().map(|v| v.user_id).collect();

        let vendor_items = items::table
            .filter(items::vendor_id.eq_any(vendor_ids))
            .order(items::created_ts.asc())
            .select(Item::as_select())
            .load::<Item>(&mut conn)
            .context("Failed to load vendor items")?;

        let mut grouped: HashMap<Uuid, Vec<VendorItem>> = HashMap::new();
        for item in vendor_items {
            grouped.entry(item.vendor_id).or_default().push(VendorItem{
                item_id: item.item_id,
                item_name: item.item_name,
                restaurant_name: item.restaurant_name,
                available_quantity: item.available_quantity
            });
        }

        Ok(vendors
            .into_iter()
            .map(|vendor| VendorWithItems{
                items: grouped.remove(&vendor.user_id).unwrap_or_default(),
                user_id: vendor.user_id,
                username: vendor.username,
                name: vendor.name
            })
            .collect())
    })
    .await
    .context("Failed due to threadpool error")?
}
