use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::user_level::{InvalidUserLevel, UserLevel};
use crate::schema::{items, order_items, orders, users};

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User{
    pub user_id: Uuid,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub level: i16,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>
}

impl User {
    pub fn user_level(&self) -> Result<UserLevel, InvalidUserLevel>{
        UserLevel::try_from(self.level)
    }
}

#[derive(Queryable, Selectable, Insertable, Serialize, Debug, Clone)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Item{
    pub item_id: Uuid,
    pub vendor_id: Uuid,
    pub item_name: String,
    pub calories_per_gm: i32,
    pub available_quantity: i32,
    pub restaurant_name: String,
    pub unit_price: i32,
    pub is_active: bool,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>
}

#[derive(Queryable, Selectable, Insertable, Serialize, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order{
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub total_amount: i64,
    pub is_placed: bool,
    pub is_active: bool,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>
}

// Row of order_items, named apart from the json OrderLine views
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemModel{
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub is_active: bool
}
