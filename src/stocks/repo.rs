use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::stocks::forms::NewStock;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stock {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stock_symbol: String,
    pub number_of_shares: i32,
    pub purchase_price: i32, // integer cents
    pub created_at: OffsetDateTime,
}

pub async fn insert(db: &PgPool, user_id: Uuid, stock: &NewStock) -> Result<Stock, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        r#"
        INSERT INTO stocks (user_id, stock_symbol, number_of_shares, purchase_price)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, stock_symbol, number_of_shares, purchase_price, created_at
        "#,
    )
    .bind(user_id)
    .bind(&stock.stock_symbol)
    .bind(stock.number_of_shares)
    .bind(stock.purchase_price)
    .fetch_one(db)
    .await
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Stock>, sqlx::Error> {
    sqlx::query_as::<_, Stock>(
        r#"
        SELECT id, user_id, stock_symbol, number_of_shares, purchase_price, created_at
        FROM stocks
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
