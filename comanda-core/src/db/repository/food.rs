//! Food Repository

use super::RepoResult;
use shared::models::{Food, FoodCreate};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct FoodRow {
    id: i64,
    restaurant_id: String,
    name: String,
    price: i64,
}

impl From<FoodRow> for Food {
    fn from(row: FoodRow) -> Self {
        Food {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            price: row.price,
        }
    }
}

/// Resolve foods by id within one restaurant scope.
///
/// Ids missing from the result either do not exist or belong to another
/// restaurant — the caller treats both the same way (foreign line item).
pub async fn find_by_ids_and_restaurant(
    pool: &SqlitePool,
    ids: &[i64],
    restaurant_id: &str,
) -> RepoResult<Vec<Food>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = std::iter::repeat("?")
        .take(ids.len())
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT id, restaurant_id, name, price FROM food
         WHERE restaurant_id = ? AND id IN ({placeholders})"
    );
    let mut query = sqlx::query_as::<_, FoodRow>(&sql).bind(restaurant_id);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(Food::from).collect())
}

/// Insert a food record (seeding/provisioning; menu CRUD is out of scope).
pub async fn insert(pool: &SqlitePool, data: FoodCreate) -> RepoResult<Food> {
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO food (id, restaurant_id, name, price) VALUES (?1, ?2, ?3, ?4)")
        .bind(id)
        .bind(&data.restaurant_id)
        .bind(&data.name)
        .bind(data.price)
        .execute(pool)
        .await?;
    Ok(Food {
        id,
        restaurant_id: data.restaurant_id,
        name: data.name,
        price: data.price,
    })
}
