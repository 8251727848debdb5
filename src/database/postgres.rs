use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, info};

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{City, PointOfInterest};
use super::seed;
use super::store::{CityInfoStore, CityQuery, PendingChange};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description VARCHAR(200)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS points_of_interest (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description VARCHAR(200),
        city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS points_of_interest_city_id_idx ON points_of_interest (city_id)",
];

/// `CityInfoStore` backed by PostgreSQL. Each commit runs in its own transaction.
#[derive(Clone)]
pub struct PgCityInfoStore {
    pool: PgPool,
}

impl PgCityInfoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables if needed and loads the demo cities into an empty database
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cities")
            .fetch_one(&mut *tx)
            .await?;

        if existing == 0 {
            for city in seed::cities() {
                sqlx::query("INSERT INTO cities (id, name, description) VALUES ($1, $2, $3)")
                    .bind(city.id)
                    .bind(&city.name)
                    .bind(&city.description)
                    .execute(&mut *tx)
                    .await?;

                for point in &city.points_of_interest {
                    sqlx::query(
                        "INSERT INTO points_of_interest (id, name, description, city_id) VALUES ($1, $2, $3, $4)",
                    )
                    .bind(point.id)
                    .bind(&point.name)
                    .bind(&point.description)
                    .bind(point.city_id)
                    .execute(&mut *tx)
                    .await?;
                }
            }

            // Explicit ids do not advance the serial sequences
            for table in ["cities", "points_of_interest"] {
                let sql = format!(
                    "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
                );
                sqlx::query(&sql).execute(&mut *tx).await?;
            }

            info!("Seeded demo cities");
        }

        tx.commit().await?;
        Ok(())
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &CityQuery) {
        builder.push(" WHERE TRUE");
        if let Some(name) = &query.name {
            builder.push(" AND LOWER(name) = LOWER(").push_bind(name.clone()).push(")");
        }
        if let Some(search) = &query.search_query {
            builder
                .push(" AND (STRPOS(name, ")
                .push_bind(search.clone())
                .push(") > 0 OR STRPOS(COALESCE(description, ''), ")
                .push_bind(search.clone())
                .push(") > 0)");
        }
    }

    async fn next_id(&self, table: &str) -> Result<i32, DatabaseError> {
        let sql = format!("SELECT nextval(pg_get_serial_sequence('{table}', 'id'))");
        let id: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        i32::try_from(id).map_err(|_| DatabaseError::Constraint(format!("{table} id sequence exhausted")))
    }
}

#[async_trait]
impl CityInfoStore for PgCityInfoStore {
    async fn all_cities(&self) -> Result<Vec<City>, DatabaseError> {
        let cities = sqlx::query_as::<_, City>(
            r#"SELECT id, name, description FROM cities ORDER BY name COLLATE "C", id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(cities)
    }

    async fn list_cities(&self, query: &CityQuery) -> Result<(Vec<City>, i64), DatabaseError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS count FROM cities");
        Self::push_filters(&mut count, query);
        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get("count")?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT id, name, description FROM cities");
        Self::push_filters(&mut select, query);
        select
            .push(r#" ORDER BY name COLLATE "C", id LIMIT "#)
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let cities = select.build_query_as::<City>().fetch_all(&self.pool).await?;
        debug!(total, returned = cities.len(), "Listed cities");
        Ok((cities, total))
    }

    async fn find_city(&self, city_id: i32, include_points_of_interest: bool) -> Result<Option<City>, DatabaseError> {
        let city = sqlx::query_as::<_, City>("SELECT id, name, description FROM cities WHERE id = $1")
            .bind(city_id)
            .fetch_optional(&self.pool)
            .await?;

        match city {
            Some(mut city) if include_points_of_interest => {
                city.points_of_interest = self.points_of_interest_for_city(city_id).await?;
                Ok(Some(city))
            }
            other => Ok(other),
        }
    }

    async fn city_exists(&self, city_id: i32) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cities WHERE id = $1)")
            .bind(city_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn points_of_interest_for_city(&self, city_id: i32) -> Result<Vec<PointOfInterest>, DatabaseError> {
        let points = sqlx::query_as::<_, PointOfInterest>(
            "SELECT id, name, description, city_id FROM points_of_interest WHERE city_id = $1 ORDER BY id",
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(points)
    }

    async fn find_point_of_interest(
        &self,
        city_id: i32,
        point_of_interest_id: i32,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        let point = sqlx::query_as::<_, PointOfInterest>(
            "SELECT id, name, description, city_id FROM points_of_interest WHERE city_id = $1 AND id = $2",
        )
        .bind(city_id)
        .bind(point_of_interest_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(point)
    }

    async fn next_city_id(&self) -> Result<i32, DatabaseError> {
        self.next_id("cities").await
    }

    async fn next_point_of_interest_id(&self) -> Result<i32, DatabaseError> {
        self.next_id("points_of_interest").await
    }

    async fn commit(&self, changes: Vec<PendingChange>) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for change in changes {
            let rows = match &change {
                PendingChange::InsertCity(city) => {
                    sqlx::query("INSERT INTO cities (id, name, description) VALUES ($1, $2, $3)")
                        .bind(city.id)
                        .bind(&city.name)
                        .bind(&city.description)
                        .execute(&mut *tx)
                        .await
                        .map_err(constraint_or_sqlx)?
                        .rows_affected()
                }
                PendingChange::DeleteCity { city_id } => {
                    let points = sqlx::query("DELETE FROM points_of_interest WHERE city_id = $1")
                        .bind(city_id)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                    let cities = sqlx::query("DELETE FROM cities WHERE id = $1")
                        .bind(city_id)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected();
                    if cities == 0 {
                        return Err(DatabaseError::NotFound(format!("city {}", city_id)));
                    }
                    cities + points
                }
                PendingChange::InsertPointOfInterest(point) => {
                    sqlx::query(
                        "INSERT INTO points_of_interest (id, name, description, city_id) VALUES ($1, $2, $3, $4)",
                    )
                    .bind(point.id)
                    .bind(&point.name)
                    .bind(&point.description)
                    .bind(point.city_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(constraint_or_sqlx)?
                    .rows_affected()
                }
                PendingChange::UpdatePointOfInterest(point) => {
                    sqlx::query(
                        "UPDATE points_of_interest SET name = $1, description = $2 WHERE id = $3 AND city_id = $4",
                    )
                    .bind(&point.name)
                    .bind(&point.description)
                    .bind(point.id)
                    .bind(point.city_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
                }
                PendingChange::DeletePointOfInterest { city_id, point_of_interest_id } => {
                    sqlx::query("DELETE FROM points_of_interest WHERE id = $1 AND city_id = $2")
                        .bind(point_of_interest_id)
                        .bind(city_id)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected()
                }
            };

            // Dropping `tx` on the early return rolls everything back
            if rows == 0 {
                return Err(match change {
                    PendingChange::UpdatePointOfInterest(p) => {
                        DatabaseError::NotFound(format!("point of interest {} in city {}", p.id, p.city_id))
                    }
                    PendingChange::DeletePointOfInterest { city_id, point_of_interest_id } => DatabaseError::NotFound(
                        format!("point of interest {} in city {}", point_of_interest_id, city_id),
                    ),
                    other => DatabaseError::Constraint(format!("no rows written for {:?}", other)),
                });
            }
            affected += rows;
        }

        tx.commit().await?;
        Ok(affected)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

/// Maps unique and foreign-key violations onto `DatabaseError::Constraint`
fn constraint_or_sqlx(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() || db.is_foreign_key_violation() {
            return DatabaseError::Constraint(db.message().to_string());
        }
    }
    DatabaseError::Sqlx(err)
}
