//! Postgres-backed room store.
//!
//! Query plans are rendered with `sqlx::QueryBuilder`; every filter value is
//! a bound parameter.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::RoomStore;
use crate::{
    error::AppResult,
    models::{
        query::{Predicate, QueryPlan, SortKey},
        room::{Building, Feature, Room, RoomFeatureRow},
    },
};

const ROOM_COLUMNS: &str = "r.id, r.name, r.number, r.floor, r.capacity, r.room_type, \
     r.accessible, r.building_id, r.description, r.created_at, r.updated_at";

/// Escape LIKE wildcards and wrap the term for a substring match
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_predicate(qb: &mut QueryBuilder<'static, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::BuildingIs(id) => {
            qb.push("r.building_id = ").push_bind(id.clone());
        }
        Predicate::RoomTypeIs(kind) => {
            qb.push("r.room_type = ").push_bind(kind.as_code());
        }
        Predicate::Never => {
            qb.push("FALSE");
        }
        Predicate::CapacityAtLeast(min) => {
            qb.push("r.capacity >= ").push_bind(*min);
        }
        Predicate::CapacityAtMost(max) => {
            qb.push("r.capacity <= ").push_bind(*max);
        }
        Predicate::FloorIs(floor) => {
            qb.push("r.floor = ").push_bind(*floor);
        }
        Predicate::AccessibleOnly => {
            qb.push("r.accessible = TRUE");
        }
        Predicate::NameContains(term) => {
            qb.push("r.name ILIKE ").push_bind(like_pattern(term));
        }
        Predicate::NumberContains(term) => {
            qb.push("r.number ILIKE ").push_bind(like_pattern(term));
        }
        Predicate::AnyOf(inner) => {
            if inner.is_empty() {
                qb.push("FALSE");
                return;
            }
            qb.push("(");
            for (i, p) in inner.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_predicate(qb, p);
            }
            qb.push(")");
        }
        Predicate::HasAllFeatures(ids) => {
            // one row per (room, feature) pair, so a room qualifies only when
            // it matched every requested id
            qb.push(
                "r.id IN (SELECT rf.room_id FROM room_features rf WHERE rf.feature_id = ANY(",
            )
            .push_bind(ids.clone())
            .push(") GROUP BY rf.room_id HAVING COUNT(DISTINCT rf.feature_id) = ")
            .push_bind(ids.len() as i64)
            .push(")");
        }
    }
}

/// Render a plan to a room SELECT
pub fn build_search_query(plan: &QueryPlan) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM rooms r JOIN buildings b ON b.id = r.building_id",
        ROOM_COLUMNS
    ));

    for (i, predicate) in plan.predicates.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(&mut qb, predicate);
    }

    let mut order: Vec<&str> = plan
        .order
        .iter()
        .map(|key| match key {
            SortKey::BuildingName => "b.name",
            SortKey::RoomNumber => "r.number",
        })
        .collect();
    order.push("r.id");
    qb.push(" ORDER BY ").push(order.join(", "));

    qb
}

#[derive(Clone)]
pub struct PgRoomStore {
    pool: Pool<Postgres>,
}

impl PgRoomStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn find_rooms(&self, plan: &QueryPlan) -> AppResult<Vec<Room>> {
        let mut qb = build_search_query(plan);
        tracing::debug!("Room search SQL: {}", qb.sql());

        let rooms = qb.build_query_as::<Room>().fetch_all(&self.pool).await?;
        Ok(rooms)
    }

    async fn buildings_by_ids(&self, ids: &[String]) -> AppResult<Vec<Building>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, Building>(
            "SELECT id, name, abbreviation FROM buildings WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn features_for_rooms(&self, room_ids: &[String]) -> AppResult<Vec<RoomFeatureRow>> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RoomFeatureRow>(
            r#"
            SELECT rf.room_id, f.id, f.name, f.category
            FROM room_features rf
            JOIN features f ON f.id = rf.feature_id
            WHERE rf.room_id = ANY($1)
            ORDER BY f.category, f.name, f.id
            "#,
        )
        .bind(room_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_buildings(&self) -> AppResult<Vec<Building>> {
        let rows = sqlx::query_as::<_, Building>(
            "SELECT id, name, abbreviation FROM buildings ORDER BY name, abbreviation",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_features(&self) -> AppResult<Vec<Feature>> {
        let rows = sqlx::query_as::<_, Feature>(
            "SELECT id, name, category FROM features ORDER BY category, name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
