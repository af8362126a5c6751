use async_trait::async_trait;
use chrono::NaiveDate;
use climb_core::model::{ClimbSession, SessionId, UserId};
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

use super::SqliteRepository;
use super::mapping::{
    conn, duration_to_i64, exercises_to_json, map_session_row, routes_to_json,
    session_id_from_i64, session_id_to_i64,
};
use crate::repository::{NewSessionRecord, SessionRepository, StorageError};

const SELECT_COLUMNS: &str = r"
    SELECT id, user_id, date, location, duration_minutes, exercises, routes
    FROM climb_sessions
";

const INSERT_SESSION: &str = r"
    INSERT INTO climb_sessions (
        user_id, date, location, duration_minutes, exercises, routes
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

fn insert_query(
    record: &NewSessionRecord,
) -> Result<Query<'_, Sqlite, SqliteArguments<'_>>, StorageError> {
    let details = &record.details;
    Ok(sqlx::query(INSERT_SESSION)
        .bind(record.user_id.to_string())
        .bind(details.date())
        .bind(details.location())
        .bind(duration_to_i64(details.duration()))
        .bind(exercises_to_json(details.exercises())?)
        .bind(routes_to_json(details.routes())?))
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn list_sessions(
        &self,
        user_id: UserId,
        from: Option<NaiveDate>,
    ) -> Result<Vec<ClimbSession>, StorageError> {
        let mut sql = String::from(SELECT_COLUMNS);
        sql.push_str(" WHERE user_id = ?1");
        if from.is_some() {
            sql.push_str(" AND date >= ?2");
        }
        sql.push_str(" ORDER BY date DESC, id DESC");

        let mut query = sqlx::query(&sql).bind(user_id.to_string());
        if let Some(from) = from {
            query = query.bind(from);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::warn!(%user_id, error = %e, "listing sessions failed");
            conn(e)
        })?;
        tracing::debug!(%user_id, rows = rows.len(), "listed sessions");

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_session_row(&row)?);
        }
        Ok(out)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<ClimbSession>, StorageError> {
        let mut sql = String::from(SELECT_COLUMNS);
        sql.push_str(" WHERE id = ?1");

        let row = sqlx::query(&sql)
            .bind(session_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn insert_session(&self, record: NewSessionRecord) -> Result<SessionId, StorageError> {
        let res = insert_query(&record)?
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        session_id_from_i64(res.last_insert_rowid())
    }

    async fn insert_sessions(
        &self,
        records: Vec<NewSessionRecord>,
    ) -> Result<Vec<SessionId>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let mut ids = Vec::with_capacity(records.len());
        for record in &records {
            let res = insert_query(record)?
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::warn!(inserted = ids.len(), error = %e, "batch insert rolled back");
                    conn(e)
                })?;
            ids.push(session_id_from_i64(res.last_insert_rowid())?);
        }
        tx.commit().await.map_err(conn)?;
        tracing::debug!(rows = ids.len(), "batch inserted sessions");
        Ok(ids)
    }

    async fn update_session(&self, session: &ClimbSession) -> Result<(), StorageError> {
        let details = session.details();
        let res = sqlx::query(
            r"
                UPDATE climb_sessions
                SET date = ?2,
                    location = ?3,
                    duration_minutes = ?4,
                    exercises = ?5,
                    routes = ?6
                WHERE id = ?1
            ",
        )
        .bind(session_id_to_i64(session.id())?)
        .bind(details.date())
        .bind(details.location())
        .bind(duration_to_i64(details.duration()))
        .bind(exercises_to_json(details.exercises())?)
        .bind(routes_to_json(details.routes())?)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM climb_sessions WHERE id = ?1")
            .bind(session_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
