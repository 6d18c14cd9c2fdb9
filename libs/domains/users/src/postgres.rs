use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, SqlErr, Statement,
    Value,
};

use crate::columns::{PatchSet, PatchValue, USER_TABLE, key_column};
use crate::error::UserResult;
use crate::models::{User, UserPatch, WriteOutcome};
use crate::repository::UserRepository;

const LIST_SQL: &str = "SELECT id, username, email, phone, date_of_birth FROM users";
const LOAD_SQL: &str = "SELECT id, username, email, phone, date_of_birth FROM users WHERE id = $1";
const CREATE_SQL: &str =
    "INSERT INTO users (id, username, email, phone, date_of_birth) VALUES ($1, $2, $3, $4, $5)";
const UPDATE_SQL: &str =
    "UPDATE users SET username = $1, email = $2, phone = $3, date_of_birth = $4 WHERE id = $5";
const DELETE_SQL: &str = "DELETE FROM users WHERE id = $1";

/// PostgreSQL implementation of UserRepository, one raw statement per operation
#[derive(Clone)]
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    phone: String,
    date_of_birth: Option<NaiveDate>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            phone: row.phone,
            date_of_birth: row.date_of_birth,
        }
    }
}

impl From<PatchValue> for Value {
    fn from(value: PatchValue) -> Self {
        match value {
            PatchValue::Text(text) => text.into(),
            PatchValue::Date(date) => date.into(),
        }
    }
}

/// `UPDATE users SET a = $1, b = $2 WHERE id = $3`, assignments in table order.
pub(crate) fn patch_statement(set: PatchSet) -> Statement {
    let assignments = set
        .column_names()
        .enumerate()
        .map(|(i, name)| format!("{} = ${}", name, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        USER_TABLE,
        assignments,
        key_column().name,
        set.assignments.len() + 1
    );

    let mut values: Vec<Value> = set
        .assignments
        .into_iter()
        .map(|(_, value)| value.into())
        .collect();
    values.push(set.key.into());

    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

/// Primary-key collisions surface as a typed SQL error from sqlx; other
/// drivers (and the mock connection) only carry the server message.
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("duplicate key")
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let stmt = Statement::from_string(DbBackend::Postgres, LIST_SQL);

        let rows = UserRow::find_by_statement(stmt).all(&self.db).await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn load(&self, id: &str) -> UserResult<Option<User>> {
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, LOAD_SQL, [id.into()]);

        let row = UserRow::find_by_statement(stmt).one(&self.db).await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, user: User) -> UserResult<WriteOutcome> {
        let id = user.id.clone();
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            CREATE_SQL,
            [
                user.id.into(),
                user.username.into(),
                user.email.into(),
                user.phone.into(),
                user.date_of_birth.into(),
            ],
        );

        match self.db.execute_raw(stmt).await {
            Ok(result) => {
                tracing::info!(user_id = %id, "Created user");
                Ok(WriteOutcome::from_rows_affected(result.rows_affected()))
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(user_id = %id, "Insert hit an existing primary key");
                Ok(WriteOutcome::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, user: User) -> UserResult<WriteOutcome> {
        let id = user.id.clone();
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPDATE_SQL,
            [
                user.username.into(),
                user.email.into(),
                user.phone.into(),
                user.date_of_birth.into(),
                user.id.into(),
            ],
        );

        let result = self.db.execute_raw(stmt).await?;
        let outcome = WriteOutcome::from_rows_affected(result.rows_affected());
        if let WriteOutcome::Applied(_) = outcome {
            tracing::info!(user_id = %id, "Updated user");
        }
        Ok(outcome)
    }

    async fn patch(&self, fields: UserPatch) -> UserResult<WriteOutcome> {
        let set = PatchSet::from_fields(&fields)?;
        let id = set.key.clone();

        let result = self.db.execute_raw(patch_statement(set)).await?;
        let outcome = WriteOutcome::from_rows_affected(result.rows_affected());
        if let WriteOutcome::Applied(_) = outcome {
            tracing::info!(user_id = %id, "Patched user");
        }
        Ok(outcome)
    }

    async fn delete(&self, id: &str) -> UserResult<WriteOutcome> {
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, DELETE_SQL, [id.into()]);

        let result = self.db.execute_raw(stmt).await?;
        let outcome = WriteOutcome::from_rows_affected(result.rows_affected());
        if let WriteOutcome::Applied(_) = outcome {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UserError;
    use sea_orm::{MockDatabase, MockExecResult, Transaction};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn ann() -> User {
        User {
            id: "u1".to_string(),
            username: "ann".to_string(),
            email: "ann@x.com".to_string(),
            phone: "555".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
        }
    }

    fn row(user: &User) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", user.id.clone().into()),
            ("username", user.username.clone().into()),
            ("email", user.email.clone().into()),
            ("phone", user.phone.clone().into()),
            ("date_of_birth", user.date_of_birth.into()),
        ])
    }

    fn rows_affected(n: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: n,
        }
    }

    fn fields(value: serde_json::Value) -> UserPatch {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_list_maps_rows() {
        let bob = User {
            id: "u2".into(),
            username: "bob".into(),
            date_of_birth: None,
            ..ann()
        };
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![row(&ann()), row(&bob)]])
            .into_connection();

        let users = PostgresUserRepository::new(db).list().await.unwrap();
        assert_eq!(users, vec![ann(), bob]);
    }

    #[tokio::test]
    async fn test_load_binds_id_and_handles_missing_row() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![row(&ann())], vec![]])
            .into_connection();
        let repo = PostgresUserRepository::new(db.clone());

        assert_eq!(repo.load("u1").await.unwrap(), Some(ann()));
        assert_eq!(repo.load("nope").await.unwrap(), None);

        let log = db.into_transaction_log();
        assert_eq!(
            log[0],
            Transaction::from_sql_and_values(DbBackend::Postgres, LOAD_SQL, ["u1".into()])
        );
    }

    #[tokio::test]
    async fn test_create_inserts_all_columns() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_results([rows_affected(1)])
            .into_connection();
        let repo = PostgresUserRepository::new(db.clone());

        assert_eq!(repo.create(ann()).await.unwrap(), WriteOutcome::Applied(1));

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DbBackend::Postgres,
                CREATE_SQL,
                [
                    "u1".into(),
                    "ann".into(),
                    "ann@x.com".into(),
                    "555".into(),
                    NaiveDate::from_ymd_opt(1990, 1, 1).into(),
                ]
            )]
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_key_is_conflict() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"users_pkey\"".to_string(),
            )])
            .into_connection();

        let outcome = PostgresUserRepository::new(db).create(ann()).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Conflict);
    }

    #[tokio::test]
    async fn test_create_other_errors_are_store_errors() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_errors([DbErr::Custom("connection reset by peer".to_string())])
            .into_connection();

        let err = PostgresUserRepository::new(db).create(ann()).await.unwrap_err();
        assert!(matches!(err, UserError::Store(_)));
    }

    #[tokio::test]
    async fn test_update_outcomes() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_results([rows_affected(1), rows_affected(0)])
            .into_connection();
        let repo = PostgresUserRepository::new(db.clone());

        assert_eq!(repo.update(ann()).await.unwrap(), WriteOutcome::Applied(1));
        assert_eq!(repo.update(ann()).await.unwrap(), WriteOutcome::NotFound);

        let log = db.into_transaction_log();
        assert_eq!(
            log[0],
            Transaction::from_sql_and_values(
                DbBackend::Postgres,
                UPDATE_SQL,
                [
                    "ann".into(),
                    "ann@x.com".into(),
                    "555".into(),
                    NaiveDate::from_ymd_opt(1990, 1, 1).into(),
                    "u1".into(),
                ]
            )
        );
    }

    #[tokio::test]
    async fn test_patch_updates_only_supplied_columns() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_results([rows_affected(1)])
            .into_connection();
        let repo = PostgresUserRepository::new(db.clone());

        let outcome = repo
            .patch(fields(json!({"id": "u1", "email": "ann2@x.com", "extra": true})))
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Applied(1));

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DbBackend::Postgres,
                "UPDATE users SET email = $1 WHERE id = $2",
                ["ann2@x.com".into(), "u1".into()]
            )]
        );
    }

    #[tokio::test]
    async fn test_patch_invalid_body_never_reaches_database() {
        let db = MockDatabase::new(DbBackend::Postgres).into_connection();
        let repo = PostgresUserRepository::new(db.clone());

        let err = repo.patch(fields(json!({"id": "u1"}))).await.unwrap_err();
        assert!(matches!(err, UserError::Validation(_)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_delete_outcomes() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_results([rows_affected(1), rows_affected(0)])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        assert_eq!(repo.delete("u1").await.unwrap(), WriteOutcome::Applied(1));
        assert_eq!(repo.delete("u1").await.unwrap(), WriteOutcome::NotFound);
    }

    #[test]
    fn test_patch_statement_numbers_placeholders_in_table_order() {
        let set = PatchSet::from_fields(&fields(json!({
            "id": "u1",
            "dateOfBirth": "2001-09-11",
            "username": "ann"
        })))
        .unwrap();

        let stmt = patch_statement(set);
        assert_eq!(
            stmt.sql,
            "UPDATE users SET username = $1, date_of_birth = $2 WHERE id = $3"
        );
    }
}
