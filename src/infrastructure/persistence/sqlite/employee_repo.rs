//! SQLite Employee Repository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sqlx::FromRow;

use super::employee_input::{parse_input, WriteOp};
use super::DbPool;
use crate::application::ports::{EmployeeRepositoryPort, RepositoryError};
use crate::domain::{Employee, EmployeeId, Role};

const SELECT_COLUMNS: &str = "SELECT id, name, email, role, created_at, updated_at FROM employees";

/// SQLite Employee Repository
pub struct SqliteEmployeeRepository {
    pool: DbPool,
}

impl SqliteEmployeeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let row: Option<EmployeeRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Employee::try_from).transpose()
    }

    async fn fetch_existing(&self, id: EmployeeId) -> Result<Employee, RepositoryError> {
        self.fetch(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Employee {}", id)))
    }
}

#[derive(FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    email: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RepositoryError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: row.id,
            name: row.name,
            email: row.email,
            role: Role::from_str(&row.role)
                .ok_or_else(|| RepositoryError::Database(format!("Unknown role: {}", row.role)))?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Database(e.to_string()))
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 存储精度为毫秒，返回值与再次读取的结果保持一致
fn now_millis() -> Result<DateTime<Utc>, RepositoryError> {
    parse_timestamp(&format_timestamp(Utc::now()))
}

#[async_trait]
impl EmployeeRepositoryPort for SqliteEmployeeRepository {
    async fn create(&self, input: Value) -> Result<Employee, RepositoryError> {
        let input = parse_input(WriteOp::Create, input)?;
        let (Some(name), Some(email), Some(role)) = (input.name, input.email, input.role) else {
            return Err(RepositoryError::Validation(
                "Invalid `employee.create()` invocation: missing arguments".to_string(),
            ));
        };
        let now = now_millis()?;

        let result = sqlx::query(
            r#"
            INSERT INTO employees (name, email, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&name)
        .bind(&email)
        .bind(role.as_str())
        .bind(format_timestamp(now))
        .bind(format_timestamp(now))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(employee_id = id, "Employee created");

        Ok(Employee {
            id,
            name,
            email,
            role,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_all(&self) -> Result<Vec<Employee>, RepositoryError> {
        let rows: Vec<EmployeeRow> = sqlx::query_as(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Employee::try_from).collect()
    }

    async fn find_one(&self, id: EmployeeId) -> Result<Employee, RepositoryError> {
        self.fetch_existing(id).await
    }

    async fn update(&self, id: EmployeeId, input: Value) -> Result<Employee, RepositoryError> {
        let input = parse_input(WriteOp::Update, input)?;
        let existing = self.fetch_existing(id).await?;

        let updated = Employee {
            id,
            name: input.name.unwrap_or(existing.name),
            email: input.email.unwrap_or(existing.email),
            role: input.role.unwrap_or(existing.role),
            created_at: existing.created_at,
            updated_at: now_millis()?,
        };

        let result = sqlx::query(
            "UPDATE employees SET name = ?, email = ?, role = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&updated.name)
        .bind(&updated.email)
        .bind(updated.role.as_str())
        .bind(format_timestamp(updated.updated_at))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Employee {}", id)));
        }

        tracing::info!(employee_id = id, "Employee updated");
        Ok(updated)
    }

    async fn remove(&self, id: EmployeeId) -> Result<Employee, RepositoryError> {
        // 单条语句删除并取回，并发删除同一 id 只有一个成功
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            DELETE FROM employees WHERE id = ?
            RETURNING id, name, email, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let removed = row
            .map(Employee::try_from)
            .transpose()?
            .ok_or_else(|| RepositoryError::NotFound(format!("Employee {}", id)))?;

        tracing::info!(employee_id = id, "Employee deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use serde_json::json;

    async fn repo() -> SqliteEmployeeRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteEmployeeRepository::new(pool)
    }

    fn ada() -> Value {
        json!({"name": "Ada", "email": "ada@mail.com", "role": "ENGINEER"})
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let created = repo.create(ada()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.role, Role::Engineer);

        let found = repo.find_one(created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_invalid_input_is_validation_error() {
        let repo = repo().await;
        let result = repo.create(json!({"name": "Ada"})).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_database_error() {
        let repo = repo().await;
        repo.create(ada()).await.unwrap();
        let result = repo
            .create(json!({"name": "Bob", "email": "ada@mail.com", "role": "ADMIN"}))
            .await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let repo = repo().await;
        assert!(matches!(
            repo.find_one(5).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let repo = repo().await;
        let created = repo.create(ada()).await.unwrap();

        let updated = repo
            .update(created.id, json!({"role": "ADMIN"}))
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.created_at, created.created_at);

        let reloaded = repo.find_one(created.id).await.unwrap();
        assert_eq!(reloaded, updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo().await;
        let result = repo.update(3, json!({"name": "Nobody"})).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_returns_deleted_record() {
        let repo = repo().await;
        let created = repo.create(ada()).await.unwrap();

        let removed = repo.remove(created.id).await.unwrap();
        assert_eq!(removed, created);
        assert!(repo.find_all().await.unwrap().is_empty());
        assert!(matches!(
            repo.remove(created.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_removes_succeed_once() {
        let repo = std::sync::Arc::new(repo().await);
        let created = repo.create(ada()).await.unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.remove(created.id).await })
            })
            .collect();

        let mut removed = 0;
        let mut missing = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(employee) => {
                    assert_eq!(employee, created);
                    removed += 1;
                }
                Err(RepositoryError::NotFound(_)) => missing += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
        assert_eq!(removed, 1);
        assert_eq!(missing, 3);
    }
}
