use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use clientele_core::customers::{CustomerGateway, GatewayError};
use clientele_core::domain::customer::{Customer, CustomerId};

use super::RepositoryError;
use crate::DbPool;

const CUSTOMER_COLUMNS: &str = "id, name, email, address";

#[derive(Clone)]
pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Row count, used by readiness probes to confirm the table is migrated.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customer")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, customer: Customer) -> Result<Customer, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO customer (name, email, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Customer { id: Some(CustomerId(result.last_insert_rowid())), ..customer })
    }

    async fn upsert(&self, id: CustomerId, customer: Customer) -> Result<Customer, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO customer (id, name, email, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 email = excluded.email,
                 address = excluded.address,
                 updated_at = excluded.updated_at",
        )
        .bind(id.0)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let email: String =
        row.try_get("email").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let address: String =
        row.try_get("address").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Customer::with_id(CustomerId(id), name, email, address))
}

fn is_unique_violation(error: &RepositoryError) -> bool {
    match error {
        RepositoryError::Database(sqlx::Error::Database(db_error)) => db_error.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl CustomerGateway for SqlCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, GatewayError> {
        let rows = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(rows.iter().map(row_to_customer).collect::<Result<Vec<_>, _>>()?)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, GatewayError> {
        let row = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        match row {
            Some(ref r) => Ok(Some(row_to_customer(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, GatewayError> {
        // `email` is declared COLLATE NOCASE, so this comparison ignores ASCII case.
        let row = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        match row {
            Some(ref r) => Ok(Some(row_to_customer(r)?)),
            None => Ok(None),
        }
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, GatewayError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customer WHERE id = ?)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(exists != 0)
    }

    async fn save(&self, customer: Customer) -> Result<Customer, GatewayError> {
        let email = customer.email.clone();
        let result = match customer.id {
            None => self.insert(customer).await,
            Some(id) => self.upsert(id, customer).await,
        };

        result.map_err(|error| {
            if is_unique_violation(&error) {
                GatewayError::DuplicateEmail(email)
            } else {
                GatewayError::from(error)
            }
        })
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM customer WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn delete_all(&self) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM customer")
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(())
    }
}
