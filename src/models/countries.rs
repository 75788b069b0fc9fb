// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::{Executor, Sqlite};

/// A persisted country row, as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: f64,
    pub flag_url: Option<String>,
    #[serde(serialize_with = "crate::models::serialize_timestamp")]
    pub last_refreshed_at: DateTime<Utc>,
}

/// A fully computed row ready to be written. Every column is replaced on upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: f64,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}

/// Insert a country, or replace every column of the existing row with the same name
pub async fn upsert_country<'e, E>(executor: E, country: &NewCountry) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO countries (
            name, capital, region, population, currency_code,
            exchange_rate, estimated_gdp, flag_url, last_refreshed_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET
            capital = excluded.capital,
            region = excluded.region,
            population = excluded.population,
            currency_code = excluded.currency_code,
            exchange_rate = excluded.exchange_rate,
            estimated_gdp = excluded.estimated_gdp,
            flag_url = excluded.flag_url,
            last_refreshed_at = excluded.last_refreshed_at
        "#,
    )
    .bind(&country.name)
    .bind(&country.capital)
    .bind(&country.region)
    .bind(country.population)
    .bind(&country.currency_code)
    .bind(country.exchange_rate)
    .bind(country.estimated_gdp)
    .bind(&country.flag_url)
    .bind(country.last_refreshed_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Full table scan. No ordering is implied.
pub async fn list_countries(pool: &SqlitePool) -> Result<Vec<Country>> {
    let records = sqlx::query_as::<_, Country>(
        r#"
        SELECT id, name, capital, region, population, currency_code,
               exchange_rate, estimated_gdp, flag_url, last_refreshed_at
        FROM countries
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Get a country by its exact (case-sensitive) name
pub async fn get_country(pool: &SqlitePool, name: &str) -> Result<Option<Country>> {
    let record = sqlx::query_as::<_, Country>(
        r#"
        SELECT id, name, capital, region, population, currency_code,
               exchange_rate, estimated_gdp, flag_url, last_refreshed_at
        FROM countries
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Delete a country by name. Returns whether a row was removed.
pub async fn delete_country(pool: &SqlitePool, name: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM countries WHERE name = ?")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn nigeria(at: DateTime<Utc>) -> NewCountry {
        NewCountry {
            name: "Nigeria".to_string(),
            capital: Some("Abuja".to_string()),
            region: Some("Africa".to_string()),
            population: 206_139_589,
            currency_code: Some("NGN".to_string()),
            exchange_rate: Some(1600.23),
            estimated_gdp: 25_767_448_125.2,
            flag_url: Some("https://flagcdn.com/ng.svg".to_string()),
            last_refreshed_at: at,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get() -> Result<()> {
        let pool = db::create_test_pool().await?;
        let at = Utc.with_ymd_and_hms(2025, 10, 22, 18, 0, 0).unwrap();

        upsert_country(&pool, &nigeria(at)).await?;

        let country = get_country(&pool, "Nigeria").await?;
        assert!(country.is_some());
        let country = country.unwrap();
        assert_eq!(country.capital.as_deref(), Some("Abuja"));
        assert_eq!(country.population, 206_139_589);
        assert_relative_eq!(country.exchange_rate.unwrap(), 1600.23, epsilon = 0.0001);
        assert_eq!(country.last_refreshed_at, at);

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_every_column() -> Result<()> {
        let pool = db::create_test_pool().await?;
        let first = Utc.with_ymd_and_hms(2025, 10, 22, 18, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 10, 23, 9, 30, 0).unwrap();

        upsert_country(&pool, &nigeria(first)).await?;
        let original_id = get_country(&pool, "Nigeria").await?.unwrap().id;

        let mut updated = nigeria(second);
        updated.capital = None;
        updated.currency_code = None;
        updated.exchange_rate = None;
        updated.estimated_gdp = 0.0;
        upsert_country(&pool, &updated).await?;

        let all = list_countries(&pool).await?;
        assert_eq!(all.len(), 1);
        let row = &all[0];
        assert_eq!(row.id, original_id);
        assert_eq!(row.capital, None);
        assert_eq!(row.currency_code, None);
        assert_eq!(row.exchange_rate, None);
        assert_eq!(row.estimated_gdp, 0.0);
        assert_eq!(row.last_refreshed_at, second);

        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() -> Result<()> {
        let pool = db::create_test_pool().await?;
        upsert_country(&pool, &nigeria(Utc::now())).await?;

        assert!(get_country(&pool, "nigeria").await?.is_none());
        assert!(get_country(&pool, "Nigeria").await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_country() -> Result<()> {
        let pool = db::create_test_pool().await?;
        let mut ghana = nigeria(Utc::now());
        ghana.name = "Ghana".to_string();
        upsert_country(&pool, &nigeria(Utc::now())).await?;
        upsert_country(&pool, &ghana).await?;

        assert!(!delete_country(&pool, "Atlantis").await?);
        assert!(delete_country(&pool, "Nigeria").await?);
        assert!(get_country(&pool, "Nigeria").await?.is_none());
        assert!(!delete_country(&pool, "Nigeria").await?);

        let remaining = list_countries(&pool).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Ghana");

        Ok(())
    }
}
