//! Read-only queries over the ingested resolver list.
//!
//! Each method runs a single statement against whatever the last completed
//! ingest produced. Nothing is cached between calls. Results are undefined
//! while an ingest is still running.

use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::config::MAX_RELIABILITY;
use crate::error_handling::QueryError;
use crate::models::{CountryTally, Nameserver};


const NAMESERVER_COLUMNS: &str =
    "ip, name, country, city, version, error, dnssec, reliability, checked_at, created_at";

/// Query service over the `nameservers` table.
///
/// # Example
///
/// ```no_run
/// use public_dns::PublicDns;
/// use sqlx::SqlitePool;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = SqlitePool::connect("sqlite:./public_dns.db").await?;
/// let dns = PublicDns::new(pool);
/// let best = dns.best_for_country("DE").await?;
/// println!("{} ({})", best.ip_address, best.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PublicDns {
    pool: SqlitePool,
}

impl PublicDns {
    /// Creates a query service over an already ingested database.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns every resolver of `country`, in table scan order.
    ///
    /// An unknown country yields an empty vector.
    pub async fn all_for_country(&self, country: &str) -> Result<Vec<Nameserver>, QueryError> {
        let query =
            format!("SELECT {NAMESERVER_COLUMNS} FROM nameservers WHERE country = ? ORDER BY rowid");
        let rows = sqlx::query(&query)
            .bind(country)
            .fetch_all(&self.pool)
            .await?;

        debug!("Found {} nameservers for {country}", rows.len());
        rows_to_nameservers(&rows)
    }

    /// Returns the most reliable resolver of `country`.
    ///
    /// Ties on reliability go to the resolver that comes first in scan order.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::NotFound` when the country has no resolver.
    pub async fn best_for_country(&self, country: &str) -> Result<Nameserver, QueryError> {
        let query = format!(
            "SELECT {NAMESERVER_COLUMNS} FROM nameservers
             WHERE country = ?
             ORDER BY reliability DESC, rowid ASC
             LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(country)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(nameserver_from_row(&row)?),
            None => Err(QueryError::NotFound {
                country: country.to_string(),
            }),
        }
    }

    /// Returns at most one good resolver for each of `countries`.
    ///
    /// Only resolvers with a hostname, a city and a reliability of exactly
    /// [`MAX_RELIABILITY`] qualify. Among those, the one with the oldest
    /// `checked_at` wins. Countries without a qualifying resolver are left out,
    /// so the result can be shorter than the input. Results are ordered by
    /// country code.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidArgument` when `countries` is empty.
    pub async fn best_per_country<S: AsRef<str>>(
        &self,
        countries: &[S],
    ) -> Result<Vec<Nameserver>, QueryError> {
        if countries.is_empty() {
            return Err(QueryError::InvalidArgument(
                "at least one country code is required",
            ));
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {NAMESERVER_COLUMNS} FROM (
                SELECT n.*, ROW_NUMBER() OVER (
                    PARTITION BY n.country ORDER BY n.checked_at ASC, n.rowid ASC
                ) AS position
                FROM nameservers AS n
                WHERE n.name != '' AND n.city != '' AND n.reliability = "
        ));
        query_builder.push_bind(MAX_RELIABILITY);
        query_builder.push(" AND n.country IN (");
        let mut separated = query_builder.separated(", ");
        for country in countries {
            separated.push_bind(country.as_ref());
        }
        separated.push_unseparated(")) WHERE position = 1 ORDER BY country");

        let rows = query_builder.build().fetch_all(&self.pool).await?;

        debug!(
            "Found good nameservers for {} of {} requested countries",
            rows.len(),
            countries.len()
        );
        rows_to_nameservers(&rows)
    }

    /// Counts the good resolvers of every country that has at least one.
    ///
    /// "Good" uses the same filter as [`PublicDns::best_per_country`].
    pub async fn tally_good_per_country(&self) -> Result<Vec<CountryTally>, QueryError> {
        let rows = sqlx::query(
            "SELECT country, COUNT(ip) AS total
             FROM nameservers
             WHERE name != '' AND city != '' AND reliability = ?
             GROUP BY country
             ORDER BY country",
        )
        .bind(MAX_RELIABILITY)
        .fetch_all(&self.pool)
        .await?;

        let tallies = rows
            .iter()
            .map(|row| {
                Ok(CountryTally {
                    country: row.try_get("country")?,
                    total: row.try_get("total")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(tallies)
    }

    /// Returns the number of stored resolvers.
    pub async fn count(&self) -> Result<i64, QueryError> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM nameservers")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

fn nameserver_from_row(row: &SqliteRow) -> Result<Nameserver, sqlx::Error> {
    Ok(Nameserver {
        ip_address: row.try_get("ip")?,
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        city: row.try_get("city")?,
        version: row.try_get("version")?,
        error: row.try_get("error")?,
        dnssec: row.try_get("dnssec")?,
        reliability: row.try_get("reliability")?,
        checked_at: row.try_get("checked_at")?,
        created_at: row.try_get("created_at")?,
    })
}

fn rows_to_nameservers(rows: &[SqliteRow]) -> Result<Vec<Nameserver>, QueryError> {
    rows.iter()
        .map(nameserver_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(QueryError::from)
}
