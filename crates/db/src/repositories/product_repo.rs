//! Repository for the `products` table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use vinyl_core::catalog::page::Page;
use vinyl_core::catalog::query::{contains_pattern, ProductFilter, ProductQuery};
use vinyl_core::catalog::stock::{StockDelta, MAX_STOCK, MIN_STOCK};
use vinyl_core::types::DbId;

use crate::models::product::{CreateProduct, Product, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, artist, genre, release_date, price, stock, created_at, updated_at";

/// Name of the unique constraint on `(title, artist)`.
pub const UQ_TITLE_ARTIST: &str = "uq_products_title_artist";

/// Outcome of [`ProductRepo::adjust_stock`].
#[derive(Debug)]
pub enum StockAdjustment {
    /// The delta was applied; carries the updated row.
    Applied(Product),
    /// No product with the given id exists.
    NotFound,
    /// Applying the delta would leave stock outside the allowed range.
    OutOfBounds { current: i32 },
}

/// Provides CRUD, listing, and stock operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    ///
    /// A duplicate `(title, artist)` fails with a unique violation on
    /// [`UQ_TITLE_ARTIST`].
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (title, artist, genre, release_date, price, stock)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(&input.genre)
            .bind(input.release_date)
            .bind(input.price)
            .bind(input.stock)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a product. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                title = COALESCE($2, title),
                artist = COALESCE($3, artist),
                genre = COALESCE($4, genre),
                release_date = COALESCE($5, release_date),
                price = COALESCE($6, price),
                stock = COALESCE($7, stock)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(&input.genre)
            .bind(input.release_date)
            .bind(input.price)
            .bind(input.stock)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a product, returning the removed row.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("DELETE FROM products WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count products matching the query's predicate set (ignores paging).
    pub async fn count(pool: &PgPool, params: &ProductQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_product_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM products {where_clause}");

        let q = bind_product_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Fetch one page of products matching the query, in its sort order.
    ///
    /// Rows with equal sort keys are ordered by `id` so paging is stable.
    pub async fn list(pool: &PgPool, params: &ProductQuery) -> Result<Vec<Product>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_product_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM products {where_clause} \
             ORDER BY {sort_column} {sort_order}, id ASC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            sort_column = params.sort_by().column(),
            sort_order = params.sort_order().as_sql(),
            next_idx = bind_idx + 1,
        );

        let q = bind_product_values(sqlx::query_as::<_, Product>(&query), &bind_values);
        q.bind(params.limit())
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Run [`count`](Self::count) and [`list`](Self::list) concurrently and
    /// assemble the page with its metadata.
    ///
    /// The two statements share the predicate set but not a transaction, so
    /// a concurrent write may skew the total against the fetched rows.
    pub async fn list_page(
        pool: &PgPool,
        params: &ProductQuery,
    ) -> Result<Page<Product>, sqlx::Error> {
        let (total, items) = tokio::try_join!(Self::count(pool, params), Self::list(pool, params))?;

        tracing::debug!(
            total,
            returned = items.len(),
            page = params.page(),
            limit = params.limit(),
            filters = params.filters().len(),
            "Listed products"
        );

        Ok(Page::new(items, total, params.page(), params.limit()))
    }

    /// Products whose artist contains `artist` (case-insensitive), by title.
    pub async fn find_by_artist(pool: &PgPool, artist: &str) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE artist ILIKE $1 ESCAPE '\\' \
             ORDER BY title ASC, id ASC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(contains_pattern(artist))
            .fetch_all(pool)
            .await
    }

    /// Products whose genre contains `genre` (case-insensitive), by artist.
    pub async fn find_by_genre(pool: &PgPool, genre: &str) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE genre ILIKE $1 ESCAPE '\\' \
             ORDER BY artist ASC, id ASC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(contains_pattern(genre))
            .fetch_all(pool)
            .await
    }

    /// Apply a stock delta in a single conditional statement.
    ///
    /// The bound check and the increment happen in the same `UPDATE`, so
    /// concurrent adjustments on one product serialize on the row lock and
    /// can never push stock outside `MIN_STOCK..=MAX_STOCK`. When the update
    /// matches nothing, the current row is read only to classify the refusal.
    pub async fn adjust_stock(
        pool: &PgPool,
        id: DbId,
        delta: StockDelta,
    ) -> Result<StockAdjustment, sqlx::Error> {
        let query = format!(
            "UPDATE products SET stock = stock + $2
             WHERE id = $1 AND stock + $2 BETWEEN $3 AND $4
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(i64::from(delta.quantity()))
            .bind(i64::from(MIN_STOCK))
            .bind(i64::from(MAX_STOCK))
            .fetch_optional(pool)
            .await?;

        if let Some(product) = updated {
            return Ok(StockAdjustment::Applied(product));
        }

        let current = sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(match current {
            Some(current) => StockAdjustment::OutOfBounds { current },
            None => StockAdjustment::NotFound,
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built product queries.
enum BindValue {
    Text(String),
    Numeric(Decimal),
    Date(NaiveDate),
}

/// Build a WHERE clause and bind values from the query's predicate set.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_product_filter(params: &ProductQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    for filter in params.filters() {
        let (condition, value) = match filter {
            ProductFilter::TitleContains(text) => (
                format!("title ILIKE ${bind_idx} ESCAPE '\\'"),
                BindValue::Text(contains_pattern(text)),
            ),
            ProductFilter::ArtistContains(text) => (
                format!("artist ILIKE ${bind_idx} ESCAPE '\\'"),
                BindValue::Text(contains_pattern(text)),
            ),
            ProductFilter::GenreContains(text) => (
                format!("genre ILIKE ${bind_idx} ESCAPE '\\'"),
                BindValue::Text(contains_pattern(text)),
            ),
            ProductFilter::MinPrice(min) => {
                (format!("price >= ${bind_idx}"), BindValue::Numeric(*min))
            }
            ProductFilter::MaxPrice(max) => {
                (format!("price <= ${bind_idx}"), BindValue::Numeric(*max))
            }
            ProductFilter::ReleasedFrom(from) => {
                (format!("release_date >= ${bind_idx}"), BindValue::Date(*from))
            }
            ProductFilter::ReleasedTo(to) => {
                (format!("release_date <= ${bind_idx}"), BindValue::Date(*to))
            }
        };
        conditions.push(condition);
        bind_values.push(value);
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_product_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Numeric(v) => q = q.bind(*v),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_product_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Numeric(v) => q = q.bind(*v),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
