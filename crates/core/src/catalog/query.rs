//! Normalization of product listing parameters.
//!
//! Raw query-string values arrive as optional text. [`ProductQuery::from_params`]
//! coerces and validates every field up front, so a request that fails here
//! never reaches the database. The resulting query carries a closed set of
//! [`ProductFilter`] predicates (combined with AND by the repository), a
//! whitelisted [`SortField`], and page/limit values within bounds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Page used when the caller does not supply one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Query-string parameters for `GET /products`, exactly as received.
///
/// Every field is optional text; blank values count as absent.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub release_date_from: Option<String>,
    pub release_date_to: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Price,
    #[default]
    Title,
    Artist,
    ReleaseDate,
    Stock,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Price,
        SortField::Title,
        SortField::Artist,
        SortField::ReleaseDate,
        SortField::Stock,
        SortField::CreatedAt,
    ];

    /// Name accepted in the `sortBy` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Title => "title",
            SortField::Artist => "artist",
            SortField::ReleaseDate => "releaseDate",
            SortField::Stock => "stock",
            SortField::CreatedAt => "createdAt",
        }
    }

    /// The `products` column this field orders by.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Title => "title",
            SortField::Artist => "artist",
            SortField::ReleaseDate => "release_date",
            SortField::Stock => "stock",
            SortField::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
                CoreError::Validation(format!(
                    "sortBy must be one of: {} (got '{s}')",
                    allowed.join(", ")
                ))
            })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(CoreError::Validation(format!(
                "sortOrder must be 'asc' or 'desc' (got '{s}')"
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One condition of a listing's predicate set.
///
/// Text variants are case-insensitive substring matches; range variants are
/// inclusive. A query's filters are always conjoined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    TitleContains(String),
    ArtistContains(String),
    GenreContains(String),
    MinPrice(Decimal),
    MaxPrice(Decimal),
    ReleasedFrom(NaiveDate),
    ReleasedTo(NaiveDate),
}

/// Escape `LIKE` metacharacters so `text` matches literally.
///
/// The repository pairs this with `ESCAPE '\'`.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `%text%` with `text` escaped, for substring matching.
pub fn contains_pattern(text: &str) -> String {
    format!("%{}%", escape_like(text))
}

// ---------------------------------------------------------------------------
// Normalized query
// ---------------------------------------------------------------------------

/// A validated listing query. Build one per request with [`ProductQuery::from_params`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    page: i64,
    limit: i64,
    offset: i64,
    filters: Vec<ProductFilter>,
    sort_by: SortField,
    sort_order: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            offset: 0,
            filters: Vec::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ProductQuery {
    /// Coerce and validate raw parameters.
    ///
    /// Fails with [`CoreError::Validation`] when any value is outside its
    /// domain. An inverted price or date range is not an error; it simply
    /// matches nothing.
    pub fn from_params(params: &ProductListParams) -> Result<Self, CoreError> {
        let page = parse_integer("page", params.page.as_deref())?.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1 (got {page})"
            )));
        }

        let limit = parse_integer("limit", params.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT} (got {limit})"
            )));
        }

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| CoreError::Validation(format!("page {page} is out of range")))?;

        let mut filters = Vec::new();

        if let Some(title) = non_blank(params.title.as_deref()) {
            filters.push(ProductFilter::TitleContains(title.to_string()));
        }
        if let Some(artist) = non_blank(params.artist.as_deref()) {
            filters.push(ProductFilter::ArtistContains(artist.to_string()));
        }
        if let Some(genre) = non_blank(params.genre.as_deref()) {
            filters.push(ProductFilter::GenreContains(genre.to_string()));
        }
        if let Some(min) = parse_price("minPrice", params.min_price.as_deref())? {
            filters.push(ProductFilter::MinPrice(min));
        }
        if let Some(max) = parse_price("maxPrice", params.max_price.as_deref())? {
            filters.push(ProductFilter::MaxPrice(max));
        }
        if let Some(from) = parse_date("releaseDateFrom", params.release_date_from.as_deref())? {
            filters.push(ProductFilter::ReleasedFrom(from));
        }
        if let Some(to) = parse_date("releaseDateTo", params.release_date_to.as_deref())? {
            filters.push(ProductFilter::ReleasedTo(to));
        }

        let sort_by = match non_blank(params.sort_by.as_deref()) {
            Some(s) => s.parse()?,
            None => SortField::default(),
        };
        let sort_order = match non_blank(params.sort_order.as_deref()) {
            Some(s) => s.parse()?,
            None => SortOrder::default(),
        };

        Ok(Self {
            page,
            limit,
            offset,
            filters,
            sort_by,
            sort_order,
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// The predicate set; empty means every product matches.
    pub fn filters(&self) -> &[ProductFilter] {
        &self.filters
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_integer(name: &str, value: Option<&str>) -> Result<Option<i64>, CoreError> {
    non_blank(value)
        .map(|v| {
            v.parse::<i64>().map_err(|_| {
                CoreError::Validation(format!("{name} must be an integer (got '{v}')"))
            })
        })
        .transpose()
}

fn parse_price(name: &str, value: Option<&str>) -> Result<Option<Decimal>, CoreError> {
    let Some(v) = non_blank(value) else {
        return Ok(None);
    };
    let price = Decimal::from_str(v)
        .map_err(|_| CoreError::Validation(format!("{name} must be a number (got '{v}')")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::Validation(format!(
            "{name} must not be negative (got {v})"
        )));
    }
    Ok(Some(price))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its calendar date is used).
fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    let Some(v) = non_blank(value) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(v).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| {
            CoreError::Validation(format!(
                "{name} must be a date in YYYY-MM-DD format (got '{v}')"
            ))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
