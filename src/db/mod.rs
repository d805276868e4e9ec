use rusqlite::{params, OptionalExtension, Params, Row};
use r2d2_sqlite::SqliteConnectionManager;
pub mod entities;
mod mappers;
use eyre::WrapErr;
use color_eyre::Result;
use log::info;
use entities::*;
use mappers::map_review;

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<SqliteConnectionManager>;

// Order matters, see mappers::map_review.
const REVIEW_COLUMNS: &'static str =
  "id, title, author, rating, read_date, review, image, image_mime_type";

// AUTOINCREMENT so ids from deleted reviews never come back.
const CREATE_REVIEWS_TABLE: &'static str =
  "CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    rating INTEGER NOT NULL,
    read_date TEXT NOT NULL,
    review TEXT NOT NULL,
    image BLOB,
    image_mime_type TEXT
  )";

/**
 * All of the DB access is synchronous, the handlers
 * just call these directly.
 */

pub fn open_pool(db_path: &str, pool_size: u32) -> Result<Pool> {
  let manager = SqliteConnectionManager::file(db_path);
  Pool::builder()
    .max_size(pool_size)
    .build(manager)
    .context("Database connection failed")
}

// Every new connection to ":memory:" is a brand new
// database, so the pool has to stick to one connection.
#[cfg(test)]
pub fn memory_pool() -> Result<Pool> {
  let pool = Pool::builder()
    .max_size(1)
    .build(SqliteConnectionManager::memory())
    .context("In-memory database")?;
  init_schema(&pool)?;
  Ok(pool)
}

pub fn init_schema(pool: &Pool) -> Result<()> {
  let conn = pool.get()?;
  conn.execute(CREATE_REVIEWS_TABLE, [])
    .context("Creating the reviews table")?;
  info!("Database schema is ready");
  Ok(())
}

fn select_many<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Vec<T>>
  where
    P: Params,
    F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.get()?;
  let mut stmt = conn.prepare(query)?;
  let rows = stmt.query_map(params, mapper)
    .and_then(Iterator::collect)
    .context("Generic select_many query")?;
  Ok(rows)
}

pub fn all_reviews(pool: &Pool) -> Result<Vec<Review>> {
  select_many(
    pool,
    &format!("SELECT {} FROM reviews ORDER BY id ASC", REVIEW_COLUMNS),
    [],
    map_review
  )
}

pub fn review_by_id(pool: &Pool, id: i64) -> Result<Option<Review>> {
  let conn = pool.get()?;
  let mut stmt = conn.prepare(
    &format!("SELECT {} FROM reviews WHERE id = ?", REVIEW_COLUMNS)
  )?;
  stmt.query_row(params![id], map_review)
    .optional()
    .context("Fetching a review by id")
}

pub fn review_exists(pool: &Pool, id: i64) -> Result<bool> {
  let conn = pool.get()?;
  let count: i64 = conn.query_row(
    "SELECT count(*) FROM reviews WHERE id = ?",
    params![id],
    |row| row.get(0)
  )?;
  Ok(count > 0)
}

// Sets the id on the review once it's inserted.
pub fn insert_review(pool: &Pool, review: &mut Review) -> Result<()> {
  let conn = pool.get()?;
  conn.execute(
    "INSERT INTO reviews
    (title, author, rating, read_date, review, image, image_mime_type)
    VALUES (?, ?, ?, ?, ?, ?, ?)",
    params![
      review.title,
      review.author,
      review.rating,
      review.read_date,
      review.review,
      review.image.as_ref().map(|i| &i.data),
      review.image.as_ref().map(|i| &i.mime_type)
    ]
  ).context("Inserting a review")?;
  review.id = conn.last_insert_rowid();
  Ok(())
}

// Returns false when no row had that id, which can
// happen if someone deleted it in the meantime.
pub fn update_review(pool: &Pool, update: &ReviewUpdate) -> Result<bool> {
  let conn = pool.get()?;
  let changed = match &update.image {
    Some(image) => conn.execute(
      "UPDATE reviews SET title = ?, author = ?, rating = ?,
      read_date = ?, review = ?, image = ?, image_mime_type = ?
      WHERE id = ?",
      params![
        update.title,
        update.author,
        update.rating,
        update.read_date,
        update.review,
        image.data,
        image.mime_type,
        update.id
      ]
    ),
    None => conn.execute(
      "UPDATE reviews SET title = ?, author = ?, rating = ?,
      read_date = ?, review = ? WHERE id = ?",
      params![
        update.title,
        update.author,
        update.rating,
        update.read_date,
        update.review,
        update.id
      ]
    )
  }.context("Updating a review")?;
  Ok(changed > 0)
}

pub fn delete_review(pool: &Pool, id: i64) -> Result<bool> {
  let conn = pool.get()?;
  let deleted = conn.execute(
    "DELETE FROM reviews WHERE id = ?",
    params![id]
  ).context("Deleting a review")?;
  Ok(deleted > 0)
}
