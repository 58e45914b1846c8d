//! Person repository implementation.

use serde::Deserialize;
use sqlx::PgPool;

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::{PageRequest, PageResponse, PersonId};
use tr4cking_entity::people::{Person, PersonInput};

use crate::error::{map_delete_error, map_read_error, map_write_error};

/// Free-text search over document number and names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilter {
    pub search: Option<String>,
}

impl SearchFilter {
    /// `ILIKE` pattern for the search term, if any. Wildcards typed by the
    /// user match literally.
    pub fn pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)))
    }
}

/// Escape `LIKE` metacharacters with the default `\` escape.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for persons.
#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: PersonId) -> AppResult<Option<Person>> {
        sqlx::query_as::<_, Person>("SELECT * FROM persons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find person"))
    }

    pub async fn find_by_document(&self, document_number: &str) -> AppResult<Option<Person>> {
        sqlx::query_as::<_, Person>("SELECT * FROM persons WHERE document_number = $1")
            .bind(document_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to find person by document"))
    }

    pub async fn list(
        &self,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Person>> {
        const WHERE: &str = "WHERE ($1::TEXT IS NULL OR document_number ILIKE $1 \
                             OR first_name ILIKE $1 OR last_name ILIKE $1)";
        let pattern = filter.pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM persons {WHERE}"))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count persons"))?;

        let items = sqlx::query_as::<_, Person>(&format!(
            "SELECT * FROM persons {WHERE} ORDER BY last_name, first_name LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to list persons"))?;

        Ok(PageResponse::new(items, page, total))
    }

    pub async fn create(&self, input: &PersonInput) -> AppResult<Person> {
        sqlx::query_as::<_, Person>(
            "INSERT INTO persons (document_number, first_name, last_name, phone, address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&input.document_number)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create person"))
    }

    pub async fn update(&self, id: PersonId, input: &PersonInput) -> AppResult<Person> {
        sqlx::query_as::<_, Person>(
            "UPDATE persons SET document_number = $2, first_name = $3, last_name = $4, \
                                phone = $5, address = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.document_number)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update person"))?
        .ok_or_else(|| AppError::not_found(format!("Person {id} not found")))
    }

    pub async fn delete(&self, id: PersonId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete person"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern() {
        let filter = SearchFilter {
            search: Some("  pérez ".into()),
        };
        assert_eq!(filter.pattern().as_deref(), Some("%pérez%"));
        let blank = SearchFilter {
            search: Some("   ".into()),
        };
        assert_eq!(blank.pattern(), None);
        assert_eq!(SearchFilter::default().pattern(), None);
    }
}

#[cfg(test)]
mod pattern_tests {
    use super::*;

    fn search(term: &str) -> SearchFilter {
        SearchFilter {
            search: Some(term.to_string()),
        }
    }

    #[test]
    fn test_pattern_wraps_trimmed_term() {
        assert_eq!(search("  Benítez ").pattern().as_deref(), Some("%Benítez%"));
        assert_eq!(search("   ").pattern(), None);
        assert_eq!(SearchFilter::default().pattern(), None);
    }

    #[test]
    fn test_pattern_escapes_wildcards() {
        assert_eq!(search("50%").pattern().as_deref(), Some("%50\\%%"));
        assert_eq!(search("a_b").pattern().as_deref(), Some("%a\\_b%"));
        assert_eq!(search("c:\\x").pattern().as_deref(), Some("%c:\\\\x%"));
    }
}
