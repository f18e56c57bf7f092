//! Row cursor

use futures::stream::{self, BoxStream, StreamExt};
use sqlx::sqlite::SqliteRow;

/// Cursor over the rows of a query
///
/// The cursor holds a pooled connection while open. It closes itself when
/// the rows are exhausted or an error is read, on [`Rows::close`], and on
/// drop.
pub struct Rows {
    stream: Option<BoxStream<'static, Result<SqliteRow, sqlx::Error>>>,
}

impl Rows {
    pub fn from_stream(stream: BoxStream<'static, Result<SqliteRow, sqlx::Error>>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Cursor that yields nothing
    pub fn empty() -> Self {
        Self::from_stream(stream::empty().boxed())
    }

    /// Advance to the next row
    pub async fn next(&mut self) -> Result<Option<SqliteRow>, sqlx::Error> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        match stream.next().await {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => {
                self.close();
                Err(e)
            }
            None => {
                self.close();
                Ok(None)
            }
        }
    }

    /// Release the cursor without reading further rows
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::trace!("Rows closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

impl std::fmt::Debug for Rows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_cursor_closes_on_exhaustion() {
        let mut rows = Rows::empty();
        assert!(!rows.is_closed());

        assert!(rows.next().await.unwrap().is_none());
        assert!(rows.is_closed());
        assert!(rows.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cursor_closes_on_error() {
        let failing = stream::iter(vec![Err(sqlx::Error::PoolTimedOut)]).boxed();
        let mut rows = Rows::from_stream(failing);

        assert!(matches!(rows.next().await, Err(sqlx::Error::PoolTimedOut)));
        assert!(rows.is_closed());
    }
}
