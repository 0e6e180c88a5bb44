//! DataSource trait definition.
//!
//! A [`DataSource`] stands in for the spreadsheet host: it yields the
//! populated range of the sheet being pushed, as a [`Table`].

use std::future::Future;
use std::pin::Pin;

use sheetcal_core::Table;

use crate::error::{ProviderError, ProviderResult};

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so callers can hold a
/// `&dyn DataSource` chosen at runtime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability that yields the current table.
///
/// Implementations should be `Send + Sync`, and a fetch should always read
/// the current contents: nothing is cached between invocations.
pub trait DataSource: Send + Sync {
    /// Returns the name/type of this source (e.g., "csv-file", "static").
    fn name(&self) -> &str;

    /// Reads the populated range.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the range cannot be produced. Callers
    /// treat this as fatal to the invocation.
    fn fetch_table(&self) -> BoxFuture<'_, ProviderResult<Table>>;
}

/// A source that always yields the same in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    table: Table,
}

impl StaticSource {
    /// Creates a source serving `table`.
    pub fn new(table: Table) -> Self {
        Self { table }
    }
}

impl DataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_table(&self) -> BoxFuture<'_, ProviderResult<Table>> {
        let table = self.table.clone();
        Box::pin(async move { Ok(table) })
    }
}

/// A source that always fails.
///
/// Useful for tests, or as a placeholder when a source fails to initialize.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    error: ProviderError,
}

impl ErrorSource {
    /// Creates a new error source.
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl DataSource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_table(&self) -> BoxFuture<'_, ProviderResult<Table>> {
        // ProviderError is not Clone; rebuild it from its parts.
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}
