//! Snapshot of a single on-chain read.
//!
//! Every read reports `{data, error, is_loading}` independently. Consumers that
//! need several reads decide readiness from the conjunction of these flags.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<T> Query<T> {
    /// A read that has not produced a result, e.g. because its inputs are
    /// not available yet
    pub fn loading() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_loading: false,
        }
    }

    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            data: None,
            error: Some(error.to_string()),
            is_loading: false,
        }
    }

    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e),
        }
    }

    /// No error, not loading, and data present
    pub fn is_ready(&self) -> bool {
        !self.is_loading && self.error.is_none() && self.data.is_some()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Query<U> {
        Query {
            data: self.data.map(f),
            error: self.error,
            is_loading: self.is_loading,
        }
    }
}

/// Type-erased view used to aggregate heterogeneous queries
pub trait QueryStatus {
    fn is_ready(&self) -> bool;
    fn error(&self) -> Option<&str>;
}

impl<T> QueryStatus for Query<T> {
    fn is_ready(&self) -> bool {
        Query::is_ready(self)
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub fn all_ready(queries: &[&dyn QueryStatus]) -> bool {
    queries.iter().all(|q| q.is_ready())
}
