//! Request lifecycle state

use crate::error::{FetchError, FetchResult};

/// What a view shows for one request
///
/// `Empty` is a successful answer with nothing in it. It is never used for a
/// failure, and a failure is never shown as empty.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Empty,
    Ready(T),
    Failed(FetchError),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    /// Turn a finished request into a view state
    pub fn resolve(result: FetchResult<T>, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match result {
            Ok(value) if is_empty(&value) => ViewState::Empty,
            Ok(value) => ViewState::Ready(value),
            Err(err) => ViewState::Failed(err),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            ViewState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Short name, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Empty => "empty",
            ViewState::Ready(_) => "ready",
            ViewState::Failed(_) => "failed",
        }
    }
}
