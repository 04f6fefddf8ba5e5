use thiserror::Error;

/// Failure reported by a registered graph observer.
///
/// The operation that triggered the observer has already committed when one of
/// these is returned; it only tells the caller that a listener could not keep up.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ObserverError {
    #[error("observer failed: {0}")]
    Failed(String),
    #[error("traversal cancelled by observer")]
    Cancelled,
}

pub type ObserverResult = Result<(), ObserverError>;

/// Listener for edge mutations, called with both endpoints.
pub(crate) type EdgeCallback<V> = Box<dyn FnMut(V, V) -> ObserverResult>;
