//! Crate-wide error type. Each module keeps its own focused `Error` enum
//! (`catalog::Error`, `router::Error`, `persistence::Error`,
//! `protocol::Error`); this one wraps them for callers — mainly `main` —
//! that need to propagate across module boundaries with `?`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] crate::catalog::Error),
    #[error(transparent)]
    Router(#[from] crate::router::Error),
    #[error(transparent)]
    Protocol(#[from] crate::protocol::Error),
    #[error(transparent)]
    Persistence(#[from] crate::persistence::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Usage: transit_catalogue [make_base|process_requests]")]
    Usage,
}
