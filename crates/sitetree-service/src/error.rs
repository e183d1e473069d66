use sitetree_core::SiteError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("scan coordinator is not running")]
    CoordinatorClosed,

    #[error(transparent)]
    Site(#[from] SiteError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
