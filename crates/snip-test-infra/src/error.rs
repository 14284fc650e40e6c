use thiserror::Error;

/// Errors raised while provisioning test fixtures.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to start container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("Redis did not become ready: {0}")]
    NotReady(#[source] redis::RedisError),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
