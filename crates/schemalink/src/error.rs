use schemalink_build::BuildError;
use schemalink_config::ConfigError;
use schemalink_source::SourceError;
use thiserror::Error as ThisError;

///
/// Error
/// Every way a pipeline run can fail.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Source(#[from] SourceError),
}
