use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // the reader itself failed; ragged records and bad utf-8 are tolerated
    #[error("invalid csv in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("remote store rejected write to /{key} ({status}): {body}")]
    Remote {
        key: String,
        status: u16,
        body: String,
    },

    #[error("request to remote store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot obtain access token: {0}")]
    Auth(#[from] gcp_auth::Error),

    #[error("cannot encode rows: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
