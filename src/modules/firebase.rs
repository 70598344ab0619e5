use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use std::path::Path;
use tracing::debug;
use super::error::ImportError;
use super::parser::RowSet;
use super::store::RemoteStore;

// scopes the Realtime Database REST API accepts for service account tokens
const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/firebase.database",
];

pub struct Firebase {
    client: Client,
    database_url: String,
    credentials: CustomServiceAccount,
}

impl Firebase {

    // load the service account key and prepare the http client, nothing is sent yet
    pub fn connect(database_url: &str, credentials_path: &Path) -> Result<Firebase, ImportError> {
        if !database_url.starts_with("https://") && !database_url.starts_with("http://") {
            return Err(ImportError::Config(format!("{} is not a valid database url", database_url)));
        }

        Ok(Firebase {
            client: Client::new(),
            database_url: database_url.trim_end_matches('/').to_owned(),
            credentials: CustomServiceAccount::from_file(credentials_path)?,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[async_trait]
impl RemoteStore for Firebase {

    // one PUT replaces the whole node; the database applies it as a single write
    async fn set(&self, key: &str, rows: &RowSet) -> Result<(), ImportError> {
        let token = self.credentials.token(&SCOPES).await?;
        let url = node_url(&self.database_url, key);
        debug!("PUT {} ({} rows)", url, rows.len());

        let response = self
            .client
            .put(&url)
            .bearer_auth(token.as_str())
            .json(rows)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ImportError::Remote {
                key: key.to_owned(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}

// REST location of a node: {database}/{key}.json
fn node_url(database_url: &str, key: &str) -> String {
    format!(
        "{}/{}.json",
        database_url.trim_end_matches('/'),
        key.trim_matches('/')
    )
}
