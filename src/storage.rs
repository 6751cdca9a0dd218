//! Storage client.
//!
//! Row CRUD, container metadata, and share links against the
//! schmuckliCloud Data API. All data operations are scoped by the session
//! state on this client: the bucket (required), the dataset namespace, the
//! session token, and an optional share password for reading shared rows.

use reqwest::Method;
use serde_json::{json, Value};

use crate::client::{Connection, RequestDescriptor};
use crate::credentials::AppCredentials;
use crate::error::{Error, Result};
use crate::result::ApiResult;
use crate::types::{conditions_to_wire, rows_to_wire, Condition, QueryOptions, ShareLinkOptions};

/// Default Data API base URL.
pub const DEFAULT_SERVICE_URL: &str = "https://api.schmuckli.cloud/client_api/v1/data/";

/// Client for the schmuckliCloud Data API.
#[derive(Debug, Clone)]
pub struct StorageClient {
    connection: Connection,
    auth_token: Option<String>,
    dataset: Option<String>,
    bucket_id: Option<u64>,
    share_password: Option<String>,
}

impl StorageClient {
    /// Create a client against the default service URL.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Self> {
        Self::with_service_url(app_id, app_secret, DEFAULT_SERVICE_URL)
    }

    /// Create a client against a custom service URL.
    pub fn with_service_url(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        service_url: impl Into<String>,
    ) -> Result<Self> {
        Self::from_credentials(AppCredentials::new(app_id, app_secret), service_url)
    }

    /// Create a client from resolved credentials.
    pub fn from_credentials(
        credentials: AppCredentials,
        service_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            connection: Connection::new(service_url, credentials)?,
            auth_token: None,
            dataset: None,
            bucket_id: None,
            share_password: None,
        })
    }

    /// The service URL this client targets.
    pub fn service_url(&self) -> &str {
        self.connection.base_url()
    }

    // ===== Session state =====

    /// Set the session token of the signed-in user.
    ///
    /// Switching users invalidates the dataset scope, so the dataset is
    /// cleared unless `keep_dataset` is set.
    pub fn set_auth_token(&mut self, token: impl Into<String>, keep_dataset: bool) {
        self.auth_token = Some(token.into());
        if !keep_dataset {
            self.dataset = None;
        }
    }

    /// Set the dataset namespace for subsequent operations.
    pub fn set_dataset(&mut self, dataset: impl Into<String>) {
        self.dataset = Some(dataset.into());
    }

    /// Set the bucket partition for subsequent operations.
    pub fn set_bucket(&mut self, bucket_id: u64) {
        self.bucket_id = Some(bucket_id);
    }

    /// Set the password for reading password-protected shared rows.
    pub fn set_share_password(&mut self, password: impl Into<String>) {
        self.share_password = Some(password.into());
    }

    /// Currently selected bucket, if any.
    pub fn bucket(&self) -> Option<u64> {
        self.bucket_id
    }

    /// Currently selected dataset, if any.
    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    // ===== Data operations =====

    /// Fetch all rows of a container, optionally sorted and paged.
    pub async fn get_all(&self, container: &str, options: &QueryOptions) -> Result<ApiResult> {
        let descriptor = self
            .scoped_read(container)?
            .query("order", options.order_wire())
            .query("start", options.start_wire())
            .query("limit", options.limit_wire());
        self.connection.execute(descriptor).await
    }

    /// Fetch the rows matching all given conditions.
    pub async fn get(
        &self,
        container: &str,
        conditions: &[Condition],
        options: &QueryOptions,
    ) -> Result<ApiResult> {
        if conditions.is_empty() {
            return Err(Error::invalid_argument(
                "Please define at least one condition. If you want to show all entries, \
                 please use the method 'get_all'.",
            ));
        }

        let descriptor = self
            .scoped_read(container)?
            .query("filter", conditions_to_wire(conditions))
            .query("order", options.order_wire())
            .query("start", options.start_wire())
            .query("limit", options.limit_wire());
        self.connection.execute(descriptor).await
    }

    /// Fetch a single row by id. The result data holds the row itself
    /// rather than a one-element list.
    pub async fn get_by_id(&self, container: &str, row_id: u64) -> Result<ApiResult> {
        let descriptor = self.scoped_read(container)?.query("row", row_id.to_string());
        let result = self.connection.execute(descriptor).await?;

        let row = result
            .data()
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .cloned();
        Ok(ApiResult::new(
            result.status_code(),
            result.message().to_string(),
            row,
        ))
    }

    /// Insert a new row. `data` must be a non-empty JSON object mapping
    /// column names to values.
    pub async fn insert(&self, container: &str, data: &Value) -> Result<ApiResult> {
        validate_container(container)?;
        validate_data(data, "Please provide a data object.")?;
        let bucket = self.require_bucket()?;

        let descriptor = RequestDescriptor::new(Method::POST, "")
            .auth_token(self.auth_token.as_deref())
            .json(json!({
                "bucket": bucket,
                "dataset": self.dataset_wire(),
                "container": container,
                "data": data.to_string(),
            }));
        self.connection.execute(descriptor).await
    }

    /// Update columns of an existing row.
    pub async fn update(&self, container: &str, row_id: u64, data: &Value) -> Result<ApiResult> {
        validate_container(container)?;
        validate_data(
            data,
            "Please provide a data array, with data which should be updated.",
        )?;
        let bucket = self.require_bucket()?;

        let descriptor = RequestDescriptor::new(Method::PUT, "")
            .auth_token(self.auth_token.as_deref())
            .json(json!({
                "bucket": bucket,
                "dataset": self.dataset_wire(),
                "container": container,
                "row": row_id,
                "data": data.to_string(),
            }));
        self.connection.execute(descriptor).await
    }

    /// Delete a row, or a single column of it when `column` is given.
    pub async fn delete(
        &self,
        container: &str,
        row_id: u64,
        column: Option<&str>,
    ) -> Result<ApiResult> {
        validate_container(container)?;
        let bucket = self.require_bucket()?;

        let mut body = json!({
            "bucket": bucket,
            "dataset": self.dataset_wire(),
            "container": container,
            "row": row_id,
        });
        if let Some(column) = column {
            body["col"] = json!(column);
        }

        let descriptor = RequestDescriptor::new(Method::DELETE, "")
            .auth_token(self.auth_token.as_deref())
            .json(body);
        self.connection.execute(descriptor).await
    }

    /// Fetch the column metadata of a container.
    pub async fn metadata(&self, container: &str) -> Result<ApiResult> {
        validate_container(container)?;
        let bucket = self.require_bucket()?;

        let descriptor = RequestDescriptor::new(Method::GET, "metadata.php")
            .auth_token(self.auth_token.as_deref())
            .query("bucket", bucket.to_string())
            .query("container", container);
        self.connection.execute(descriptor).await
    }

    // ===== Share links =====

    /// Create a share link for the given rows. The result body carries
    /// the link reference.
    pub async fn create_share_link(
        &self,
        container: &str,
        rows: &[u64],
        options: &ShareLinkOptions,
    ) -> Result<ApiResult> {
        validate_container(container)?;
        validate_rows(rows)?;
        let bucket = self.require_bucket()?;

        let descriptor = RequestDescriptor::new(Method::POST, "share.php")
            .auth_token(self.auth_token.as_deref())
            .json(json!({
                "bucket": bucket,
                "dataset": self.dataset_wire(),
                "container": container,
                "rows": rows_to_wire(rows),
                "password": options.password.clone().unwrap_or_default(),
                "expires": options.expires.clone().unwrap_or_default(),
                "alias": options.alias.clone().unwrap_or_default(),
            }));
        self.connection.execute(descriptor).await
    }

    /// Replace the row set and protection settings of an existing share
    /// link.
    pub async fn update_share_link(
        &self,
        share_id: &str,
        rows: &[u64],
        options: &ShareLinkOptions,
    ) -> Result<ApiResult> {
        if share_id.is_empty() {
            return Err(Error::invalid_argument("Please provide a share link id."));
        }
        validate_rows(rows)?;

        let descriptor = RequestDescriptor::new(Method::PUT, "share.php")
            .auth_token(self.auth_token.as_deref())
            .json(json!({
                "share_id": share_id,
                "rows": rows_to_wire(rows),
                "password": options.password.clone().unwrap_or_default(),
                "expires": options.expires.clone().unwrap_or_default(),
                "alias": options.alias.clone().unwrap_or_default(),
            }));
        self.connection.execute(descriptor).await
    }

    // ===== Helpers =====

    /// Base descriptor for a scoped read, snapshotting the session state.
    fn scoped_read(&self, container: &str) -> Result<RequestDescriptor> {
        validate_container(container)?;
        let bucket = self.require_bucket()?;

        let mut descriptor = RequestDescriptor::new(Method::GET, "")
            .auth_token(self.auth_token.as_deref())
            .query("bucket", bucket.to_string())
            .query("dataset", self.dataset_wire())
            .query("container", container);
        if let Some(password) = &self.share_password {
            descriptor = descriptor.query("share_password", password);
        }
        Ok(descriptor)
    }

    fn require_bucket(&self) -> Result<u64> {
        self.bucket_id.ok_or_else(|| {
            Error::invalid_argument("Please define a bucket before accessing data.")
        })
    }

    fn dataset_wire(&self) -> String {
        self.dataset.clone().unwrap_or_default()
    }
}

fn validate_container(container: &str) -> Result<()> {
    if container.is_empty() {
        return Err(Error::invalid_argument("Please define a container."));
    }
    Ok(())
}

fn validate_data(data: &Value, message: &str) -> Result<()> {
    match data.as_object() {
        Some(map) if !map.is_empty() => Ok(()),
        _ => Err(Error::invalid_argument(message)),
    }
}

fn validate_rows(rows: &[u64]) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::invalid_argument("Please provide at least one row id."));
    }
    Ok(())
}
