use hopline_common::{CustomEvent, EventRecorder, JsonPoster, ObjectStore, ObjectStoreError};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// S3 object-created notification.
///
/// Records stay raw until their turn in the loop, so a malformed record only
/// affects itself and the records after it.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<Value>,
}

/// One uploaded object
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

impl UploadRecord {
    /// Decode one raw notification record
    pub fn from_raw(record: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(record)
    }

    pub fn bucket(&self) -> &str {
        &self.s3.bucket.name
    }

    pub fn key(&self) -> &str {
        &self.s3.object.key
    }
}

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Every record was read and posted
    Completed { forwarded: usize },
    /// `LAMBDA_VALIDATOR_URL` is not configured; nothing was processed
    MissingValidatorUrl,
    /// The notification could not be decoded
    MalformedNotification,
    /// Reading or parsing an object failed; later records were skipped
    RetrievalFailed { bucket: String, key: String },
    /// Posting to the validator failed; later records were skipped
    DeliveryFailed { bucket: String, key: String },
}

#[derive(Error, Debug)]
enum FetchError {
    #[error(transparent)]
    Store(#[from] ObjectStoreError),

    #[error("Object is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads each uploaded object and posts it to the validator.
///
/// Records are handled strictly in order and the first failure ends the
/// invocation; records after it are neither fetched nor posted.
pub struct Forwarder {
    store: Arc<dyn ObjectStore>,
    poster: Arc<dyn JsonPoster>,
    events: Arc<dyn EventRecorder>,
    validator_url: Option<String>,
}

impl Forwarder {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        poster: Arc<dyn JsonPoster>,
        events: Arc<dyn EventRecorder>,
        validator_url: Option<String>,
    ) -> Self {
        Self {
            store,
            poster,
            events,
            validator_url,
        }
    }

    #[instrument(skip_all)]
    pub async fn handle(&self, event: Value) -> ForwardOutcome {
        info!("Lambda is triggered.");

        let Some(validator_url) = self.validator_url.as_deref() else {
            error!("LAMBDA_VALIDATOR_URL is not set");
            self.events
                .record(CustomEvent::new("No validator URL is provided."));
            return ForwardOutcome::MissingValidatorUrl;
        };

        let notification: UploadNotification = match serde_json::from_value(event) {
            Ok(notification) => notification,
            Err(e) => {
                error!(error = %e, "Failed to parse upload records");
                self.events.record(CustomEvent::new("Parsing records is failed."));
                return ForwardOutcome::MalformedNotification;
            }
        };
        info!(records = notification.records.len(), "Records are parsed successfully.");

        let mut forwarded = 0;
        for raw in &notification.records {
            let record = match UploadRecord::from_raw(raw) {
                Ok(record) => record,
                Err(e) => {
                    let bucket = raw_field(raw, "/s3/bucket/name");
                    let key = raw_field(raw, "/s3/object/key");
                    error!(bucket, key, error = %e, "Failed to read upload record");
                    return self.retrieval_failed(bucket, key);
                }
            };
            let (bucket, key) = (record.bucket(), record.key());

            debug!(bucket, key, "Reading file from bucket");
            let file = match self.fetch(bucket, key).await {
                Ok(file) => file,
                Err(e) => {
                    error!(bucket, key, error = %e, "Failed to retrieve file");
                    return self.retrieval_failed(bucket, key);
                }
            };
            info!(bucket, key, "File is read successfully from the bucket.");

            debug!(bucket, key, "Sending file to validator");
            match self.poster.post_json(validator_url, &file).await {
                Ok(status) => debug!(bucket, key, status, "Validator answered"),
                Err(e) => {
                    error!(bucket, key, error = %e, "Failed to send file to validator");
                    self.events.record(CustomEvent::new(format!(
                        "Sending file [{}] from bucket [{}] to validator [{}] failed.",
                        key, bucket, validator_url
                    )));
                    return ForwardOutcome::DeliveryFailed {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    };
                }
            }

            forwarded += 1;
        }

        ForwardOutcome::Completed { forwarded }
    }

    async fn fetch(&self, bucket: &str, key: &str) -> Result<Value, FetchError> {
        let body = self.store.get_object(bucket, key).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn retrieval_failed(&self, bucket: &str, key: &str) -> ForwardOutcome {
        self.events.record(CustomEvent::new(format!(
            "Retrieving file [{}] from bucket [{}] failed.",
            key, bucket
        )));
        ForwardOutcome::RetrievalFailed {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

/// String at `pointer` in a raw record, empty when absent
fn raw_field<'a>(record: &'a Value, pointer: &str) -> &'a str {
    record.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}
