//! The external conversation-flow platform, seen through a narrow port.
//!
//! The crate never talks to the vendor API itself. Hosts implement
//! [`FlowPlatform`] over their client of choice; two in-process
//! implementations ship with the crate: [`InMemoryPlatform`] for tests and
//! embedding, and [`FilePlatform`] for working on flows stored as files.

use crate::assemble::apply_update;
use crate::error::PlatformError;
use ahash::AHashMap;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[async_trait]
pub trait FlowPlatform: Send + Sync {
    /// Fetches a flow, or a specific version of it. `Ok(None)` means not found.
    async fn retrieve(
        &self,
        flow_id: &str,
        version: Option<u32>,
    ) -> Result<Option<Value>, PlatformError>;

    /// Applies a partial update and returns the resulting document.
    async fn update(
        &self,
        flow_id: &str,
        version: Option<u32>,
        body: Value,
    ) -> Result<Value, PlatformError>;

    /// Creates a flow and returns it with its assigned id and version.
    async fn create(&self, body: Value) -> Result<Value, PlatformError>;
}

#[async_trait]
impl<P: FlowPlatform + ?Sized> FlowPlatform for std::sync::Arc<P> {
    async fn retrieve(
        &self,
        flow_id: &str,
        version: Option<u32>,
    ) -> Result<Option<Value>, PlatformError> {
        (**self).retrieve(flow_id, version).await
    }

    async fn update(
        &self,
        flow_id: &str,
        version: Option<u32>,
        body: Value,
    ) -> Result<Value, PlatformError> {
        (**self).update(flow_id, version, body).await
    }

    async fn create(&self, body: Value) -> Result<Value, PlatformError> {
        (**self).create(body).await
    }
}

fn document_version(document: &Value) -> Option<u32> {
    document
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

/// Stamps identity fields onto a new flow body.
fn with_identity(body: Value, flow_id: &str, version: u32) -> Value {
    let mut document = body;
    apply_update(
        &mut document,
        &json!({ "conversation_flow_id": flow_id, "version": version }),
    );
    document
}

/// A call received by [`InMemoryPlatform`], recorded verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    Retrieve {
        flow_id: String,
        version: Option<u32>,
    },
    Update {
        flow_id: String,
        version: Option<u32>,
        body: Value,
    },
    Create {
        body: Value,
    },
}

/// Holds flows in memory, keeping every version, and records each call.
#[derive(Default)]
pub struct InMemoryPlatform {
    flows: Mutex<AHashMap<String, Vec<Value>>>,
    calls: Mutex<Vec<PlatformCall>>,
    next_failure: Mutex<Option<PlatformError>>,
    created: Mutex<u64>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored document. Its `conversation_flow_id` and `version`
    /// decide where it lands.
    pub fn with_flow(self, document: Value) -> Self {
        self.insert(document);
        self
    }

    pub fn insert(&self, document: Value) {
        let Some(flow_id) = document
            .get("conversation_flow_id")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            return;
        };
        let version = document_version(&document);
        let mut flows = self.flows.lock();
        let versions = flows.entry(flow_id).or_default();
        versions.retain(|existing| document_version(existing) != version);
        versions.push(document);
        versions.sort_by_key(document_version);
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: PlatformError) {
        *self.next_failure.lock() = Some(error);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().clone()
    }

    /// The body of the most recent update call.
    pub fn last_update_body(&self) -> Option<Value> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            PlatformCall::Update { body, .. } => Some(body.clone()),
            _ => None,
        })
    }

    /// The stored document, latest version unless `version` is given.
    pub fn stored(&self, flow_id: &str, version: Option<u32>) -> Option<Value> {
        let flows = self.flows.lock();
        let versions = flows.get(flow_id)?;
        match version {
            Some(v) => versions
                .iter()
                .find(|doc| document_version(doc) == Some(v))
                .cloned(),
            None => versions.last().cloned(),
        }
    }

    fn record(&self, call: PlatformCall) -> Result<(), PlatformError> {
        debug!(?call, "platform call");
        self.calls.lock().push(call);
        match self.next_failure.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FlowPlatform for InMemoryPlatform {
    async fn retrieve(
        &self,
        flow_id: &str,
        version: Option<u32>,
    ) -> Result<Option<Value>, PlatformError> {
        self.record(PlatformCall::Retrieve {
            flow_id: flow_id.to_string(),
            version,
        })?;
        Ok(self.stored(flow_id, version))
    }

    async fn update(
        &self,
        flow_id: &str,
        version: Option<u32>,
        body: Value,
    ) -> Result<Value, PlatformError> {
        self.record(PlatformCall::Update {
            flow_id: flow_id.to_string(),
            version,
            body: body.clone(),
        })?;

        let mut flows = self.flows.lock();
        let versions = flows
            .get_mut(flow_id)
            .ok_or_else(|| PlatformError::NotFound {
                flow_id: flow_id.to_string(),
            })?;
        let target = match version {
            Some(v) => versions
                .iter_mut()
                .find(|doc| document_version(doc) == Some(v)),
            None => versions.last_mut(),
        }
        .ok_or_else(|| PlatformError::NotFound {
            flow_id: flow_id.to_string(),
        })?;

        apply_update(target, &body);
        Ok(target.clone())
    }

    async fn create(&self, body: Value) -> Result<Value, PlatformError> {
        self.record(PlatformCall::Create { body: body.clone() })?;

        let flow_id = {
            let mut created = self.created.lock();
            *created += 1;
            format!("conversation_flow_{}", *created)
        };
        let document = with_identity(body, &flow_id, 0);
        self.insert(document.clone());
        Ok(document)
    }
}

/// Keeps one document per flow in `<dir>/<flow id>.json`.
///
/// Only the stored version can be retrieved; asking for any other version
/// reports the flow as not found.
#[derive(Debug, Clone)]
pub struct FilePlatform {
    dir: PathBuf,
}

impl FilePlatform {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, flow_id: &str) -> Option<PathBuf> {
        let valid = !flow_id.is_empty()
            && flow_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.dir.join(format!("{}.json", flow_id)))
    }

    fn read(&self, flow_id: &str) -> Result<Option<Value>, PlatformError> {
        let Some(path) = self.path_for(flow_id) else {
            return Ok(None);
        };
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, flow_id: &str, document: &Value) -> Result<(), PlatformError> {
        let path = self.path_for(flow_id).ok_or_else(|| PlatformError::NotFound {
            flow_id: flow_id.to_string(),
        })?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, serde_json::to_string_pretty(document)?)?;
        Ok(())
    }

    fn next_flow_id(&self) -> String {
        let mut n = 1u64;
        loop {
            let candidate = format!("conversation_flow_{}", n);
            let taken = self
                .path_for(&candidate)
                .is_some_and(|path| path.exists());
            if !taken {
                return candidate;
            }
            n += 1;
        }
    }
}

#[async_trait]
impl FlowPlatform for FilePlatform {
    async fn retrieve(
        &self,
        flow_id: &str,
        version: Option<u32>,
    ) -> Result<Option<Value>, PlatformError> {
        debug!(flow_id, ?version, dir = %self.dir.display(), "reading flow");
        let document = self.read(flow_id)?;
        Ok(document.filter(|doc| version.is_none() || document_version(doc) == version))
    }

    async fn update(
        &self,
        flow_id: &str,
        version: Option<u32>,
        body: Value,
    ) -> Result<Value, PlatformError> {
        let not_found = || PlatformError::NotFound {
            flow_id: flow_id.to_string(),
        };
        let mut document = self
            .read(flow_id)?
            .filter(|doc| version.is_none() || document_version(doc) == version)
            .ok_or_else(not_found)?;

        apply_update(&mut document, &body);
        self.write(flow_id, &document)?;
        debug!(flow_id, "flow written");
        Ok(document)
    }

    async fn create(&self, body: Value) -> Result<Value, PlatformError> {
        fs::create_dir_all(&self.dir)?;
        let flow_id = self.next_flow_id();
        let document = with_identity(body, &flow_id, 0);
        self.write(&flow_id, &document)?;
        debug!(flow_id, "flow created");
        Ok(document)
    }
}
