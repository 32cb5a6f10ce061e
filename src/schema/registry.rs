//! Hot-reloadable descriptor registry.
//!
//! # Responsibilities
//! - Discover and compile the `.proto` set under the configured root
//! - Publish message/enum lookup maps as one immutable generation
//! - Reload atomically: any failure keeps the previous generation visible
//! - Manage schema files on disk for the management surface
//!
//! # Concurrency
//! Many concurrent readers (one per in-flight proxy request touching the
//! structured-message codec), a single writer during the generation swap.
//! Compilation runs outside the lock, so readers are only blocked for the
//! duration of the swap itself.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, SystemTime};

use prost_reflect::{EnumDescriptor, FileDescriptor, MessageDescriptor};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::SchemaError;
use crate::schema::{dynamic, walk};

/// Maximum directory depth for schema discovery.
const MAX_WALK_DEPTH: usize = 10;

/// File extension accepted as a schema definition.
pub const SCHEMA_SUFFIX: &str = ".proto";

/// One successfully loaded schema set. Immutable once published.
struct Generation {
    messages: HashMap<String, MessageDescriptor>,
    enums: HashMap<String, EnumDescriptor>,
    files: Vec<FileDescriptor>,
    loaded_at: SystemTime,
}

/// Concurrent store of type descriptors parsed from `.proto` files.
///
/// Constructed once at startup and shared by reference with the proxy
/// pipeline and the management handlers; there is no global instance.
pub struct SchemaRegistry {
    import_root: PathBuf,
    schema_folder: String,
    state: RwLock<Option<Generation>>,
}

impl SchemaRegistry {
    pub fn new(import_root: impl Into<PathBuf>, schema_folder: impl Into<String>) -> Self {
        Self {
            import_root: import_root.into(),
            schema_folder: schema_folder.into(),
            state: RwLock::new(None),
        }
    }

    /// Directory that holds the schema files.
    pub fn schema_dir(&self) -> PathBuf {
        self.import_root.join(&self.schema_folder)
    }

    /// Discover, compile and atomically publish the full schema set.
    ///
    /// All-or-nothing: on any error the previously loaded generation (if
    /// any) remains untouched and visible to readers.
    ///
    /// Each file is compiled on its own against the import root, so a type
    /// defined in more than one file resolves to the definition in the
    /// last file in traversal order.
    pub fn load(&self) -> Result<(), SchemaError> {
        let dir = self.schema_dir();
        let discovered = walk::discover(&dir, SCHEMA_SUFFIX, MAX_WALK_DEPTH)?;
        if discovered.is_empty() {
            return Err(SchemaError::NoSchemaFiles(dir));
        }

        // protox resolves imports against the import root, so hand it paths
        // relative to that root, like protoc would take them.
        let relative: Vec<PathBuf> = discovered
            .iter()
            .map(|p| {
                p.strip_prefix(&self.import_root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| p.clone())
            })
            .collect();

        let mut messages = HashMap::new();
        let mut enums = HashMap::new();
        let mut files = Vec::new();
        for path in &relative {
            let pool = dynamic::compile(&self.import_root, std::slice::from_ref(path))?;
            // Each pool also carries transitive imports; only the
            // discovered file contributes to the lookup maps and the
            // introspection list.
            let name = path.to_string_lossy();
            let Some(file) = pool.get_file_by_name(&name) else {
                continue;
            };
            for message in file.messages() {
                messages.insert(message.full_name().to_string(), message);
            }
            for enumeration in file.enums() {
                enums.insert(enumeration.full_name().to_string(), enumeration);
            }
            files.push(file);
        }

        tracing::info!(
            files = ?relative,
            messages = messages.len(),
            enums = enums.len(),
            "loaded proto schema set"
        );

        let generation = Generation {
            messages,
            enums,
            files,
            loaded_at: SystemTime::now(),
        };
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Some(generation);
        Ok(())
    }

    /// Look up a message descriptor by fully-qualified name.
    pub fn get_message_descriptor(&self, name: &str) -> Result<MessageDescriptor, SchemaError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .as_ref()
            .and_then(|g| g.messages.get(name))
            .cloned()
            .ok_or_else(|| SchemaError::MessageNotFound(name.to_string()))
    }

    /// Look up an enum descriptor by fully-qualified name.
    pub fn get_enum_descriptor(&self, name: &str) -> Result<EnumDescriptor, SchemaError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .as_ref()
            .and_then(|g| g.enums.get(name))
            .cloned()
            .ok_or_else(|| SchemaError::EnumNotFound(name.to_string()))
    }

    /// Snapshot of the currently loaded file descriptors.
    pub fn file_descriptors(&self) -> Vec<FileDescriptor> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.as_ref().map(|g| g.files.clone()).unwrap_or_default()
    }

    /// Timestamp of the last successful load, if any.
    pub fn last_load_time(&self) -> Option<SystemTime> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.as_ref().map(|g| g.loaded_at)
    }

    /// Write a schema file into the schema folder (overwriting an existing
    /// one) and reload. On reload failure the file stays on disk but the
    /// previous good generation remains visible.
    pub fn add_file(&self, name: &str, content: &[u8]) -> Result<(), SchemaError> {
        let path = self.schema_file_path(name)?;
        fs::write(&path, content)?;
        tracing::info!(file = %path.display(), "schema file written");
        self.load()
    }

    /// Delete a schema file without reloading.
    pub fn delete_file(&self, name: &str) -> Result<(), SchemaError> {
        let path = self.schema_file_path(name)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SchemaError::FileNotFound(name.to_string()),
            _ => SchemaError::Io(e),
        })
    }

    /// Read a schema file's raw contents without touching registry state.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, SchemaError> {
        let path = self.schema_file_path(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SchemaError::FileNotFound(name.to_string()),
            _ => SchemaError::Io(e),
        })
    }

    /// Spawn the periodic reload task. Returns `None` when the interval is
    /// zero (auto-reload disabled). The task logs failures and keeps
    /// serving the stale-but-valid generation; it stops on shutdown.
    pub fn spawn_auto_reload(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Option<JoinHandle<()>> {
        if interval.is_zero() {
            return None;
        }
        let registry = Arc::clone(self);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately; skip the first tick since startup
            // already performed a load
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = registry.load() {
                            tracing::error!(error = %err, "periodic schema reload failed");
                        }
                    }
                    _ = shutdown.recv() => {
                        tracing::info!("schema auto-reload stopped");
                        break;
                    }
                }
            }
        }))
    }

    /// Resolve a bare schema file name inside the schema folder, rejecting
    /// anything that could escape it.
    fn schema_file_path(&self, name: &str) -> Result<PathBuf, SchemaError> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(SchemaError::InvalidFileName(name.to_string()));
        }
        Ok(self.schema_dir().join(name))
    }
}
