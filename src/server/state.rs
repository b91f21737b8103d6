use std::sync::Arc;

use crate::backup::BackupLauncher;
use crate::cache::CacheStore;
use crate::client::ResourceClient;
use crate::events::EventRecorder;
use crate::instance::InstanceIdentity;

/// Collaborators shared by every request.
///
/// Nothing here is mutated by the handlers; each field is safe to use from
/// many requests at once.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub client: Arc<dyn ResourceClient>,
    pub recorder: Arc<dyn EventRecorder>,
    pub launcher: Arc<dyn BackupLauncher>,
    pub instance: InstanceIdentity,
}
