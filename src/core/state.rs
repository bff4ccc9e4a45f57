use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::exporter::DocumentExporter;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    exporter: Arc<dyn DocumentExporter>,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool, exporter: Arc<dyn DocumentExporter>) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, exporter }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn exporter(&self) -> &Arc<dyn DocumentExporter> {
        &self.inner.exporter
    }
}
