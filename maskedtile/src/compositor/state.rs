//! Versioned layer configuration.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::filter::FilterState;
use crate::mask::MaskGeometry;
use crate::projection::GeoProjector;
use crate::source::SourceTemplate;

/// Immutable view of a layer's configuration at one version.
#[derive(Debug, Clone)]
pub struct LayerSnapshot {
    /// Bumped on every replacement of any field
    pub version: u64,
    /// Version at which the source was last replaced
    pub source_version: u64,
    pub source: Option<SourceTemplate>,
    pub filter: FilterState,
    pub mask: Option<Arc<MaskGeometry>>,
    pub projector: Option<Arc<dyn GeoProjector>>,
    pub opacity: f64,
}

impl LayerSnapshot {
    /// True when tiles show the source without clipping.
    pub fn is_pass_through(&self) -> bool {
        self.mask.is_none() || self.projector.is_none()
    }
}

impl Default for LayerSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            source_version: 0,
            source: None,
            filter: FilterState::identity(),
            mask: None,
            projector: None,
            opacity: 1.0,
        }
    }
}

/// Single cell holding the current [`LayerSnapshot`].
///
/// Readers get an `Arc` and never hold the lock across an await. Writers
/// replace the snapshot wholesale under the write lock.
#[derive(Debug, Default)]
pub(crate) struct ConfigCell {
    current: RwLock<Arc<LayerSnapshot>>,
}

impl ConfigCell {
    pub(crate) fn load(&self) -> Arc<LayerSnapshot> {
        Arc::clone(&*self.current.read())
    }

    /// Applies `change` to a copy of the current snapshot and publishes it
    /// under the next version.
    pub(crate) fn update(&self, change: impl FnOnce(&mut LayerSnapshot)) -> Arc<LayerSnapshot> {
        let mut current = self.current.write();
        let mut next = LayerSnapshot::clone(&**current);
        change(&mut next);
        next.version = current.version + 1;
        let next = Arc::new(next);
        *current = Arc::clone(&next);
        next
    }

    /// Like [`update`](Self::update), also marking the source as replaced.
    pub(crate) fn update_source(&self, source: Option<SourceTemplate>) -> Arc<LayerSnapshot> {
        let mut current = self.current.write();
        let mut next = LayerSnapshot::clone(&**current);
        next.version = current.version + 1;
        next.source_version = next.version;
        next.source = source;
        let next = Arc::new(next);
        *current = Arc::clone(&next);
        next
    }
}
