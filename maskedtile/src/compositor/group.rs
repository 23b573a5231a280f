//! Named layers sharing one mask.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;

use super::error::CompositeError;
use super::tile::CompositedTile;
use super::tile_compositor::TileCompositor;
use crate::coord::TileCoord;
use crate::filter::FilterState;
use crate::mask::MaskGeometry;
use crate::projection::GeoProjector;
use crate::source::{AsyncHttpClient, SourceTemplate};

type SharedMask = (Option<Arc<MaskGeometry>>, Option<Arc<dyn GeoProjector>>);

/// An ordered set of named layers clipped to the same mask.
///
/// Typical use is several thematic base layers restricted to one municipal
/// boundary: changing the boundary updates every layer, while source,
/// filter and opacity stay per layer.
pub struct LayerGroup<C> {
    layers: Vec<(String, TileCompositor<C>)>,
    mask: RwLock<SharedMask>,
}

/// Tiles recomposited in one layer after a group-wide change.
#[derive(Debug)]
pub struct LayerUpdate {
    pub layer: String,
    pub tiles: Vec<CompositedTile>,
}

impl<C: AsyncHttpClient> LayerGroup<C> {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            mask: RwLock::new((None, None)),
        }
    }

    /// Adds a layer. It immediately takes on the group's current mask.
    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        compositor: TileCompositor<C>,
    ) -> Result<(), CompositeError> {
        let name = name.into();
        if self.layer(&name).is_some() {
            return Err(CompositeError::DuplicateLayer(name));
        }
        let (mask, projector) = self.mask.read().clone();
        if mask.is_some() || projector.is_some() {
            compositor.store_mask(mask, projector);
        }
        self.layers.push((name, compositor));
        Ok(())
    }

    /// Removes a layer and returns its compositor.
    pub fn remove_layer(&mut self, name: &str) -> Option<TileCompositor<C>> {
        let index = self.layers.iter().position(|(n, _)| n == name)?;
        Some(self.layers.remove(index).1)
    }

    pub fn layer(&self, name: &str) -> Option<&TileCompositor<C>> {
        self.layers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, compositor)| compositor)
    }

    /// Layer names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Replaces the mask of every layer.
    pub async fn set_mask(
        &self,
        mask: Option<Arc<MaskGeometry>>,
        projector: Option<Arc<dyn GeoProjector>>,
    ) -> Vec<LayerUpdate> {
        *self.mask.write() = (mask.clone(), projector.clone());

        let updates = self.layers.iter().map(|(name, compositor)| {
            let mask = mask.clone();
            let projector = projector.clone();
            async move {
                LayerUpdate {
                    layer: name.clone(),
                    tiles: compositor.set_mask(mask, projector).await,
                }
            }
        });
        join_all(updates).await
    }

    /// Removes the mask from every layer.
    pub async fn clear_mask(&self) -> Vec<LayerUpdate> {
        self.set_mask(None, None).await
    }

    pub async fn configure(
        &self,
        name: &str,
        source: SourceTemplate,
    ) -> Result<Vec<CompositedTile>, CompositeError> {
        Ok(self.require(name)?.configure(source).await)
    }

    pub async fn set_filter(
        &self,
        name: &str,
        filter: FilterState,
    ) -> Result<Vec<CompositedTile>, CompositeError> {
        Ok(self.require(name)?.set_filter(filter).await)
    }

    pub fn set_opacity(&self, name: &str, opacity: f64) -> Result<(), CompositeError> {
        self.require(name)?.set_opacity(opacity);
        Ok(())
    }

    pub async fn request_tile(
        &self,
        name: &str,
        coord: TileCoord,
    ) -> Result<CompositedTile, CompositeError> {
        Ok(self.require(name)?.request_tile(coord).await)
    }

    fn require(&self, name: &str) -> Result<&TileCompositor<C>, CompositeError> {
        self.layer(name)
            .ok_or_else(|| CompositeError::UnknownLayer(name.to_string()))
    }
}

impl<C: AsyncHttpClient> Default for LayerGroup<C> {
    fn default() -> Self {
        Self::new()
    }
}
