//! The per-layer tile compositor.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use image::RgbaImage;

use super::error::CompositeError;
use super::pipeline;
use super::request::{CompositionRequest, TileState};
use super::state::{ConfigCell, LayerSnapshot};
use super::stats::{CompositorStats, CompositorStatsSnapshot};
use super::tile::CompositedTile;
use crate::config::CompositorConfig;
use crate::coord::TileCoord;
use crate::filter::{ColorFilter, FilterState};
use crate::log::{Logger, NoOpLogger};
use crate::mask::{build_clip_path, MaskGeometry};
use crate::projection::GeoProjector;
use crate::source::{
    decode_tile, AsyncHttpClient, AsyncReqwestClient, SourceError, SourceFetcher, SourceTemplate,
};
use crate::{log_debug, log_trace, log_warn};

/// A decoded source image kept for fast recomposition.
#[derive(Debug)]
struct DecodedSource {
    source_version: u64,
    image: RgbaImage,
}

/// Composites masked, color-filtered tiles for one map layer.
///
/// The compositor owns the layer's configuration (source, filter, mask,
/// opacity) and the set of tiles the host currently displays. Changing the
/// source, filter or mask recomposites every tracked tile and returns the
/// new tiles for the host to swap in.
///
/// Every valid tile passed to [`request_tile`](Self::request_tile) is tracked and
/// keeps its decoded source image in memory until the host calls
/// [`untrack`](Self::untrack). Hosts must untrack tiles when they unload
/// them, otherwise every later reconfiguration recomposites all tiles ever
/// requested, across every zoom level.
///
/// # Example
///
/// ```ignore
/// use maskedtile::compositor::TileCompositor;
/// use maskedtile::config::CompositorConfig;
/// use maskedtile::coord::TileCoord;
/// use maskedtile::source::SourceTemplate;
///
/// let compositor = TileCompositor::with_http(CompositorConfig::default())?;
/// compositor
///     .configure(SourceTemplate::new("https://tile.example.org/{z}/{x}/{y}.png")?)
///     .await;
/// let tile = compositor.request_tile(TileCoord::new(13, 3640, 1611)).await;
/// ```
pub struct TileCompositor<C> {
    fetcher: SourceFetcher<C>,
    config: CompositorConfig,
    cell: ConfigCell,
    tracked: DashMap<TileCoord, Option<Arc<DecodedSource>>>,
    stats: CompositorStats,
    logger: Arc<dyn Logger>,
}

impl TileCompositor<AsyncReqwestClient> {
    /// Creates a compositor fetching over HTTP with the configured timeout.
    pub fn with_http(config: CompositorConfig) -> Result<Self, SourceError> {
        let client = AsyncReqwestClient::with_timeout(config.timeout_secs())?;
        Ok(Self::new(client, config))
    }
}

impl<C: AsyncHttpClient> TileCompositor<C> {
    pub fn new(client: C, config: CompositorConfig) -> Self {
        Self {
            fetcher: SourceFetcher::new(client),
            config,
            cell: ConfigCell::default(),
            tracked: DashMap::new(),
            stats: CompositorStats::new(),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Routes diagnostics to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn tile_size(&self) -> u32 {
        self.config.tile_size()
    }

    /// The current configuration.
    pub fn snapshot(&self) -> Arc<LayerSnapshot> {
        self.cell.load()
    }

    pub fn version(&self) -> u64 {
        self.cell.load().version
    }

    pub fn filter(&self) -> FilterState {
        self.cell.load().filter
    }

    pub fn opacity(&self) -> f64 {
        self.cell.load().opacity
    }

    pub fn stats(&self) -> CompositorStatsSnapshot {
        self.stats.snapshot()
    }

    // ---------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------

    /// Replaces the raster source.
    ///
    /// Retained images belong to the old source, so every tracked tile is
    /// fetched again.
    pub async fn configure(&self, source: SourceTemplate) -> Vec<CompositedTile> {
        log_debug!(self.logger, "Source set to {}", source);
        self.cell.update_source(Some(source));
        self.release_retained();
        self.recomposite_tracked().await
    }

    /// Replaces the raster source with a URL template, using the configured
    /// subdomains for `{s}`.
    pub async fn set_url(&self, url: &str) -> Result<Vec<CompositedTile>, SourceError> {
        let template = SourceTemplate::with_subdomains(url, self.config.subdomains().to_vec())?;
        Ok(self.configure(template).await)
    }

    /// Replaces the color filter.
    ///
    /// Tracked tiles with a retained image are recomposited without
    /// fetching.
    pub async fn set_filter(&self, filter: FilterState) -> Vec<CompositedTile> {
        log_debug!(self.logger, "Filter set to {}", filter);
        self.cell.update(|s| s.filter = filter);
        self.recomposite_tracked().await
    }

    /// Replaces the mask and the projector used to place it.
    ///
    /// With either absent, tiles show the filtered source unclipped.
    pub async fn set_mask(
        &self,
        mask: Option<Arc<MaskGeometry>>,
        projector: Option<Arc<dyn GeoProjector>>,
    ) -> Vec<CompositedTile> {
        self.store_mask(mask, projector);
        self.recomposite_tracked().await
    }

    /// Removes the mask.
    pub async fn clear_mask(&self) -> Vec<CompositedTile> {
        self.set_mask(None, None).await
    }

    pub(crate) fn store_mask(
        &self,
        mask: Option<Arc<MaskGeometry>>,
        projector: Option<Arc<dyn GeoProjector>>,
    ) {
        match &mask {
            Some(geometry) => log_debug!(
                self.logger,
                "Mask set: {} polygons, {} rings",
                geometry.polygons().len(),
                geometry.ring_count()
            ),
            None => log_debug!(self.logger, "Mask cleared"),
        }
        self.cell.update(|s| {
            s.mask = mask;
            s.projector = projector;
        });
    }

    /// Stores the layer opacity. Tiles are not recomposited; the host
    /// applies opacity when displaying them.
    pub fn set_opacity(&self, opacity: f64) {
        self.cell.update(|s| s.opacity = opacity);
    }

    // ---------------------------------------------------------------------
    // Tracking
    // ---------------------------------------------------------------------

    /// Marks `coord` as displayed. Returns false if it already was.
    pub fn track(&self, coord: TileCoord) -> bool {
        let mut inserted = false;
        self.tracked.entry(coord).or_insert_with(|| {
            inserted = true;
            None
        });
        inserted
    }

    /// Stops tracking `coord` and drops its retained image.
    pub fn untrack(&self, coord: TileCoord) -> bool {
        self.tracked.remove(&coord).is_some()
    }

    pub fn is_tracked(&self, coord: TileCoord) -> bool {
        self.tracked.contains_key(&coord)
    }

    /// Tracked tiles in coordinate order.
    pub fn tracked(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.tracked.iter().map(|e| *e.key()).collect();
        coords.sort();
        coords
    }

    /// True if a decoded image for `coord` is retained for the current source.
    pub fn has_retained(&self, coord: TileCoord) -> bool {
        let source_version = self.cell.load().source_version;
        self.tracked
            .get(&coord)
            .and_then(|entry| entry.value().as_ref().map(|d| d.source_version == source_version))
            .unwrap_or(false)
    }

    fn release_retained(&self) {
        self.tracked.iter_mut().for_each(|mut entry| *entry.value_mut() = None);
    }

    // ---------------------------------------------------------------------
    // Composition
    // ---------------------------------------------------------------------

    /// Composites the tile at `coord`.
    ///
    /// Never fails: any fetch or decode problem, or a coordinate outside
    /// the tile pyramid, yields a blank tile. Valid tiles become tracked and
    /// stay tracked until [`untrack`](Self::untrack) is called.
    pub async fn request_tile(&self, coord: TileCoord) -> CompositedTile {
        self.stats.record_request();
        if !coord.is_valid() {
            log_warn!(self.logger, "Tile {} is outside the tile pyramid", coord);
            return self.blank(coord, TileState::Pending);
        }
        self.track(coord);
        let request = CompositionRequest::new(coord, &self.cell.load());
        self.compose(request, None).await
    }

    async fn recomposite_tracked(&self) -> Vec<CompositedTile> {
        let snapshot = self.cell.load();
        let mut jobs: Vec<(TileCoord, Option<Arc<DecodedSource>>)> = self
            .tracked
            .iter()
            .map(|entry| {
                let retained = entry
                    .value()
                    .as_ref()
                    .filter(|d| d.source_version == snapshot.source_version)
                    .cloned();
                (*entry.key(), retained)
            })
            .collect();
        jobs.sort_by_key(|(coord, _)| *coord);

        if !jobs.is_empty() {
            log_debug!(
                self.logger,
                "Recompositing {} tracked tiles at version {}",
                jobs.len(),
                snapshot.version
            );
        }

        let tiles = jobs.into_iter().map(|(coord, retained)| {
            self.stats.record_recomposition();
            self.compose(CompositionRequest::new(coord, &snapshot), retained)
        });
        join_all(tiles).await
    }

    async fn compose(
        &self,
        request: CompositionRequest,
        retained: Option<Arc<DecodedSource>>,
    ) -> CompositedTile {
        let coord = request.coord();
        log_trace!(self.logger, "Tile {}: {}", coord, TileState::Pending);

        let decoded = match retained {
            Some(decoded) => {
                self.stats.record_fast_path();
                decoded
            }
            None => match self.load(&request).await {
                Ok(image) => Arc::new(DecodedSource {
                    source_version: request.source_version(),
                    image,
                }),
                Err(e) => {
                    log_warn!(self.logger, "Tile {} failed to load: {}", coord, e);
                    return self.blank(coord, TileState::Pending);
                }
            },
        };

        self.transition(coord, TileState::Pending, TileState::Loaded);

        // Mask and filter are bound now, not when the request was issued
        let snapshot = self.cell.load();
        self.retain(coord, &decoded, &snapshot);

        let clip = build_clip_path(
            snapshot.mask.as_deref(),
            snapshot.projector.as_deref(),
            coord,
            self.tile_size(),
        );
        if clip.skipped_rings() > 0 {
            log_debug!(
                self.logger,
                "Tile {}: skipped {} malformed mask rings",
                coord,
                clip.skipped_rings()
            );
        }
        self.transition(coord, TileState::Loaded, TileState::Clipped);

        let filter = ColorFilter::new(snapshot.filter);
        match pipeline::composite(&decoded.image, &clip, &filter, self.config.anti_alias()) {
            Ok(image) => {
                self.transition(coord, TileState::Clipped, TileState::Filtered);
                self.transition(coord, TileState::Filtered, TileState::Ready);
                self.stats.record_ready();
                CompositedTile::ready(coord, image, snapshot.version)
            }
            Err(e) => {
                log_warn!(self.logger, "Tile {} failed to composite: {}", coord, e);
                self.blank(coord, TileState::Clipped)
            }
        }
    }

    async fn load(&self, request: &CompositionRequest) -> Result<RgbaImage, CompositeError> {
        let source = request.source().ok_or(SourceError::NoSource)?;
        let location = source.locate(request.coord());
        log_trace!(self.logger, "Tile {}: fetching {}", request.coord(), location);

        self.stats.record_fetch();
        let bytes = self.fetcher.fetch(&location).await?;
        Ok(decode_tile(&bytes, self.tile_size())?)
    }

    /// Keeps `decoded` for later recomposition if the tile is still tracked
    /// and the source has not changed since it was fetched.
    fn retain(&self, coord: TileCoord, decoded: &Arc<DecodedSource>, snapshot: &LayerSnapshot) {
        if decoded.source_version != snapshot.source_version {
            return;
        }
        if let Some(mut entry) = self.tracked.get_mut(&coord) {
            *entry.value_mut() = Some(Arc::clone(decoded));
        }
    }

    fn blank(&self, coord: TileCoord, from: TileState) -> CompositedTile {
        self.transition(coord, from, TileState::Failed);
        self.transition(coord, TileState::Failed, TileState::Blank);
        self.stats.record_blank();
        CompositedTile::blank(coord, self.tile_size(), self.cell.load().version)
    }

    fn transition(&self, coord: TileCoord, from: TileState, to: TileState) {
        debug_assert!(from.can_transition_to(to), "{} -> {}", from, to);
        log_trace!(self.logger, "Tile {}: {} -> {}", coord, from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, MemoryLogger};
    use crate::mask::MaskPolygon;
    use crate::projection::WorldPoint;
    use crate::source::http::tests::MockAsyncHttpClient;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    /// Treats `(lon, lat)` as world pixels.
    #[derive(Debug)]
    struct PixelProjector;

    impl GeoProjector for PixelProjector {
        fn project(&self, lon: f64, lat: f64, _zoom: u8) -> WorldPoint {
            WorldPoint::new(lon, lat)
        }
    }

    const SIZE: u32 = 16;
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn png(size: u32, color: Rgba<u8>) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::from_pixel(size, size, color)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn compositor(
        response: Result<Vec<u8>, SourceError>,
    ) -> (TileCompositor<MockAsyncHttpClient>, MockAsyncHttpClient) {
        let client = MockAsyncHttpClient::new(response);
        let config = CompositorConfig::new().with_tile_size(SIZE).with_anti_alias(false);
        (TileCompositor::new(client.clone(), config), client)
    }

    fn template() -> SourceTemplate {
        SourceTemplate::new("https://tile.example.org/{z}/{x}/{y}.png").unwrap()
    }

    #[tokio::test]
    async fn test_request_without_source_is_blank() {
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        let tile = compositor.request_tile(TileCoord::new(0, 0, 0)).await;

        assert!(tile.is_blank());
        assert_eq!(tile.size(), SIZE);
        assert_eq!(client.call_count(), 0);
        assert!(compositor.is_tracked(TileCoord::new(0, 0, 0)));
    }

    #[tokio::test]
    async fn test_request_pass_through() {
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        compositor.configure(template()).await;

        let tile = compositor.request_tile(TileCoord::new(3, 2, 1)).await;

        assert_eq!(tile.state(), TileState::Ready);
        assert!(tile.image().pixels().all(|p| *p == RED));
        assert_eq!(
            client.last_url.lock().unwrap().as_deref(),
            Some("https://tile.example.org/3/2/1.png")
        );
        assert!(compositor.has_retained(TileCoord::new(3, 2, 1)));
    }

    #[tokio::test]
    async fn test_failed_fetch_logs_and_blanks() {
        let logger = Arc::new(MemoryLogger::new());
        let (compositor, _) = compositor(Err(SourceError::HttpStatus {
            status: 404,
            url: "https://tile.example.org/1/0/0.png".to_string(),
        }));
        let compositor = compositor.with_logger(logger.clone());
        compositor.configure(template()).await;

        let tile = compositor.request_tile(TileCoord::new(1, 0, 0)).await;

        assert!(tile.is_blank());
        assert!(tile.is_fully_transparent());
        assert!(logger.contains(LogLevel::Warn, "HTTP 404"));
        assert!(logger.contains(LogLevel::Trace, "FAILED -> BLANK"));
        assert_eq!(compositor.stats().blank, 1);
    }

    #[tokio::test]
    async fn test_set_filter_uses_retained_image() {
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        compositor.configure(template()).await;
        compositor.request_tile(TileCoord::new(2, 1, 1)).await;
        assert_eq!(client.call_count(), 1);

        let tiles = compositor.set_filter(FilterState::new(120.0, 1.0, 1.0)).await;

        assert_eq!(client.call_count(), 1);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].pixel(0, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(compositor.stats().fast_path, 1);
    }

    #[tokio::test]
    async fn test_configure_refetches_tracked_tiles() {
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        compositor.configure(template()).await;
        compositor.request_tile(TileCoord::new(2, 1, 1)).await;
        compositor.request_tile(TileCoord::new(2, 2, 1)).await;

        let tiles = compositor
            .configure(SourceTemplate::new("https://other.example.org/{z}/{x}/{y}.png").unwrap())
            .await;

        assert_eq!(tiles.len(), 2);
        assert_eq!(client.call_count(), 4);
        assert_eq!(tiles[0].coord(), TileCoord::new(2, 1, 1));
        assert!(client.last_url.lock().unwrap().as_deref().unwrap().starts_with("https://other."));
    }

    #[tokio::test]
    async fn test_set_url_uses_configured_subdomains() {
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        compositor.set_url("https://{s}.example.org/{z}/{x}/{y}.png").await.unwrap();
        compositor.request_tile(TileCoord::new(1, 1, 0)).await;

        assert_eq!(
            client.last_url.lock().unwrap().as_deref(),
            Some("https://b.example.org/1/1/0.png")
        );
    }

    #[tokio::test]
    async fn test_mask_clips_and_clears() {
        let (compositor, _) = compositor(Ok(png(SIZE, RED)));
        compositor.configure(template()).await;
        let coord = TileCoord::new(0, 0, 0);
        compositor.request_tile(coord).await;

        let mask = MaskGeometry::new(vec![MaskPolygon::new(vec![
            (0.0, 0.0),
            (8.0, 0.0),
            (8.0, 16.0),
            (0.0, 16.0),
        ])]);
        let tiles = compositor
            .set_mask(Some(Arc::new(mask)), Some(Arc::new(PixelProjector)))
            .await;
        assert_eq!(tiles[0].pixel(3, 8), RED);
        assert_eq!(tiles[0].pixel(12, 8), Rgba([0, 0, 0, 0]));

        let tiles = compositor.clear_mask().await;
        assert!(tiles[0].image().pixels().all(|p| *p == RED));
    }

    #[tokio::test]
    async fn test_set_opacity_does_not_recomposite() {
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        compositor.configure(template()).await;
        compositor.request_tile(TileCoord::new(1, 0, 0)).await;
        let version = compositor.version();

        compositor.set_opacity(0.3);

        assert_eq!(compositor.opacity(), 0.3);
        assert_eq!(compositor.version(), version + 1);
        assert_eq!(client.call_count(), 1);
        assert_eq!(compositor.stats().recompositions, 0);
    }

    #[tokio::test]
    async fn test_untrack_releases_and_stops_recomposition() {
        let (compositor, _) = compositor(Ok(png(SIZE, RED)));
        compositor.configure(template()).await;
        let coord = TileCoord::new(1, 1, 1);
        compositor.request_tile(coord).await;

        assert!(compositor.untrack(coord));
        assert!(!compositor.untrack(coord));
        assert!(!compositor.has_retained(coord));
        assert!(compositor.set_filter(FilterState::new(10.0, 1.0, 1.0)).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_coord_is_blank_and_untracked() {
        let logger = Arc::new(MemoryLogger::new());
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        let compositor = compositor.with_logger(logger.clone());
        compositor.configure(template()).await;

        for coord in [TileCoord::new(64, 0, 0), TileCoord::new(3, 8, 0)] {
            let tile = compositor.request_tile(coord).await;
            assert!(tile.is_blank());
            assert_eq!(tile.size(), SIZE);
            assert!(!compositor.is_tracked(coord));
        }

        assert_eq!(client.call_count(), 0);
        assert!(logger.contains(LogLevel::Warn, "64/0/0"));
        assert_eq!(compositor.stats().blank, 2);
    }

    #[tokio::test]
    async fn test_requested_tiles_stay_tracked_until_untracked() {
        let (compositor, client) = compositor(Ok(png(SIZE, RED)));
        compositor.configure(template()).await;
        for zoom in 0..3 {
            compositor.request_tile(TileCoord::new(zoom, 0, 0)).await;
        }
        assert_eq!(compositor.set_filter(FilterState::new(30.0, 1.0, 1.0)).await.len(), 3);

        compositor.untrack(TileCoord::new(0, 0, 0));
        compositor.untrack(TileCoord::new(1, 0, 0));
        let updated = compositor.set_filter(FilterState::new(60.0, 1.0, 1.0)).await;
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].coord(), TileCoord::new(2, 0, 0));
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn test_track_is_idempotent() {
        let (compositor, _) = compositor(Ok(Vec::new()));
        assert!(compositor.track(TileCoord::new(1, 1, 0)));
        assert!(!compositor.track(TileCoord::new(1, 1, 0)));
        compositor.track(TileCoord::new(1, 0, 0));
        assert_eq!(
            compositor.tracked(),
            vec![TileCoord::new(1, 0, 0), TileCoord::new(1, 1, 0)]
        );
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_blank() {
        let (compositor, _) = compositor(Ok(b"<html>quota exceeded</html>".to_vec()));
        compositor.configure(template()).await;
        let tile = compositor.request_tile(TileCoord::new(4, 3, 2)).await;
        assert!(tile.is_blank());
        assert!(!compositor.has_retained(TileCoord::new(4, 3, 2)));
    }
}
