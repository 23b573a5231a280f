//! End-to-end compositing scenarios.
//!
//! These tests drive a `TileCompositor` through its public API with an
//! in-memory HTTP client and check the resulting pixels:
//! - clipping to a mask, including holes and malformed features
//! - pass-through when no mask is set, and after the mask is cleared
//! - blank tiles for failed fetches
//! - filter changes reusing retained images and binding at draw time

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};
use tokio::sync::Notify;

use maskedtile::compositor::{CompositedTile, TileCompositor, TileState};
use maskedtile::config::CompositorConfig;
use maskedtile::coord::TileCoord;
use maskedtile::filter::{self, FilterState};
use maskedtile::mask::{ClipPathBuilder, LonLat, MaskGeometry, MaskPolygon};
use maskedtile::projection::{GeoProjector, WebMercator, WorldPoint};
use maskedtile::source::{AsyncHttpClient, SourceError, SourceTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

const TILE: TileCoord = TileCoord {
    zoom: 13,
    col: 3640,
    row: 1611,
};
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A source tile where every pixel differs from its neighbors.
fn source_image() -> RgbaImage {
    RgbaImage::from_fn(256, 256, |x, y| {
        Rgba([x as u8, y as u8, ((x * 3 + y * 7) % 251) as u8, 255])
    })
}

fn png(image: &RgbaImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// HTTP client serving one fixed response and counting calls.
#[derive(Clone)]
struct CountingClient {
    response: Result<Vec<u8>, SourceError>,
    calls: Arc<AtomicUsize>,
}

impl CountingClient {
    fn serving(image: &RgbaImage) -> Self {
        Self::responding(Ok(png(image)))
    }

    fn responding(response: Result<Vec<u8>, SourceError>) -> Self {
        Self {
            response,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for CountingClient {
    async fn get(&self, _url: &str) -> Result<Vec<u8>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// HTTP client whose first request blocks until released.
struct GatedClient {
    body: Vec<u8>,
    gate_first: AtomicBool,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl AsyncHttpClient for GatedClient {
    async fn get(&self, _url: &str) -> Result<Vec<u8>, SourceError> {
        if self.gate_first.swap(false, Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        Ok(self.body.clone())
    }
}

fn config() -> CompositorConfig {
    // Hard edges so every pixel is either in or out
    CompositorConfig::new().with_anti_alias(false)
}

fn template() -> SourceTemplate {
    SourceTemplate::new("https://tiles.example.org/{z}/{x}/{y}.png").unwrap()
}

async fn configured(client: CountingClient) -> TileCompositor<CountingClient> {
    let compositor = TileCompositor::new(client, config());
    compositor.configure(template()).await;
    compositor
}

fn mercator() -> Arc<dyn GeoProjector> {
    Arc::new(WebMercator::default())
}

/// Geographic ring for a rectangle given in pixels local to `TILE`.
fn tile_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<LonLat> {
    let projection = WebMercator::default();
    let (ox, oy) = TILE.world_origin(256);
    let at = |x: f64, y: f64| projection.unproject(WorldPoint::new(ox + x, oy + y), TILE.zoom);
    vec![at(x0, y0), at(x1, y0), at(x1, y1), at(x0, y1), at(x0, y0)]
}

fn assert_same_pixel(tile: &CompositedTile, expected: &RgbaImage, x: u32, y: u32) {
    assert_eq!(
        tile.pixel(x, y),
        *expected.get_pixel(x, y),
        "pixel ({}, {})",
        x,
        y
    );
}

// =============================================================================
// Clipping
// =============================================================================

#[tokio::test]
async fn test_left_half_mask_shows_left_half_only() {
    let source = source_image();
    let compositor = configured(CountingClient::serving(&source)).await;
    let mask = MaskGeometry::new(vec![MaskPolygon::new(tile_rect(-16.0, -16.0, 128.0, 272.0))]);
    compositor.set_mask(Some(Arc::new(mask)), Some(mercator())).await;

    let tile = compositor.request_tile(TILE).await;

    assert_eq!(tile.state(), TileState::Ready);
    assert_eq!(tile.size(), 256);
    for y in (0..256).step_by(5) {
        for x in 0..256 {
            if x < 128 {
                assert_same_pixel(&tile, &source, x, y);
            } else {
                assert_eq!(tile.pixel(x, y), TRANSPARENT, "pixel ({}, {})", x, y);
            }
        }
    }
}

#[tokio::test]
async fn test_hole_is_transparent_and_ring_shows_source() {
    let source = source_image();
    let compositor = configured(CountingClient::serving(&source)).await;
    let polygon = MaskPolygon::new(tile_rect(-20.0, -20.0, 276.0, 276.0))
        .with_hole(tile_rect(64.0, 64.0, 192.0, 192.0));
    compositor
        .set_mask(Some(Arc::new(MaskGeometry::new(vec![polygon]))), Some(mercator()))
        .await;

    let tile = compositor.request_tile(TILE).await;

    for &(x, y) in &[(100, 100), (128, 128), (70, 180)] {
        assert_eq!(tile.pixel(x, y), TRANSPARENT, "hole pixel ({}, {})", x, y);
    }
    for &(x, y) in &[(10, 10), (250, 128), (128, 30), (60, 200)] {
        assert_same_pixel(&tile, &source, x, y);
    }
}

#[tokio::test]
async fn test_malformed_feature_is_skipped() {
    let ring: Vec<[f64; 2]> = tile_rect(-16.0, -16.0, 128.0, 272.0)
        .into_iter()
        .map(|(lon, lat)| [lon, lat])
        .collect();
    let geojson = serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [ring]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": []}}
        ]
    })
    .to_string();
    let mask = MaskGeometry::from_geojson_str(&geojson).unwrap();
    assert_eq!(mask.polygons().len(), 1);
    assert_eq!(mask.skipped_features(), 1);

    let source = source_image();
    let compositor = configured(CountingClient::serving(&source)).await;
    compositor.set_mask(Some(Arc::new(mask)), Some(mercator())).await;
    let tile = compositor.request_tile(TILE).await;

    assert_eq!(tile.state(), TileState::Ready);
    assert_same_pixel(&tile, &source, 40, 40);
    assert_eq!(tile.pixel(200, 40), TRANSPARENT);
}

#[tokio::test]
async fn test_mask_outside_tile_makes_it_transparent() {
    let compositor = configured(CountingClient::serving(&source_image())).await;
    let far_away = MaskPolygon::new(vec![(2.0, 48.0), (2.5, 48.0), (2.5, 48.5), (2.0, 48.5)]);
    compositor
        .set_mask(Some(Arc::new(MaskGeometry::new(vec![far_away]))), Some(mercator()))
        .await;

    let tile = compositor.request_tile(TILE).await;

    assert_eq!(tile.state(), TileState::Ready);
    assert!(tile.is_fully_transparent());
}

#[tokio::test]
async fn test_default_config_keeps_pixels_inside_diagonal_edge() {
    let source = source_image();
    let compositor = TileCompositor::new(
        CountingClient::serving(&source),
        CompositorConfig::default(),
    );
    compositor.configure(template()).await;

    // Triangle whose hypotenuse runs along x + y = 290 in tile pixels
    let projection = WebMercator::default();
    let (ox, oy) = TILE.world_origin(256);
    let at = |x: f64, y: f64| projection.unproject(WorldPoint::new(ox + x, oy + y), TILE.zoom);
    let triangle = vec![at(-10.0, -10.0), at(300.0, -10.0), at(-10.0, 300.0), at(-10.0, -10.0)];
    let mask = MaskGeometry::new(vec![MaskPolygon::new(triangle)]);
    let clip = ClipPathBuilder::new(&projection, 256).build(&mask, TILE);
    compositor.set_mask(Some(Arc::new(mask)), Some(mercator())).await;

    let tile = compositor.request_tile(TILE).await;

    assert_eq!(tile.state(), TileState::Ready);
    for y in 0..256u32 {
        for x in 0..256u32 {
            if clip.contains(f64::from(x) + 0.5, f64::from(y) + 0.5) {
                assert_same_pixel(&tile, &source, x, y);
            } else if x + y >= 292 {
                assert_eq!(tile.pixel(x, y), TRANSPARENT, "pixel ({}, {})", x, y);
            }
        }
    }
}

// =============================================================================
// Pass-through
// =============================================================================

#[tokio::test]
async fn test_no_mask_equals_filtered_source() {
    let source = source_image();
    let compositor = configured(CountingClient::serving(&source)).await;
    let state = FilterState::new(200.0, 0.4, 1.3);
    compositor.set_filter(state).await;

    let tile = compositor.request_tile(TILE).await;

    let mut expected = source.clone();
    filter::apply_image(&mut expected, state);
    assert_eq!(tile.image(), &expected);
}

#[tokio::test]
async fn test_mask_without_projector_is_pass_through() {
    let source = source_image();
    let compositor = configured(CountingClient::serving(&source)).await;
    let mask = MaskGeometry::new(vec![MaskPolygon::new(tile_rect(0.0, 0.0, 10.0, 10.0))]);
    compositor.set_mask(Some(Arc::new(mask)), None).await;

    let tile = compositor.request_tile(TILE).await;
    assert_eq!(tile.image(), &source);
}

#[tokio::test]
async fn test_clearing_mask_restores_unmasked_output() {
    let source = source_image();
    let compositor = configured(CountingClient::serving(&source)).await;
    compositor.set_filter(FilterState::new(45.0, 1.2, 0.9)).await;
    let unmasked = compositor.request_tile(TILE).await;

    let mask = MaskGeometry::new(vec![MaskPolygon::new(tile_rect(0.0, 0.0, 100.0, 100.0))]);
    let masked = compositor.set_mask(Some(Arc::new(mask)), Some(mercator())).await;
    assert_eq!(masked[0].pixel(200, 200), TRANSPARENT);

    let restored = compositor.set_mask(None, None).await;

    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].as_bytes(), unmasked.as_bytes());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_not_found_yields_blank_tile() {
    let client = CountingClient::responding(Err(SourceError::HttpStatus {
        status: 404,
        url: "https://tiles.example.org/13/3640/1611.png".to_string(),
    }));
    let compositor = configured(client).await;

    let tile = compositor.request_tile(TILE).await;

    assert!(tile.is_blank());
    assert_eq!(tile.coord(), TILE);
    assert_eq!(tile.as_bytes().len(), 256 * 256 * 4);
    assert!(tile.is_fully_transparent());
    assert_eq!(compositor.stats().blank, 1);
}

#[tokio::test]
async fn test_failed_tile_is_refetched_on_filter_change() {
    let client = CountingClient::responding(Err(SourceError::HttpError("connection reset".into())));
    let compositor = configured(client.clone()).await;
    compositor.request_tile(TILE).await;

    let tiles = compositor.set_filter(FilterState::new(30.0, 1.0, 1.0)).await;

    assert!(tiles[0].is_blank());
    assert_eq!(client.calls(), 2);
}

// =============================================================================
// Filter changes
// =============================================================================

#[tokio::test]
async fn test_same_filter_twice_is_bit_identical() {
    let compositor = configured(CountingClient::serving(&source_image())).await;
    let mask = MaskGeometry::new(vec![MaskPolygon::new(tile_rect(20.0, 20.0, 230.0, 140.0))]);
    compositor.set_mask(Some(Arc::new(mask)), Some(mercator())).await;
    compositor.request_tile(TILE).await;

    let state = FilterState::new(-75.0, 0.6, 1.1);
    let first = compositor.set_filter(state).await;
    let second = compositor.set_filter(state).await;

    assert_eq!(first[0].as_bytes(), second[0].as_bytes());
    assert!(second[0].config_version() > first[0].config_version());
}

#[tokio::test]
async fn test_filter_change_reuses_retained_image() {
    let client = CountingClient::serving(&source_image());
    let compositor = configured(client.clone()).await;
    compositor.request_tile(TILE).await;
    compositor.request_tile(TileCoord::new(13, 3641, 1611)).await;
    assert_eq!(client.calls(), 2);

    let tiles = compositor.set_filter(FilterState::new(90.0, 1.0, 1.0)).await;

    assert_eq!(tiles.len(), 2);
    assert_eq!(client.calls(), 2);
    let stats = compositor.stats();
    assert_eq!(stats.fast_path, 2);
    assert_eq!(stats.recompositions, 2);
    assert_eq!(stats.fetches, 2);
}

#[tokio::test]
async fn test_filter_change_during_fetch_applies_to_result() {
    let source = source_image();
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let client = GatedClient {
        body: png(&source),
        gate_first: AtomicBool::new(true),
        started: Arc::clone(&started),
        release: Arc::clone(&release),
    };
    let compositor = Arc::new(TileCompositor::new(client, config()));
    compositor.configure(template()).await;

    let in_flight = {
        let compositor = Arc::clone(&compositor);
        tokio::spawn(async move { compositor.request_tile(TILE).await })
    };
    started.notified().await;

    let state = FilterState::new(120.0, 1.0, 1.0);
    compositor.set_filter(state).await;
    release.notify_one();
    let tile = in_flight.await.unwrap();

    assert_eq!(tile.config_version(), compositor.version());
    for &(x, y) in &[(0, 0), (17, 99), (255, 255)] {
        assert_eq!(tile.pixel(x, y), filter::apply(*source.get_pixel(x, y), state));
    }
}

// =============================================================================
// Sources
// =============================================================================

#[tokio::test]
async fn test_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let tile_dir = dir.path().join("13").join("3640");
    std::fs::create_dir_all(&tile_dir).unwrap();
    let source = source_image();
    std::fs::write(tile_dir.join("1611.png"), png(&source)).unwrap();

    let client = CountingClient::responding(Ok(Vec::new()));
    let compositor = TileCompositor::new(client.clone(), config());
    let template = format!("file://{}/{{z}}/{{x}}/{{y}}.png", dir.path().display());
    compositor.configure(SourceTemplate::new(template).unwrap()).await;

    let tile = compositor.request_tile(TILE).await;
    let missing = compositor.request_tile(TileCoord::new(13, 3640, 1612)).await;

    assert_eq!(tile.image(), &source);
    assert!(missing.is_blank());
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_opacity_is_left_to_the_host() {
    let source = source_image();
    let compositor = configured(CountingClient::serving(&source)).await;
    compositor.set_opacity(0.5);

    let tile = compositor.request_tile(TILE).await;
    assert_eq!(tile.image(), &source);

    let baked = tile.with_opacity(compositor.opacity());
    assert_eq!(baked.pixel(10, 10)[3], 128);
}
