// SPDX-License-Identifier: MPL-2.0
//! Existence probing by attempted load.
//!
//! There is no directory listing available for a statically hosted asset
//! folder, so existence is detected the way a browser would: by attempting
//! to actually load the resource. A photo exists if it decodes; a video
//! exists if its container metadata can be read. The [`ExistenceProber`]
//! trait keeps this technique behind a seam so a server-capable deployment
//! can swap in a real existence query ([`HttpProber`]) without touching the
//! resolver or builder.
//!
//! Successful decodes are retained in a byte-bounded LRU cache so that the
//! display layer can reuse what the probe already fetched instead of
//! loading the asset a second time.

use crate::error::{Error, Result};
use crate::media::{classify_kind, DecodedImage, MediaKind, VideoProperties};
use image_rs::GenericImageView;
use lru::LruCache;
use resvg::usvg;
use std::fs;
use std::future::Future;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, PoisonError};

/// Default probe cache size in bytes (32 MB).
pub const DEFAULT_PROBE_CACHE_BYTES: usize = 32 * 1024 * 1024;

/// Minimum probe cache size in bytes (8 MB).
pub const MIN_PROBE_CACHE_BYTES: usize = 8 * 1024 * 1024;

/// Maximum probe cache size in bytes (128 MB).
pub const MAX_PROBE_CACHE_BYTES: usize = 128 * 1024 * 1024;

/// Maximum number of probed assets kept regardless of byte budget.
const PROBE_CACHE_MAX_ENTRIES: usize = 64;

/// Port for asynchronous existence checks.
///
/// `probe` resolves `true` when a loadable asset of the given kind exists at
/// `location`, `false` otherwise. A location whose kind cannot be classified
/// resolves `false`. No retries: a single failed attempt is definitive
/// absence for that location.
pub trait ExistenceProber {
    fn probe(&self, location: &str, kind: MediaKind) -> impl Future<Output = bool> + Send;
}

// =============================================================================
// Probe cache
// =============================================================================

#[derive(Debug, Clone)]
enum ProbedAsset {
    Image(DecodedImage),
    Video(VideoProperties),
}

impl ProbedAsset {
    fn cost(&self) -> usize {
        match self {
            ProbedAsset::Image(image) => image.byte_len(),
            ProbedAsset::Video(_) => std::mem::size_of::<VideoProperties>(),
        }
    }
}

/// LRU cache of successfully probed assets, bounded by a byte budget.
struct ProbeCache {
    entries: LruCache<String, ProbedAsset>,
    max_bytes: usize,
    current_bytes: usize,
}

impl ProbeCache {
    fn new(max_bytes: usize) -> Self {
        let capacity =
            NonZeroUsize::new(PROBE_CACHE_MAX_ENTRIES).expect("cache capacity is non-zero");
        Self {
            entries: LruCache::new(capacity),
            max_bytes: max_bytes.clamp(MIN_PROBE_CACHE_BYTES, MAX_PROBE_CACHE_BYTES),
            current_bytes: 0,
        }
    }

    fn insert(&mut self, location: String, asset: ProbedAsset) {
        let cost = asset.cost();
        if cost > self.max_bytes {
            return;
        }
        if let Some(previous) = self.entries.pop(&location) {
            self.current_bytes -= previous.cost();
        }
        while self.current_bytes + cost > self.max_bytes {
            match self.entries.pop_lru() {
                Some((_, evicted)) => self.current_bytes -= evicted.cost(),
                None => break,
            }
        }
        self.current_bytes += cost;
        self.entries.put(location, asset);
    }

    fn get(&mut self, location: &str) -> Option<&ProbedAsset> {
        self.entries.get(location)
    }
}

// =============================================================================
// Decode prober
// =============================================================================

/// Determines existence by attempting a real decode on the blocking pool.
///
/// This mirrors how a client page detects assets: the fetch is a byproduct
/// of the check, so the decoded result is cached for display reuse via
/// [`cached_image`](Self::cached_image) / [`cached_video`](Self::cached_video).
pub struct DecodeProber {
    cache: Mutex<ProbeCache>,
}

impl DecodeProber {
    /// Creates a prober with the default cache budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache_bytes(DEFAULT_PROBE_CACHE_BYTES)
    }

    /// Creates a prober with a specific cache budget, clamped to the valid
    /// range.
    #[must_use]
    pub fn with_cache_bytes(max_bytes: usize) -> Self {
        Self {
            cache: Mutex::new(ProbeCache::new(max_bytes)),
        }
    }

    /// Returns the decoded image a previous probe fetched, if still cached.
    ///
    /// The clone is cheap: pixel data is behind an `Arc`.
    #[must_use]
    pub fn cached_image(&self, location: &str) -> Option<DecodedImage> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        match cache.get(location) {
            Some(ProbedAsset::Image(image)) => Some(image.clone()),
            _ => None,
        }
    }

    /// Returns the video properties a previous probe read, if still cached.
    #[must_use]
    pub fn cached_video(&self, location: &str) -> Option<VideoProperties> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        match cache.get(location) {
            Some(ProbedAsset::Video(properties)) => Some(properties.clone()),
            _ => None,
        }
    }

    fn remember(&self, location: &str, asset: ProbedAsset) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.insert(location.to_string(), asset);
    }

    async fn probe_photo(&self, location: &str) -> bool {
        let path = PathBuf::from(location);
        match tokio::task::spawn_blocking(move || decode_image(&path)).await {
            Ok(Ok(image)) => {
                self.remember(location, ProbedAsset::Image(image));
                true
            }
            _ => false,
        }
    }

    async fn probe_video(&self, location: &str) -> bool {
        let path = PathBuf::from(location);
        match tokio::task::spawn_blocking(move || read_video_properties(&path)).await {
            Ok(Ok(properties)) => {
                self.remember(location, ProbedAsset::Video(properties));
                true
            }
            _ => false,
        }
    }
}

impl Default for DecodeProber {
    fn default() -> Self {
        Self::new()
    }
}

impl ExistenceProber for DecodeProber {
    async fn probe(&self, location: &str, kind: MediaKind) -> bool {
        if classify_kind(location).is_none() {
            return false;
        }
        match kind {
            MediaKind::Photo => self.probe_photo(location).await,
            MediaKind::Video => self.probe_video(location).await,
        }
    }
}

// =============================================================================
// HTTP prober
// =============================================================================

/// Determines existence with a HEAD request instead of a full decode.
///
/// The drop-in replacement for [`DecodeProber`] when the assets live behind
/// an HTTP server: same contract, no download. When the server reports a
/// content type, it must match the probed kind's family (`image/` or
/// `video/`); a missing header falls back to trusting the extension.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Creates a prober reusing an existing client (connection pooling,
    /// custom timeouts).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl ExistenceProber for HttpProber {
    async fn probe(&self, location: &str, kind: MediaKind) -> bool {
        if classify_kind(location).is_none() {
            return false;
        }
        let response = match self.client.head(location).send().await {
            Ok(response) => response,
            Err(_) => return false,
        };
        if !response.status().is_success() {
            return false;
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        match content_type {
            Some(content_type) => {
                let family = match kind {
                    MediaKind::Photo => "image/",
                    MediaKind::Video => "video/",
                };
                content_type.starts_with(family)
            }
            None => true,
        }
    }
}

// =============================================================================
// Decode helpers
// =============================================================================

/// Static flag to ensure FFmpeg is initialized only once.
static FFMPEG_INIT: Once = Once::new();

/// Initialize FFmpeg with appropriate log level.
///
/// Safe to call multiple times; initialization happens once. The log level
/// is set to ERROR so probe attempts on absent or partial files don't spam
/// warnings.
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(Error::Decode(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Decodes an image file fully, returning its pixels.
///
/// Raster formats go through the image crate; SVG is parsed and rasterized
/// with resvg. Any failure means the probe reports absence.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Decode`]
/// if the data does not decode as an image.
pub fn decode_image(path: &Path) -> Result<DecodedImage> {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    if extension.eq_ignore_ascii_case("svg") {
        let svg_data = fs::read(path)?;
        let tree = usvg::Tree::from_data(&svg_data, &usvg::Options::default())
            .map_err(|e| Error::Decode(e.to_string()))?;

        let pixmap_size = tree.size().to_int_size();
        let width = pixmap_size.width();
        let height = pixmap_size.height();
        if width == 0 || height == 0 {
            return Err(Error::Decode("SVG has empty dimensions".into()));
        }

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| Error::Decode("Failed to allocate SVG pixmap".into()))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(DecodedImage::from_rgba(width, height, pixmap.data().to_vec()))
    } else {
        let img_bytes = fs::read(path)?;
        let img =
            image_rs::load_from_memory(&img_bytes).map_err(|e| Error::Decode(e.to_string()))?;
        let (width, height) = img.dimensions();

        Ok(DecodedImage::from_rgba(width, height, img.to_rgba8().into_vec()))
    }
}

/// Reads container metadata (dimensions, duration, FPS, audio presence)
/// without decoding frames.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be opened as a media
/// container, has no video stream, or reports invalid dimensions.
pub fn read_video_properties(path: &Path) -> Result<VideoProperties> {
    init_ffmpeg()?;

    let ictx = ffmpeg_next::format::input(&path)
        .map_err(|e| Error::Decode(format!("Failed to open video file: {e}")))?;

    let video_stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or_else(|| Error::Decode("No video stream found".to_string()))?;

    let context_decoder =
        ffmpeg_next::codec::context::Context::from_parameters(video_stream.parameters())
            .map_err(|e| Error::Decode(format!("Failed to create codec context: {e}")))?;
    let decoder = context_decoder
        .decoder()
        .video()
        .map_err(|e| Error::Decode(format!("Failed to create video decoder: {e}")))?;

    let width = decoder.width();
    let height = decoder.height();
    if width == 0 || height == 0 {
        return Err(Error::Decode(format!(
            "Invalid video dimensions: {width}x{height} (possibly unsupported format)"
        )));
    }

    // Duration from the stream time base, falling back to the container
    let duration_secs = if video_stream.duration() > 0 {
        let time_base = video_stream.time_base();
        video_stream.duration() as f64 * f64::from(time_base.numerator())
            / f64::from(time_base.denominator())
    } else if ictx.duration() > 0 {
        ictx.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        0.0
    };

    let fps = {
        let frame_rate = video_stream.avg_frame_rate();
        f64::from(frame_rate.numerator()) / f64::from(frame_rate.denominator())
    };

    let has_audio = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Audio)
        .is_some();

    Ok(VideoProperties {
        width,
        height,
        duration_secs,
        fps,
        has_audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let image = RgbImage::from_pixel(width, height, Rgb([255, 0, 0]));
        image.save(&path).expect("failed to write temporary image");
        path
    }

    #[test]
    fn decode_png_returns_expected_dimensions() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = write_image(temp_dir.path(), "sample.png", 4, 2);

        let image = decode_image(&image_path).expect("png should decode");
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
    }

    #[test]
    fn decode_svg_rasterizes_successfully() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let svg_path = temp_dir.path().join("sample.svg");
        let svg_content = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="6" height="3">
                <rect width="6" height="3" fill="blue" />
            </svg>
        "#;
        fs::write(&svg_path, svg_content.trim()).expect("failed to write svg");

        let image = decode_image(&svg_path).expect("svg should decode");
        assert_eq!(image.width(), 6);
        assert_eq!(image.height(), 3);
    }

    #[test]
    fn decode_missing_image_returns_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let missing_path = temp_dir.path().join("does_not_exist.png");

        match decode_image(&missing_path) {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn decode_invalid_png_bytes_returns_decode_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let bad_path = temp_dir.path().join("invalid.png");
        fs::write(&bad_path, b"not a png").expect("failed to write invalid data");

        match decode_image(&bad_path) {
            Err(Error::Decode(message)) => assert!(!message.is_empty()),
            other => panic!("expected Decode error for invalid png, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_existing_photo_resolves_true() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = write_image(temp_dir.path(), "photo_1.jpg", 2, 2);

        let prober = DecodeProber::new();
        let location = image_path.to_string_lossy().into_owned();
        assert!(prober.probe(&location, MediaKind::Photo).await);
    }

    #[tokio::test]
    async fn probe_missing_photo_resolves_false() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let location = temp_dir
            .path()
            .join("photo_2.jpg")
            .to_string_lossy()
            .into_owned();

        let prober = DecodeProber::new();
        assert!(!prober.probe(&location, MediaKind::Photo).await);
    }

    #[tokio::test]
    async fn probe_unclassifiable_location_resolves_false() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, b"hello").expect("failed to write file");

        let prober = DecodeProber::new();
        let location = path.to_string_lossy().into_owned();
        assert!(!prober.probe(&location, MediaKind::Photo).await);
        assert!(!prober.probe(&location, MediaKind::Video).await);
    }

    #[tokio::test]
    async fn probe_garbage_video_resolves_false() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("video_1.mp4");
        fs::write(&path, b"definitely not a video container").expect("failed to write file");

        let prober = DecodeProber::new();
        let location = path.to_string_lossy().into_owned();
        assert!(!prober.probe(&location, MediaKind::Video).await);
    }

    #[tokio::test]
    async fn successful_probe_populates_cache_for_reuse() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = write_image(temp_dir.path(), "photo_1.png", 3, 3);
        let location = image_path.to_string_lossy().into_owned();

        let prober = DecodeProber::new();
        assert!(prober.cached_image(&location).is_none());

        assert!(prober.probe(&location, MediaKind::Photo).await);
        let cached = prober.cached_image(&location).expect("probe should cache");
        assert_eq!(cached.width(), 3);
        assert_eq!(cached.height(), 3);
    }

    #[tokio::test]
    async fn failed_probe_does_not_populate_cache() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let location = temp_dir
            .path()
            .join("absent.png")
            .to_string_lossy()
            .into_owned();

        let prober = DecodeProber::new();
        assert!(!prober.probe(&location, MediaKind::Photo).await);
        assert!(prober.cached_image(&location).is_none());
    }

    #[tokio::test]
    async fn http_prober_rejects_unclassifiable_location_without_network() {
        let prober = HttpProber::new();
        assert!(!prober.probe("https://example.com/file.txt", MediaKind::Photo).await);
    }

    #[tokio::test]
    async fn http_prober_rejects_unreachable_host() {
        let prober = HttpProber::new();
        // Invalid URL: send() fails before any network traffic
        assert!(!prober.probe("not a url.jpg", MediaKind::Photo).await);
    }

    #[test]
    fn probe_cache_evicts_by_byte_budget() {
        let mut cache = ProbeCache::new(MIN_PROBE_CACHE_BYTES);
        // Three entries of ~4 MB each against an 8 MB budget: inserting the
        // third must evict the least recently used first entry.
        let big = || ProbedAsset::Image(DecodedImage::from_rgba(1024, 1024, vec![0u8; 1024 * 1024 * 4]));
        cache.insert("a".to_string(), big());
        cache.insert("b".to_string(), big());
        cache.insert("c".to_string(), big());

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn probe_cache_replaces_existing_entry_without_double_counting() {
        let mut cache = ProbeCache::new(MIN_PROBE_CACHE_BYTES);
        let small = || ProbedAsset::Image(DecodedImage::from_rgba(8, 8, vec![0u8; 8 * 8 * 4]));
        cache.insert("a".to_string(), small());
        cache.insert("a".to_string(), small());

        assert_eq!(cache.current_bytes, 8 * 8 * 4);
    }

    #[test]
    fn video_properties_cache_roundtrip() {
        let prober = DecodeProber::new();
        prober.remember(
            "clip.mp4",
            ProbedAsset::Video(VideoProperties {
                width: 1920,
                height: 1080,
                duration_secs: 12.5,
                fps: 30.0,
                has_audio: true,
            }),
        );

        let cached = prober.cached_video("clip.mp4").expect("cached video");
        assert_eq!(cached.width, 1920);
        assert!(cached.has_audio);
        assert!(prober.cached_image("clip.mp4").is_none());
    }
}
