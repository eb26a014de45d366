//! Floating image loading.
//!
//! Loads happen on a worker thread and report back over a channel, so the
//! frame driver only ever sees a finished [`ImageEvent`] at the top of a tick.
//! There is no retry: a failed load is logged and the particle keeps drawing
//! its placeholder.

use std::fs;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::color::Rgba;
use crate::error::BackgroundError;

/// Timeout for fetching a remote image.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Refuse to buffer remote images larger than this.
const MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

/// A decoded RGBA image.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Sprite {
    /// Wrap raw pixels. `None` if the pixel count does not match the size.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize && !pixels.is_empty()).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, BackgroundError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        let pixels = decoded.pixels().map(|pixel| pixel.0).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest texel at normalised coordinates, `None` outside 0.0-1.0.
    pub fn sample(&self, u: f32, v: f32) -> Option<Rgba> {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        let [r, g, b, a] = self.pixels[(y * self.width + x) as usize];
        Some(Rgba::new(r, g, b, f32::from(a) / 255.0))
    }
}

/// Outcome of a load request.
#[derive(Debug, Clone)]
pub enum ImageEvent {
    /// The image is ready to draw.
    Loaded {
        /// Path or URL that was requested.
        source: String,
        /// The decoded image.
        sprite: Arc<Sprite>,
    },
    /// The image will never arrive.
    Failed {
        /// Path or URL that was requested.
        source: String,
        /// Why.
        reason: String,
    },
}

impl ImageEvent {
    /// The path or URL this event is about.
    pub fn source(&self) -> &str {
        match self {
            ImageEvent::Loaded { source, .. } | ImageEvent::Failed { source, .. } => source,
        }
    }
}

/// Fire-and-forget image loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader;

impl ImageLoader {
    /// Load `source` on a worker thread and post the outcome to `sender`.
    ///
    /// Returns `None` if the thread could not be spawned, in which case a
    /// `Failed` event has already been posted.
    pub fn request(source: impl Into<String>, sender: Sender<ImageEvent>) -> Option<JoinHandle<()>> {
        let source = source.into();
        let fallback = sender.clone();
        let name = source.clone();

        let spawned = thread::Builder::new()
            .name("image-loader".into())
            .spawn(move || {
                let event = match load(&source) {
                    Ok(sprite) => {
                        tracing::debug!(
                            "Loaded floating image {source} ({}x{})",
                            sprite.width(),
                            sprite.height()
                        );
                        ImageEvent::Loaded {
                            source,
                            sprite: Arc::new(sprite),
                        }
                    }
                    Err(error) => {
                        tracing::warn!("Failed to load image {source}: {error}");
                        ImageEvent::Failed {
                            source,
                            reason: error.to_string(),
                        }
                    }
                };
                // Nobody listening means the field was torn down first.
                let _ = sender.send(event);
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(error) => {
                tracing::warn!("Couldn't spawn image loader for {name}: {error}");
                let _ = fallback.send(ImageEvent::Failed {
                    source: name,
                    reason: error.to_string(),
                });
                None
            }
        }
    }
}

/// Load and decode an image from a file path or an `http(s)` URL, blocking.
pub fn load(source: &str) -> Result<Sprite, BackgroundError> {
    let bytes = if is_remote(source) {
        fetch(source)?
    } else {
        fs::read(source)?
    };
    Sprite::decode(&bytes)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch(url: &str) -> Result<Vec<u8>, BackgroundError> {
    let agent = ureq::Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .new_agent();

    let bytes = agent
        .get(url)
        .call()?
        .body_mut()
        .with_config()
        .limit(MAX_IMAGE_BYTES)
        .read_to_vec()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::mpsc;

    use super::*;

    fn png_bytes() -> Vec<u8> {
        let mut buffer = image::RgbaImage::new(2, 2);
        buffer.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        buffer.put_pixel(1, 1, image::Rgba([0, 0, 255, 128]));
        let mut bytes = Vec::new();
        buffer
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_and_sample() {
        let sprite = Sprite::decode(&png_bytes()).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (2, 2));
        assert_eq!(sprite.sample(0.1, 0.1), Some(Rgba::new(255, 0, 0, 1.0)));
        assert_eq!(sprite.sample(0.9, 0.9).map(|c| c.b), Some(255));
        assert_eq!(sprite.sample(1.0, 0.5), None);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let error = Sprite::decode(b"definitely not a png").unwrap_err();
        assert!(matches!(error, BackgroundError::Decode(_)));
    }

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(Sprite::from_rgba(2, 1, vec![[0; 4]; 2]).is_some());
        assert!(Sprite::from_rgba(2, 2, vec![[0; 4]; 2]).is_none());
        assert!(Sprite::from_rgba(0, 0, Vec::new()).is_none());
    }

    #[test]
    fn test_loader_posts_loaded_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.png");
        std::fs::write(&path, png_bytes()).unwrap();
        let source = path.to_string_lossy().into_owned();

        let (sender, receiver) = mpsc::channel();
        let handle = ImageLoader::request(source.clone(), sender).unwrap();
        handle.join().unwrap();

        match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
            ImageEvent::Loaded { source: loaded, sprite } => {
                assert_eq!(loaded, source);
                assert_eq!(sprite.width(), 2);
            }
            ImageEvent::Failed { reason, .. } => panic!("unexpected failure: {reason}"),
        }
    }

    #[test]
    fn test_loader_posts_failure_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("missing.png").to_string_lossy().into_owned();

        let (sender, receiver) = mpsc::channel();
        if let Some(handle) = ImageLoader::request(source.clone(), sender) {
            handle.join().unwrap();
        }

        let event = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(event, ImageEvent::Failed { .. }));
        assert_eq!(event.source(), source);
    }
}
