//! Runs an effect one frame at a time.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, Sender},
};
use std::thread;
use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::effect::Effect;
use crate::image::{ImageEvent, ImageLoader};
use crate::surface::Surface;
use folio_core::Viewport;

/// Shared stop flag for a [`FrameDriver`].
///
/// Cancelling is immediate: the next tick, from any clone, returns
/// [`Tick::Cancelled`] without touching the effect.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a call to [`FrameDriver::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The driver was cancelled; nothing happened.
    Cancelled,
    /// No surface to draw on; nothing happened.
    NoSurface,
    /// The viewport has zero area; retried next tick.
    Skipped,
    /// One frame was simulated and drawn.
    Drawn,
}

/// Owns one effect and everything needed to animate it.
pub struct FrameDriver {
    effect: Box<dyn Effect>,
    rng: StdRng,
    viewport: Viewport,
    rebuild_pending: bool,
    clear_pending: bool,
    paused: bool,
    cancel: CancelToken,
    images: Receiver<ImageEvent>,
    image_sender: Sender<ImageEvent>,
}

impl FrameDriver {
    /// Wrap `effect`. A `seed` makes every rebuild reproducible.
    ///
    /// If the effect wants an image, loading starts straight away on a
    /// worker thread.
    pub fn new(effect: Box<dyn Effect>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (image_sender, images) = mpsc::channel();
        if let Some(source) = effect.image_source() {
            // The worker runs detached; its result arrives on the channel.
            let _ = ImageLoader::request(source, image_sender.clone());
        }
        Self {
            effect,
            rng,
            viewport: Viewport::default(),
            rebuild_pending: true,
            clear_pending: true,
            paused: false,
            cancel: CancelToken::new(),
            images,
            image_sender,
        }
    }

    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// A handle that stops this driver.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Somewhere to post image results, e.g. from a custom loader.
    pub fn image_sender(&self) -> Sender<ImageEvent> {
        self.image_sender.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze or resume the simulation. Frames are still drawn.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Take on a new size, discarding every particle.
    ///
    /// The store is rebuilt immediately unless the viewport has zero area,
    /// in which case the rebuild waits for a usable size.
    pub fn resize(&mut self, viewport: Viewport) {
        debug!(
            width = viewport.width,
            height = viewport.height,
            effect = self.effect.kind().name(),
            "resize"
        );
        self.viewport = viewport;
        self.rebuild_pending = true;
        self.clear_pending = true;
        self.rebuild_if_pending();
    }

    /// Throw the current field away and start a fresh one at the same size.
    pub fn regenerate(&mut self) {
        self.resize(self.viewport);
    }

    fn rebuild_if_pending(&mut self) {
        if self.rebuild_pending && !self.viewport.is_empty() {
            self.effect.rebuild(self.viewport, &mut self.rng);
            self.rebuild_pending = false;
        }
    }

    /// Run one frame.
    ///
    /// Follows the surface's size: a different size counts as a resize.
    pub fn tick(&mut self, surface: Option<&mut dyn Surface>) -> Tick {
        if self.cancel.is_cancelled() {
            trace!("tick after cancel");
            return Tick::Cancelled;
        }
        let Some(surface) = surface else {
            return Tick::NoSurface;
        };

        let size = surface.size();
        if size != self.viewport {
            self.resize(size);
        }
        if self.viewport.is_empty() {
            return Tick::Skipped;
        }

        while let Ok(event) = self.images.try_recv() {
            self.effect.on_image(&event);
        }
        self.rebuild_if_pending();
        if self.clear_pending {
            surface.clear();
            self.clear_pending = false;
        }
        if !self.paused {
            self.effect.step(self.viewport, &mut self.rng);
        }
        self.effect.draw(surface, self.viewport);
        Tick::Drawn
    }

    /// Tick every `interval` until cancelled, handing each drawn frame to
    /// `present`. Returns the number of frames drawn.
    pub fn run<S: Surface>(
        &mut self,
        surface: &mut S,
        interval: Duration,
        mut present: impl FnMut(&S),
    ) -> usize {
        let mut frames = 0;
        loop {
            let started = Instant::now();
            match self.tick(Some(&mut *surface)) {
                Tick::Cancelled => break,
                Tick::Drawn => {
                    frames += 1;
                    present(surface);
                }
                Tick::NoSurface | Tick::Skipped => {}
            }
            thread::sleep(interval.saturating_sub(started.elapsed()));
        }
        debug!(frames, "frame loop stopped");
        frames
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
