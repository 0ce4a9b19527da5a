//! Background image slot
//!
//! Decoding happens off the interaction path. The host starts a load, gets a
//! [`LoadTicket`], and hands the result back with that ticket. Results for a
//! superseded ticket are dropped, and a failed decode only affects this slot.

use image::RgbaImage;
use tracing::{debug, warn};

use sitekit_core::ImageError;

/// A decoded background bitmap. World coordinates are its pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pixels: RgbaImage,
}

impl BackgroundImage {
    /// Decodes any format the `image` crate recognizes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| ImageError::Decode {
            reason: e.to_string(),
        })?;
        Self::from_rgba(decoded.to_rgba8())
    }

    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, ImageError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ImageError::Empty);
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImageState {
    #[default]
    Empty,
    Loading(LoadTicket),
    Ready(BackgroundImage),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    state: ImageState,
    next_ticket: u64,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    pub fn image(&self) -> Option<&BackgroundImage> {
        match &self.state {
            ImageState::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ImageState::Loading(_))
    }

    /// Starts a new load, superseding any in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.state = ImageState::Loading(ticket);
        ticket
    }

    /// Stores a finished load. Returns `false` when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<BackgroundImage, ImageError>,
    ) -> bool {
        if self.state != ImageState::Loading(ticket) {
            debug!(?ticket, "dropping stale image load");
            return false;
        }
        self.state = match result {
            Ok(image) => {
                debug!(width = image.width(), height = image.height(), "background ready");
                ImageState::Ready(image)
            }
            Err(err) => {
                warn!(%err, "background image unavailable");
                ImageState::Failed(err.to_string())
            }
        };
        true
    }

    /// Decodes `bytes` and stores the result under `ticket`.
    pub fn complete_with_bytes(&mut self, ticket: LoadTicket, bytes: &[u8]) -> bool {
        self.complete(ticket, BackgroundImage::decode(bytes))
    }

    pub fn clear(&mut self) {
        self.state = ImageState::Empty;
    }
}
