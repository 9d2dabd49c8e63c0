//! The decoded image value and its transforms.
//!
//! An [`Image`] owns its pixel buffer. Every transform borrows the source and
//! returns a new `Image` with its own buffer, carrying over the source format
//! and a copy of its metadata. The one in-place operation is
//! [`Image::stamp`], which needs `&mut self` and so can never alias a borrowed
//! source.
//!
//! Transforms return `Result<Image>` where they can fail, so they chain with
//! `?`:
//!
//! ```no_run
//! # use imgpipe::imaging::{Image, ResizeOptions, SaveOptions};
//! # fn run() -> imgpipe::Result<()> {
//! let thumb = Image::open("photo.jpg")?
//!     .resize(&ResizeOptions::width(400))?
//!     .crop(&ResizeOptions::new(300, 300))?;
//! thumb.save("thumb.{ext}", &SaveOptions::format("png"))?;
//! # Ok(())
//! # }
//! ```

use super::calculations::plan_resize;
use super::format::Format;
use super::metadata::Metadata;
use super::orientation::{self, Rotation};
use super::params::{Method, Placement, ResizeOptions};
use super::watermark;
use crate::error::{Error, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::borrow::Cow;
use std::fmt;

#[derive(Clone, PartialEq)]
pub struct Image {
    pixels: RgbaImage,
    format: Option<Format>,
    metadata: Option<Metadata>,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("format", &self.format)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl Image {
    /// Wrap a decoded buffer. Fails on a zero-sized buffer.
    pub fn from_pixels(pixels: RgbaImage) -> Result<Image> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Image {
            pixels,
            format: None,
            metadata: None,
        })
    }

    /// Fully transparent canvas.
    pub(crate) fn canvas(width: u32, height: u32) -> RgbaImage {
        RgbaImage::new(width.max(1), height.max(1))
    }

    /// New image from `pixels` with this image's format and a copy of its
    /// metadata.
    fn derive(&self, pixels: RgbaImage) -> Image {
        Image {
            pixels,
            format: self.format,
            metadata: self.metadata.clone(),
        }
    }

    pub fn with_format(self, format: Format) -> Image {
        Image {
            format: Some(format),
            ..self
        }
    }

    pub fn with_metadata(self, metadata: Option<Metadata>) -> Image {
        Image { metadata, ..self }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Format detected at decode time or set explicitly.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn orientation(&self) -> Option<u16> {
        self.metadata.as_ref().and_then(|m| m.orientation)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Scale to the requested bounds.
    ///
    /// With [`Method::Fit`] the whole image is kept and the result fits inside
    /// the bounds; with [`Method::Crop`] the result has exactly the requested
    /// size (capped at the source size) and the source is centre-cropped to
    /// that aspect ratio first. Neither ever upscales.
    pub fn resize(&self, options: &ResizeOptions) -> Result<Image> {
        let (width, height) = options.bounds()?;
        let plan = plan_resize(self.dimensions(), width, height, options.method)
            .ok_or(Error::DimensionsRequired)?;
        let (src, target) = (plan.source, plan.target);

        let region =
            imageops::crop_imm(&self.pixels, src.x, src.y, src.width, src.height).to_image();
        let scaled = if region.dimensions() == (target.width, target.height) {
            region
        } else {
            let filter = if options.resample {
                FilterType::Lanczos3
            } else {
                FilterType::Nearest
            };
            imageops::resize(&region, target.width, target.height, filter)
        };

        let mut canvas = Self::canvas(target.width, target.height);
        imageops::overlay(&mut canvas, &scaled, 0, 0);

        tracing::debug!(
            method = ?options.method,
            from = ?self.dimensions(),
            to = ?canvas.dimensions(),
            "resized"
        );
        Ok(self.derive(canvas))
    }

    /// [`resize`](Self::resize) with the method forced to crop. `options` is
    /// not modified.
    pub fn crop(&self, options: &ResizeOptions) -> Result<Image> {
        self.resize(&options.with_method(Method::Crop))
    }

    /// Rotate upright according to the orientation tag.
    ///
    /// Returns the image itself, borrowed, when there is no tag or it is
    /// already `1`. Otherwise returns a rotated copy whose orientation tag is
    /// reset to `1`, so a second call is a no-op. Mirrored orientations fail
    /// with [`Error::UnsupportedOrientation`].
    pub fn auto_orient(&self) -> Result<Cow<'_, Image>> {
        let Some(tag) = self.orientation() else {
            return Ok(Cow::Borrowed(self));
        };
        let rotation = Rotation::for_tag(tag)?;
        if rotation == Rotation::None {
            return Ok(Cow::Borrowed(self));
        }

        let rotated = orientation::rotate(&self.pixels, rotation);
        let mut canvas = Self::canvas(rotated.width(), rotated.height());
        imageops::overlay(&mut canvas, &rotated, 0, 0);

        tracing::debug!(tag, degrees = rotation.degrees(), "auto-oriented");
        Ok(Cow::Owned(Image {
            pixels: canvas,
            format: self.format,
            metadata: self.metadata.as_ref().map(Metadata::upright),
        }))
    }

    /// Owned variant of [`auto_orient`](Self::auto_orient) that hands back
    /// `self` when nothing needs rotating.
    pub fn into_oriented(self) -> Result<Image> {
        let rotated = match self.auto_orient()? {
            Cow::Owned(rotated) => Some(rotated),
            Cow::Borrowed(_) => None,
        };
        Ok(rotated.unwrap_or(self))
    }

    /// Composite `mark` onto a copy of this image.
    pub fn watermark(&self, mark: &Image, placement: &Placement) -> Image {
        self.derive(watermark::composite(&self.pixels, &mark.pixels, placement))
    }

    /// Composite `mark` onto this image in place.
    pub fn stamp(&mut self, mark: &Image, placement: &Placement) {
        watermark::stamp(&mut self.pixels, &mark.pixels, placement);
    }

    /// Average perceptual brightness of the opaque pixels (0–255).
    pub fn brightness(&self) -> f64 {
        watermark::brightness(&self.pixels)
    }
}
