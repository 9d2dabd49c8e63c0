//! Describe-then-execute transform pipelines.
//!
//! A [`Transform`] is an ordered list of [`Operation`]s built up front and
//! run in one go against a source: the input is read completely, decoded,
//! passed through each operation in order, and encoded with whatever save
//! settings the list accumulated.
//!
//! ```no_run
//! # use imgpipe::{RustCodec, Source, Target, Transform};
//! # use imgpipe::imaging::{Format, Point, ResizeOptions};
//! # async fn run() -> imgpipe::Result<()> {
//! let corners = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
//! Transform::new()
//!     .resize(ResizeOptions::width(800))
//!     .watermark("logo.png", corners)
//!     .format(Format::Jpeg)
//!     .quality(85)
//!     .run_async(&RustCodec::new(), Source::stdin(), Target::stdout())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::imaging::operations::{decode, encode, open, open_async, save};
use crate::imaging::{
    Codec, Compression, Format, Image, OpenOptions, Placement, Quality, ResizeOptions, SaveOptions,
};
use crate::io::{Saved, Source, Target};

/// Where a pipeline watermark comes from.
#[derive(Debug)]
pub enum Mark {
    Image(Box<Image>),
    /// Opened with default options when the pipeline runs.
    Source(Source),
}

impl Mark {
    fn load(self, codec: &impl Codec) -> Result<Image> {
        match self {
            Mark::Image(image) => Ok(*image),
            Mark::Source(source) => open(codec, source, &OpenOptions::default()),
        }
    }

    async fn load_async(self, codec: &impl Codec) -> Result<Image> {
        match self {
            Mark::Image(image) => Ok(*image),
            Mark::Source(source) => open_async(codec, source, &OpenOptions::default()).await,
        }
    }
}

impl From<Image> for Mark {
    fn from(image: Image) -> Self {
        Mark::Image(Box::new(image))
    }
}

impl From<Source> for Mark {
    fn from(source: Source) -> Self {
        Mark::Source(source)
    }
}

impl From<&str> for Mark {
    fn from(path: &str) -> Self {
        Mark::Source(Source::from(path))
    }
}

/// One step of a pipeline.
#[derive(Debug)]
pub enum Operation {
    AutoOrient,
    Resize(ResizeOptions),
    Crop(ResizeOptions),
    Watermark { mark: Mark, placement: Placement },
    Format(Format),
    Quality(Quality),
    Compression(Compression),
    /// Merged over the save settings collected so far.
    Options(SaveOptions),
}

#[derive(Debug, Default)]
pub struct Transform {
    open: OpenOptions,
    operations: Vec<Operation>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_options(mut self, options: OpenOptions) -> Self {
        self.open = options;
        self
    }

    pub fn push(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn auto_orient(self) -> Self {
        self.push(Operation::AutoOrient)
    }

    pub fn resize(self, options: ResizeOptions) -> Self {
        self.push(Operation::Resize(options))
    }

    pub fn crop(self, options: ResizeOptions) -> Self {
        self.push(Operation::Crop(options))
    }

    pub fn watermark(self, mark: impl Into<Mark>, placement: impl Into<Placement>) -> Self {
        self.push(Operation::Watermark {
            mark: mark.into(),
            placement: placement.into(),
        })
    }

    pub fn format(self, format: Format) -> Self {
        self.push(Operation::Format(format))
    }

    pub fn quality(self, quality: u8) -> Self {
        self.push(Operation::Quality(Quality::new(quality)))
    }

    pub fn compression(self, compression: u8) -> Self {
        self.push(Operation::Compression(Compression::new(compression)))
    }

    pub fn options(self, options: SaveOptions) -> Self {
        self.push(Operation::Options(options))
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Run against an in-memory buffer and return the encoded result.
    pub fn apply(self, codec: &impl Codec, input: &[u8]) -> Result<Vec<u8>> {
        let (image, settings) = self.execute(codec, input)?;
        encode(codec, &image, None, &settings).map(|(_, bytes)| bytes)
    }

    /// Read `source`, run, and write to `target`. Streams are refused.
    pub fn run(
        self,
        codec: &impl Codec,
        source: impl Into<Source>,
        target: impl Into<Target>,
    ) -> Result<Saved> {
        let target = target.into();
        if target.is_stream() {
            return Err(Error::SynchronousStreamAccess);
        }
        let input = source.into().read()?;
        let (image, settings) = self.execute(codec, &input)?;
        save(codec, &image, target, &settings)
    }

    pub async fn run_async(
        self,
        codec: &impl Codec,
        source: impl Into<Source>,
        target: impl Into<Target>,
    ) -> Result<Saved> {
        let target = target.into();
        let input = source.into().read_async().await?;
        let mut image = decode(codec, &input, &self.open)?;
        let mut settings = SaveOptions::default();

        for operation in self.operations {
            // Open watermark sources here so `step` never blocks
            let operation = match operation {
                Operation::Watermark { mark, placement } => Operation::Watermark {
                    mark: Mark::from(mark.load_async(codec).await?),
                    placement,
                },
                other => other,
            };
            image = step(codec, image, operation, &mut settings)?;
        }

        let (format, bytes) = encode(codec, &image, target.file_name(), &settings)?;
        target.write_async(format, bytes).await
    }

    fn execute(self, codec: &impl Codec, input: &[u8]) -> Result<(Image, SaveOptions)> {
        let mut image = decode(codec, input, &self.open)?;
        let mut settings = SaveOptions::default();
        for operation in self.operations {
            image = step(codec, image, operation, &mut settings)?;
        }
        Ok((image, settings))
    }
}

/// Apply one operation. Save-setting operations leave the image as is.
fn step(
    codec: &impl Codec,
    image: Image,
    operation: Operation,
    settings: &mut SaveOptions,
) -> Result<Image> {
    let image = match operation {
        Operation::AutoOrient => image.into_oriented()?,
        Operation::Resize(options) => image.resize(&options)?,
        Operation::Crop(options) => image.crop(&options)?,
        Operation::Watermark { mark, placement } => {
            let mark = mark.load(codec)?;
            image.watermark(&mark, &placement)
        }
        Operation::Format(format) => {
            settings.format = Some(format.label().to_string());
            image
        }
        Operation::Quality(quality) => {
            settings.quality = Some(quality);
            image
        }
        Operation::Compression(compression) => {
            settings.compression = Some(compression);
            image
        }
        Operation::Options(options) => {
            settings.merge(options);
            image
        }
    };
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::imaging::codec::tests::{MockCodec, RecordedOp};
    use crate::imaging::format::detect;
    use crate::imaging::{Point, RustCodec};
    use crate::test_helpers::{BLACK, WHITE, png_bytes, solid};
    use tempfile::TempDir;

    const GIF_SIGNATURE: &[u8] = b"GIF89a";

    fn decoded_dims(bytes: &[u8]) -> (u32, u32) {
        let w = u32::from_be_bytes(bytes[3..7].try_into().unwrap());
        let h = u32::from_be_bytes(bytes[7..11].try_into().unwrap());
        (w, h)
    }

    // =========================================================================
    // interpreter
    // =========================================================================

    #[test]
    fn operations_run_in_order() {
        let codec = MockCodec::with_pixels(vec![solid(200, 100, WHITE)]);
        let out = Transform::new()
            .resize(ResizeOptions::new(100, 100))
            .crop(ResizeOptions::new(20, 20))
            .format(Format::Jpeg)
            .apply(&codec, GIF_SIGNATURE)
            .unwrap();
        assert!(out.starts_with(Format::Jpeg.signature()));
        assert_eq!(decoded_dims(&out), (20, 20));
    }

    #[test]
    fn carried_format_is_used_without_format_step() {
        let codec = MockCodec::with_pixels(vec![solid(4, 4, WHITE)]);
        let out = Transform::new().apply(&codec, GIF_SIGNATURE).unwrap();
        assert_eq!(detect(&out).unwrap(), Format::Gif);
    }

    #[test]
    fn save_settings_accumulate() {
        let codec = MockCodec::with_pixels(vec![solid(4, 4, WHITE)]);
        Transform::new()
            .quality(150)
            .options(SaveOptions::format("png").with_compression(3))
            .compression(7)
            .apply(&codec, GIF_SIGNATURE)
            .unwrap();
        let encoded = codec
            .get_operations()
            .into_iter()
            .find(|op| matches!(op, RecordedOp::Encode { .. }));
        assert_eq!(
            encoded,
            Some(RecordedOp::Encode {
                format: Format::Png,
                width: 4,
                height: 4,
                quality: Some(100),
                compression: Some(7),
            })
        );
    }

    #[test]
    fn failing_step_stops_the_pipeline() {
        let codec = MockCodec::with_pixels(vec![solid(4, 4, WHITE)]);
        let err = Transform::new()
            .resize(ResizeOptions::default())
            .apply(&codec, GIF_SIGNATURE)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionsRequired);
        assert!(
            !codec
                .get_operations()
                .iter()
                .any(|op| matches!(op, RecordedOp::Encode { .. }))
        );
    }

    #[test]
    fn watermark_with_in_memory_mark() {
        let codec = MockCodec::with_pixels(vec![solid(10, 10, BLACK)]);
        let mark = Image::from_pixels(solid(10, 10, WHITE)).unwrap();
        let transform = Transform::new().watermark(mark, Point::new(0.0, 0.0));
        assert_eq!(transform.operations().len(), 1);
        transform.apply(&codec, GIF_SIGNATURE).unwrap();
    }

    #[test]
    fn empty_input_fails() {
        let err = Transform::new()
            .apply(&MockCodec::new(), &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptySource);
    }

    // =========================================================================
    // run / run_async
    // =========================================================================

    #[test]
    fn run_to_file_with_placeholder() {
        let tmp = TempDir::new().unwrap();
        let saved = Transform::new()
            .resize(ResizeOptions::width(4))
            .format(Format::Gif)
            .run(&RustCodec::new(), png_bytes(8, 8), tmp.path().join("out.{ext}"))
            .unwrap();
        let path = tmp.path().join("out.gif");
        assert_eq!(saved, Saved::File(path.clone()));
        assert_eq!(Image::open(path).unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn sync_run_refuses_streams() {
        let err = Transform::new()
            .run(
                &RustCodec::new(),
                Source::Stream(Box::new(&b"GIF89a"[..])),
                Target::Buffer,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SynchronousStreamAccess);

        let err = Transform::new()
            .run(
                &RustCodec::new(),
                png_bytes(2, 2),
                Target::Sink(Box::new(Vec::<u8>::new())),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SynchronousStreamAccess);
    }

    #[tokio::test]
    async fn run_async_from_stream() {
        let input = png_bytes(6, 3);
        let saved = Transform::new()
            .crop(ResizeOptions::new(3, 3))
            .run_async(
                &RustCodec::new(),
                Source::Stream(Box::new(std::io::Cursor::new(input))),
                Target::Buffer,
            )
            .await
            .unwrap();
        let image = Image::decode(&saved.into_bytes().unwrap()).unwrap();
        assert_eq!(image.dimensions(), (3, 3));
        assert_eq!(image.format(), Some(Format::Png));
    }

    #[tokio::test]
    async fn missing_watermark_fails_the_same_way_sync_and_async() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("mark.png");
        let build = || {
            Transform::new().watermark(Source::from(missing.clone()), Placement::default())
        };

        let sync = build()
            .run(&RustCodec::new(), png_bytes(4, 4), Target::Buffer)
            .unwrap_err();
        let async_ = build()
            .run_async(&RustCodec::new(), png_bytes(4, 4), Target::Buffer)
            .await
            .unwrap_err();
        assert_eq!(sync.kind(), ErrorKind::FileDoesNotExist);
        assert_eq!(sync.kind(), async_.kind());
    }
}
