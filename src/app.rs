//! Application state: the current image, the drawing surface and the
//! classifier, owned by one value and mutated through `&mut self`.
//!
//! Handlers check availability up front and return
//! [`Error::InputMissing`] without touching state when something is absent.
use crate::canvas::{Canvas, CanvasConfig};
use crate::classifier::{decode_prediction, Classifier, Prediction};
use crate::error::{Error, Result};
use crate::export::{export_image, ExportFormat, ExportedFile};
use crate::image::io::ImageInfo;
use crate::image::{RasterImage, RasterSource};
use crate::preprocess::preprocess;
use log::{error, info};

pub struct AppState {
    canvas: Canvas,
    image: Option<RasterImage>,
    info: Option<ImageInfo>,
    classifier: Option<Box<dyn Classifier>>,
}

impl AppState {
    pub fn new(canvas: &CanvasConfig) -> Self {
        Self {
            canvas: Canvas::from_config(canvas),
            image: None,
            info: None,
            classifier: None,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Mutable surface for freehand drawing. Call [`AppState::mark_drawn`]
    /// once the sketch should count as the current image.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn image_info(&self) -> Option<&ImageInfo> {
        self.info.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Load, decode and place an image on the canvas. On failure the previous
    /// image and canvas are kept.
    pub async fn load_image(&mut self, source: &RasterSource) -> Result<&ImageInfo> {
        let decoded = source.load().await?;
        self.canvas.place_image(&decoded.image);
        info!(
            "image loaded: {}x{} {} ({:.1} KB)",
            decoded.info.width,
            decoded.info.height,
            decoded.info.format,
            decoded.info.size_kb()
        );
        self.image = Some(decoded.image);
        Ok(&*self.info.insert(decoded.info))
    }

    /// Treat the current canvas content as the image to classify.
    pub fn mark_drawn(&mut self) {
        let snapshot = crate::image::source::from_canvas(&self.canvas);
        self.image = Some(snapshot.image);
        self.info = Some(snapshot.info);
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
        self.image = None;
        self.info = None;
    }

    /// Install the outcome of a classifier load. A failure is logged and the
    /// classifier stays unavailable.
    pub fn install_classifier<C: Classifier + 'static>(&mut self, loaded: Result<C>) -> bool {
        match loaded {
            Ok(classifier) => {
                self.classifier = Some(Box::new(classifier));
                true
            }
            Err(e) => {
                error!("classifier unavailable: {e}");
                false
            }
        }
    }

    /// Preprocess the canvas and classify it.
    pub fn predict(&self) -> Result<Prediction> {
        if self.image.is_none() {
            return Err(Error::InputMissing("image"));
        }
        let classifier = self
            .classifier
            .as_deref()
            .ok_or(Error::InputMissing("classifier"))?;
        let input = preprocess(self.canvas.view(), classifier.input_size())?;
        let scores = classifier.predict(&input)?;
        let prediction = decode_prediction(&scores)?;
        info!(
            "prediction: {} ({:.1}%)",
            prediction.label,
            prediction.confidence_percent()
        );
        Ok(prediction)
    }

    /// Encode the canvas in `format`.
    pub fn export(&self, format: ExportFormat) -> Result<ExportedFile> {
        export_image(self.canvas.view(), format)
    }
}
