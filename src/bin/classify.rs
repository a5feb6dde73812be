use log::info;
use serde::Serialize;
use shape_sketch::app::AppState;
use shape_sketch::classifier::spawn_classifier_load;
use shape_sketch::config::{load_config, ClassifyToolConfig};
use shape_sketch::image::io::{save_rgba_png, write_json_file};
use shape_sketch::image::{RasterImage, RasterSource};
use shape_sketch::preprocess::preprocess_with_threshold;
use shape_sketch::{ClassLabel, Error, Result};
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .ok_or_else(|| Error::Usage("classify <config.json>"))?;
    let config: ClassifyToolConfig = load_config(Path::new(&config_path))?;

    // Model and image load concurrently; the model must be ready before predict.
    let pending = spawn_classifier_load(config.model.clone());
    let mut app = AppState::new(&config.canvas);
    app.load_image(&RasterSource::from_location(&config.input))
        .await?;
    if !app.install_classifier(pending.wait().await) {
        return Err(Error::InputMissing("classifier"));
    }

    let prediction = app.predict()?;
    println!(
        "Result: {} ({:.1}%)",
        prediction.label,
        prediction.confidence_percent()
    );

    if let Some(path) = &config.output.input_preview {
        let (tensor, threshold) = preprocess_with_threshold(app.canvas().view(), config.image_size)?;
        let size = config.image_size;
        let mut preview = RasterImage::filled(size, size, [255, 255, 255, 255]);
        for y in 0..size {
            for x in 0..size {
                if tensor[[0, y, x, 0]] == 1.0 {
                    preview.put(x, y, [0, 0, 0, 255]);
                }
            }
        }
        save_rgba_png(&preview, path)?;
        info!("saved classifier input preview to {} (threshold {threshold:.4})", path.display());
    }

    if let Some(path) = &config.output.result_json {
        let report = ClassifyReport {
            input: &config.input,
            label: prediction.label,
            confidence: prediction.confidence,
            classes: &ClassLabel::ALL,
        };
        write_json_file(path, &report)?;
        println!("Saved prediction to {}", path.display());
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyReport<'a> {
    input: &'a str,
    label: ClassLabel,
    confidence: f32,
    classes: &'a [ClassLabel],
}
