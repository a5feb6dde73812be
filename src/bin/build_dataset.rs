use log::info;
use serde::Serialize;
use shape_sketch::config::{load_config, DatasetToolConfig};
use shape_sketch::dataset::{build_dataset, collect_files, DatasetSummary};
use shape_sketch::image::io::{save_rgba_png, write_json_file};
use shape_sketch::image::RasterImage;
use shape_sketch::{Error, Result};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .ok_or_else(|| Error::Usage("build_dataset <config.json>"))?;
    let config: DatasetToolConfig = load_config(Path::new(&config_path))?;

    let files = collect_files(&config.root)?;
    println!("Found files -> {}", files.summary());

    let dataset = build_dataset(&files, &config.dataset)?;
    let (train, val) = dataset.split(config.dataset.validation_fraction);
    println!(
        "Loaded {} samples ({} train / {} validation)",
        dataset.len(),
        train.len(),
        val.len()
    );

    if let Some(dir) = &config.output.preview_dir {
        let count = config.output.preview_count.min(dataset.len());
        for i in 0..count {
            let sample = dataset.sample(i);
            let (h, w, _) = sample.dim();
            let mut img = RasterImage::filled(w, h, [0, 0, 0, 255]);
            for y in 0..h {
                for x in 0..w {
                    let px = |c: usize| (sample[[y, x, c]] * 255.0).round().clamp(0.0, 255.0) as u8;
                    img.put(x, y, [px(0), px(1), px(2), 255]);
                }
            }
            let path = dir.join(format!("{i:04}_{}.png", dataset.labels[i]));
            save_rgba_png(&img, &path)?;
        }
        info!("wrote {count} previews to {}", dir.display());
    }

    let report = DatasetReport {
        root: config.root.display().to_string(),
        seed: config.dataset.seed,
        augment: config.dataset.augment,
        dataset: dataset.summary(),
        train_samples: train.len(),
        validation_samples: val.len(),
    };
    write_json_file(&config.output.summary_json, &report)?;
    println!("Saved summary to {}", config.output.summary_json.display());
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasetReport {
    root: String,
    seed: u64,
    augment: bool,
    dataset: DatasetSummary,
    train_samples: usize,
    validation_samples: usize,
}
