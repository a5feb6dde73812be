use shape_sketch::app::AppState;
use shape_sketch::config::{load_config, ExportToolConfig};
use shape_sketch::export::export_to_dir;
use shape_sketch::image::RasterSource;
use shape_sketch::{Error, Result};
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
        .ok_or_else(|| Error::Usage("export_canvas <config.json>"))?;
    let config: ExportToolConfig = load_config(Path::new(&config_path))?;

    let mut app = AppState::new(&config.canvas);
    let info = app
        .load_image(&RasterSource::from_location(&config.input))
        .await?;
    println!(
        "Loaded {} ({}x{}, {}, {:.1} KB)",
        config.input,
        info.width,
        info.height,
        info.format,
        info.size_kb()
    );

    for format in &config.formats {
        let path = export_to_dir(app.canvas().view(), *format, &config.output_dir)?;
        println!("Saved {} to {}", format.mime_type(), path.display());
    }
    Ok(())
}
