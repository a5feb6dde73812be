//! Training set assembly from a folder of labelled sketches.
//!
//! A file belongs to a class when its lower-cased path relative to the root
//! contains `/<class>/`, e.g. `shapes/circle/001.png`. Per class the first
//! `limit_per_class` files (sorted by path) are decoded, resized with
//! nearest-neighbor to `S × S`, scaled to `[0, 1]` and optionally augmented,
//! then stacked in [`ClassLabel::ALL`] order.
//!
//! Augmentation parameters are drawn from one seeded RNG in sample order
//! before the parallel decode, so the output does not depend on thread
//! scheduling.
use crate::augment::{augment_with, AugmentParams};
use crate::error::{Error, Result};
use crate::image::io::load_rgba_image;
use crate::labels::{one_hot, ClassLabel};
use crate::preprocess::{normalize_sample, IMAGE_SIZE, INPUT_CHANNELS};
use log::{debug, info};
use ndarray::{s, Array2, Array3, Array4, ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub limit_per_class: usize,
    pub augment: bool,
    pub seed: u64,
    pub image_size: usize,
    pub validation_fraction: f32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            limit_per_class: 701,
            augment: true,
            seed: 0,
            image_size: IMAGE_SIZE,
            validation_fraction: 0.2,
        }
    }
}

/// Image files grouped by class, indexed by label ordinal.
#[derive(Clone, Debug, Default)]
pub struct ClassFiles {
    files: [Vec<PathBuf>; 3],
}

impl ClassFiles {
    pub fn get(&self, label: ClassLabel) -> &[PathBuf] {
        &self.files[label.index()]
    }

    pub fn push(&mut self, label: ClassLabel, path: PathBuf) {
        self.files[label.index()].push(path);
    }

    pub fn counts(&self) -> [usize; 3] {
        [self.files[0].len(), self.files[1].len(), self.files[2].len()]
    }

    /// Every class has at least one file.
    pub fn is_ready(&self) -> bool {
        self.files.iter().all(|f| !f.is_empty())
    }

    pub fn summary(&self) -> String {
        ClassLabel::ALL
            .iter()
            .map(|l| format!("{l}: {}", self.get(*l).len()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Class of a path relative to the dataset root, if any.
pub fn classify_path(relative: &Path) -> Option<ClassLabel> {
    let mut normalized = String::from("/");
    normalized.push_str(&relative.to_string_lossy().replace('\\', "/").to_lowercase());
    ClassLabel::ALL
        .into_iter()
        .find(|label| normalized.contains(&format!("/{}/", label.name())))
}

/// Walk `root` recursively and group files by class.
pub fn collect_files(root: &Path) -> Result<ClassFiles> {
    let mut out = ClassFiles::default();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if let Some(label) = classify_path(relative) {
                out.push(label, path);
            }
        }
    }
    for files in &mut out.files {
        files.sort();
    }
    info!("found files -> {}", out.summary());
    Ok(out)
}

/// Stacked samples `[N, S, S, 3]` with one-hot targets `[N, C]`.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub x: Array4<f32>,
    pub y: Array2<f32>,
    pub labels: Vec<ClassLabel>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub samples: usize,
    pub x_shape: Vec<usize>,
    pub y_shape: Vec<usize>,
    pub per_class: Vec<(ClassLabel, usize)>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label order used for the one-hot columns.
    pub fn classes(&self) -> &'static [ClassLabel] {
        &ClassLabel::ALL
    }

    pub fn sample(&self, index: usize) -> ArrayView3<'_, f32> {
        self.x.index_axis(Axis(0), index)
    }

    /// First `floor(N * (1 - validation_fraction))` samples train, the rest
    /// validate. No shuffling.
    pub fn split(&self, validation_fraction: f32) -> (Dataset, Dataset) {
        let fraction = validation_fraction.clamp(0.0, 1.0);
        let n = self.len();
        let train_n = (((n as f32) * (1.0 - fraction)).floor() as usize).min(n);
        let part = |range: std::ops::Range<usize>| Dataset {
            x: self.x.slice(s![range.clone(), .., .., ..]).to_owned(),
            y: self.y.slice(s![range.clone(), ..]).to_owned(),
            labels: self.labels[range].to_vec(),
        };
        (part(0..train_n), part(train_n..n))
    }

    pub fn summary(&self) -> DatasetSummary {
        let per_class = ClassLabel::ALL
            .iter()
            .map(|l| (*l, self.labels.iter().filter(|x| *x == l).count()))
            .collect();
        DatasetSummary {
            samples: self.len(),
            x_shape: self.x.shape().to_vec(),
            y_shape: self.y.shape().to_vec(),
            per_class,
        }
    }
}

struct Job<'a> {
    path: &'a Path,
    label: ClassLabel,
    params: Option<AugmentParams>,
}

/// Decode, normalize and optionally augment the selected files.
pub fn build_dataset(files: &ClassFiles, config: &DatasetConfig) -> Result<Dataset> {
    if !files.is_ready() {
        return Err(Error::InputMissing("training images for every class"));
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut jobs = Vec::new();
    for label in ClassLabel::ALL {
        let list = files.get(label);
        let n = config.limit_per_class.min(list.len());
        for path in &list[..n] {
            let params = config.augment.then(|| AugmentParams::sample(&mut rng));
            jobs.push(Job {
                path,
                label,
                params,
            });
        }
    }
    if jobs.is_empty() {
        return Err(Error::InputMissing("training images"));
    }

    let size = config.image_size;
    let samples = jobs
        .par_iter()
        .map(|job| load_sample(job, size))
        .collect::<Result<Vec<Array3<f32>>>>()?;

    let mut x = Array4::zeros((samples.len(), size, size, INPUT_CHANNELS));
    for (mut dst, sample) in x.outer_iter_mut().zip(&samples) {
        dst.assign(sample);
    }
    let labels: Vec<ClassLabel> = jobs.iter().map(|j| j.label).collect();
    let y = one_hot(&labels);
    info!("dataset built: {} samples, x={:?}", labels.len(), x.shape());
    Ok(Dataset { x, y, labels })
}

fn load_sample(job: &Job<'_>, size: usize) -> Result<Array3<f32>> {
    let decoded = load_rgba_image(job.path)?;
    let sample = normalize_sample(decoded.image.as_view(), size)?;
    debug!("loaded {} as {}", job.path.display(), job.label);
    Ok(match &job.params {
        Some(params) => augment_with(&sample, params),
        None => sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_classify_by_directory_segment() {
        assert_eq!(
            classify_path(Path::new("Circle/a.png")),
            Some(ClassLabel::Circle)
        );
        assert_eq!(
            classify_path(Path::new("set/triangle/b.png")),
            Some(ClassLabel::Triangle)
        );
        assert_eq!(classify_path(Path::new("squares/c.png")), None);
        assert_eq!(classify_path(Path::new("square.png")), None);
    }

    #[test]
    fn readiness_needs_every_class() {
        let mut files = ClassFiles::default();
        files.push(ClassLabel::Circle, PathBuf::from("a"));
        files.push(ClassLabel::Square, PathBuf::from("b"));
        assert!(!files.is_ready());
        files.push(ClassLabel::Triangle, PathBuf::from("c"));
        assert!(files.is_ready());
        assert_eq!(files.summary(), "circle: 1 | square: 1 | triangle: 1");
    }

    #[test]
    fn build_refuses_incomplete_folders() {
        let files = ClassFiles::default();
        let err = build_dataset(&files, &DatasetConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InputMissing(_)));
    }

    #[test]
    fn split_keeps_order_and_sizes() {
        let n = 10;
        let labels: Vec<ClassLabel> = (0..n).map(|i| ClassLabel::ALL[i % 3]).collect();
        let ds = Dataset {
            x: Array4::from_shape_fn((n, 2, 2, 3), |(i, _, _, _)| i as f32),
            y: one_hot(&labels),
            labels,
        };
        let (train, val) = ds.split(0.2);
        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);
        assert_eq!(val.sample(0)[[0, 0, 0]], 8.0);
        assert_eq!(val.labels[1], ClassLabel::Circle);
        assert_eq!(val.y.shape(), &[2, 3]);
    }
}
