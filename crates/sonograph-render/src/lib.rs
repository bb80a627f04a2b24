use image::{Rgb, RgbImage};
use serde::Serialize;
use sonograph_dsp::Spectrogram;


pub const MAX_SURFACE_WIDTH: u32 = 1800;
pub const STEREO_SURFACE_HEIGHT: u32 = 350;
pub const MONO_SURFACE_HEIGHT: u32 = 600;
pub const COMPOSITE_GAP: u32 = 50;

// The reference mapping assumes a ~100 dB dynamic range; the constant is
// tuned, not derived.
pub const DB_RANGE: f32 = 100.0;
pub const LOG_EPSILON: f32 = 1e-10;

const FREQ_LABEL_SEGMENTS: usize = 8;
const TIME_LABEL_SEGMENTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub position: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabels {
    pub frequency: Vec<AxisLabel>,
    pub time: Vec<AxisLabel>,
}

pub fn color_for(intensity: f32) -> Rgb<u8> {
    // Black -> purple -> red -> orange -> yellow, truncated to 8 bits.
    if intensity < 0.25 {
        let t = intensity * 4.0;
        Rgb([(160.0 * t) as u8, (32.0 * t) as u8, (240.0 * t) as u8])
    } else if intensity < 0.5 {
        let t = (intensity - 0.25) * 4.0;
        Rgb([
            (160.0 + 95.0 * t) as u8,
            (32.0 - 32.0 * t) as u8,
            (240.0 - 240.0 * t) as u8,
        ])
    } else if intensity < 0.75 {
        let t = (intensity - 0.5) * 4.0;
        Rgb([255, (107.0 * t) as u8, 0])
    } else {
        let t = (intensity - 0.75) * 4.0;
        Rgb([255, (107.0 + 148.0 * t) as u8, 0])
    }
}

pub fn db_normalized(magnitude: f32, max_magnitude: f32) -> f32 {
    let normalized = magnitude / max_magnitude.max(1.0);
    let db = 20.0 * (normalized + LOG_EPSILON).log10();
    ((db + DB_RANGE) / DB_RANGE).max(0.0)
}

pub fn render(
    spectrogram: &Spectrogram,
    width: u32,
    height: u32,
    sample_rate: u32,
    duration_seconds: f64,
) -> (RgbImage, AxisLabels) {
    let mut surface = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    let labels = AxisLabels {
        frequency: frequency_labels(height, sample_rate),
        time: time_labels(width, duration_seconds),
    };
    if spectrogram.is_empty() || width == 0 || height == 0 {
        return (surface, labels);
    }

    let num_frames = spectrogram.num_frames();
    let freq_bins = spectrogram.freq_bins();
    let time_step = width as f32 / num_frames as f32;
    let freq_step = height as f32 / freq_bins as f32;
    // One extra pixel per cell closes the seams left by step rounding.
    let cell_width = time_step.ceil() as u32 + 1;
    let cell_height = freq_step.ceil() as u32 + 1;
    let max_magnitude = spectrogram.max_magnitude();

    for (t, column) in spectrogram.columns().iter().enumerate() {
        let x = (t as f32 * time_step).floor() as i64;
        for (f, &magnitude) in column.iter().enumerate() {
            let color = color_for(db_normalized(magnitude, max_magnitude));
            let y = height as i64 - ((f + 1) as f32 * freq_step).floor() as i64;
            fill_rect(&mut surface, x, y, cell_width, cell_height, color);
        }
    }
    (surface, labels)
}

fn fill_rect(surface: &mut RgbImage, x: i64, y: i64, width: u32, height: u32, color: Rgb<u8>) {
    let (surface_width, surface_height) = surface.dimensions();
    for yy in y.max(0)..(y + height as i64).min(surface_height as i64) {
        for xx in x.max(0)..(x + width as i64).min(surface_width as i64) {
            surface.put_pixel(xx as u32, yy as u32, color);
        }
    }
}

fn frequency_labels(height: u32, sample_rate: u32) -> Vec<AxisLabel> {
    let nyquist = sample_rate as f64 / 2.0;
    (0..=FREQ_LABEL_SEGMENTS)
        .map(|i| {
            let fraction = i as f64 / FREQ_LABEL_SEGMENTS as f64;
            let rounded = (fraction * nyquist).round() as i64;
            let text = if rounded >= 1000 {
                format!("{:.1}kHz", rounded as f64 / 1000.0)
            } else {
                format!("{rounded}Hz")
            };
            AxisLabel {
                position: (height as f64 - fraction * height as f64) as u32,
                text,
            }
        })
        .collect()
}

fn time_labels(width: u32, duration_seconds: f64) -> Vec<AxisLabel> {
    (0..=TIME_LABEL_SEGMENTS)
        .map(|i| {
            let fraction = i as f64 / TIME_LABEL_SEGMENTS as f64;
            AxisLabel {
                position: (fraction * width as f64) as u32,
                text: format!("{:.1}s", fraction * duration_seconds),
            }
        })
        .collect()
}

pub fn composite_vertical(surfaces: &[RgbImage]) -> RgbImage {
    let width = surfaces.iter().map(RgbImage::width).max().unwrap_or(0);
    let height = surfaces
        .iter()
        .map(|surface| surface.height() + COMPOSITE_GAP)
        .sum();
    let mut composite = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
    let mut y_offset = 0i64;
    for surface in surfaces {
        image::imageops::replace(&mut composite, surface, 0, y_offset);
        y_offset += (surface.height() + COMPOSITE_GAP) as i64;
    }
    composite
}
