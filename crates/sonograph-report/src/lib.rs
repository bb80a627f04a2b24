use serde::Serialize;
use sonograph_render::AxisLabels;

pub mod html;
pub mod json;
pub mod summary;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub file_name: String,
    pub image_path: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_seconds: f32,
    pub channel_sections: Vec<ChannelSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSection {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub num_frames: usize,
    pub freq_bins: usize,
    pub max_magnitude: f32,
    pub axis: AxisLabels,
}

pub fn channel_layout(channels: u16) -> String {
    match channels {
        1 => "Mono".to_string(),
        2 => "Stereo".to_string(),
        n => format!("{n} Channels"),
    }
}

pub fn channel_label(index: usize, rendered_channels: usize) -> &'static str {
    if rendered_channels == 2 {
        if index == 0 { "Left Channel" } else { "Right Channel" }
    } else {
        "Mono"
    }
}

fn file_info_line(report: &AnalysisReport) -> String {
    format!(
        "Duration: {:.2}s | {} | Sample Rate: {}Hz",
        report.duration_seconds,
        channel_layout(report.channels),
        report.sample_rate
    )
}
