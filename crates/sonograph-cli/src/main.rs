use clap::Parser;
use image::RgbImage;
use rayon::prelude::*;
use sonograph_audio::load_audio;
use sonograph_dsp::SpectrogramBuilder;
use sonograph_render::{
    AxisLabels, MAX_SURFACE_WIDTH, MONO_SURFACE_HEIGHT, STEREO_SURFACE_HEIGHT, composite_vertical,
    render,
};
use sonograph_report::html::HtmlReport;
use sonograph_report::{AnalysisReport, ChannelSection, channel_label, json, summary};
use std::io;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "sonograph", version, about = "Audio spectrogram renderer")]
struct Cli {
    input: PathBuf,
    #[arg(long, default_value = "spectrogram.png")]
    output: PathBuf,
    #[arg(long, default_value_t = MAX_SURFACE_WIDTH)]
    width: u32,
    #[arg(long)]
    report: Option<PathBuf>,
    #[arg(long)]
    format: Option<String>,
}

struct ChannelRender {
    surface: RgbImage,
    axis: AxisLabels,
    num_frames: usize,
    freq_bins: usize,
    max_magnitude: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let decoded = load_audio(&cli.input)?;

    let width = cli.width.clamp(1, MAX_SURFACE_WIDTH);
    let height = if decoded.samples.len() == 2 {
        STEREO_SURFACE_HEIGHT
    } else {
        MONO_SURFACE_HEIGHT
    };

    // Channels run in parallel; collect keeps them in channel order.
    let rendered: Vec<ChannelRender> = decoded
        .samples
        .par_iter()
        .map(|channel| {
            let spectrogram = SpectrogramBuilder::new().build(channel);
            let (surface, axis) = render(
                &spectrogram,
                width,
                height,
                decoded.sample_rate,
                decoded.duration_seconds as f64,
            );
            ChannelRender {
                surface,
                axis,
                num_frames: spectrogram.num_frames(),
                freq_bins: spectrogram.freq_bins(),
                max_magnitude: spectrogram.max_magnitude(),
            }
        })
        .collect();

    let sections = rendered
        .iter()
        .enumerate()
        .map(|(index, channel)| ChannelSection {
            label: channel_label(index, rendered.len()).to_string(),
            width,
            height,
            num_frames: channel.num_frames,
            freq_bins: channel.freq_bins,
            max_magnitude: channel.max_magnitude,
            axis: channel.axis.clone(),
        })
        .collect();
    let surfaces: Vec<RgbImage> = rendered.into_iter().map(|channel| channel.surface).collect();

    composite_vertical(&surfaces).save(&cli.output)?;

    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());
    let report = AnalysisReport {
        file_name,
        image_path: cli.output.display().to_string(),
        sample_rate: decoded.sample_rate,
        channels: decoded.channels,
        duration_seconds: decoded.duration_seconds,
        channel_sections: sections,
    };

    match cli.format.as_deref() {
        None | Some("summary") => summary::write_summary(io::stdout(), &report)?,
        Some("json") => json::write_json(io::stdout(), &report)?,
        Some(format) => return Err(format!("unsupported report format: {format}").into()),
    }

    if let Some(path) = cli.report {
        HtmlReport::new(path).write(&report, &surfaces)?;
    }

    Ok(())
}
