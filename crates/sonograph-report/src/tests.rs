use super::*;
use sonograph_render::{AxisLabel, AxisLabels};

fn sample_report() -> AnalysisReport {
    let axis = AxisLabels {
        frequency: vec![
            AxisLabel {
                position: 350,
                text: "0Hz".to_string(),
            },
            AxisLabel {
                position: 0,
                text: "22.1kHz".to_string(),
            },
        ],
        time: vec![
            AxisLabel {
                position: 0,
                text: "0.0s".to_string(),
            },
            AxisLabel {
                position: 1800,
                text: "1.5s".to_string(),
            },
        ],
    };
    let section = |label: &str| ChannelSection {
        label: label.to_string(),
        width: 1800,
        height: 350,
        num_frames: 125,
        freq_bins: 1024,
        max_magnitude: 312.5,
        axis: axis.clone(),
    };
    AnalysisReport {
        file_name: "track.wav".to_string(),
        image_path: "spectrogram.png".to_string(),
        sample_rate: 44_100,
        channels: 2,
        duration_seconds: 1.5,
        channel_sections: vec![section("Left Channel"), section("Right Channel")],
    }
}

#[test]
fn summary_lists_file_and_channel_details() {
    let mut out = Vec::new();
    summary::write_summary(&mut out, &sample_report()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("track.wav"));
    assert!(text.contains("Duration: 1.50s | Stereo | Sample Rate: 44100Hz"));
    assert!(text.contains("Left Channel: 125 frames x 1024 bins"));
    assert!(text.contains("Wrote spectrogram.png"));
}

#[test]
fn json_report_round_trips() {
    let mut out = Vec::new();
    json::write_json(&mut out, &sample_report()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["file_name"], "track.wav");
    assert_eq!(value["sample_rate"], 44_100);
    assert_eq!(value["channel_sections"].as_array().unwrap().len(), 2);
    assert_eq!(
        value["channel_sections"][0]["axis"]["frequency"][1]["text"],
        "22.1kHz"
    );
}

#[test]
fn html_page_carries_labels_and_image_sources() {
    let sources = vec![
        "report_assets/channel_0.png".to_string(),
        "report_assets/channel_1.png".to_string(),
    ];
    let page = html::render_page(&sample_report(), &sources).unwrap();
    assert!(page.contains("track.wav"));
    assert!(page.contains("Left Channel"));
    assert!(page.contains("Right Channel"));
    assert!(page.contains("report_assets/channel_0.png"));
    assert!(page.contains("22.1kHz"));
    assert!(page.contains("1.5s"));
    // The file name heading appears once, not per channel.
    assert_eq!(page.matches("<h1>").count(), 1);
}

#[test]
fn html_report_writes_page_and_assets() {
    use image::{Rgb, RgbImage};

    let dir = std::env::temp_dir().join("sonograph_html_report_test");
    std::fs::create_dir_all(&dir).unwrap();
    let root = dir.join("report.html");

    let surfaces = vec![RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))];
    html::HtmlReport::new(root.clone())
        .write(&sample_report(), &surfaces)
        .unwrap();

    assert!(root.is_file());
    assert!(dir.join("report_assets").join("channel_0.png").is_file());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn channel_naming_matches_the_layout() {
    assert_eq!(channel_layout(1), "Mono");
    assert_eq!(channel_layout(2), "Stereo");
    assert_eq!(channel_layout(6), "6 Channels");
    assert_eq!(channel_label(0, 1), "Mono");
    assert_eq!(channel_label(0, 2), "Left Channel");
    assert_eq!(channel_label(1, 2), "Right Channel");
}
