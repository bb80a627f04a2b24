use crate::{AnalysisReport, file_info_line};
use askama::Template;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HtmlReportError {
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encode error: {0}")]
    Image(#[from] image::ImageError),
}

pub struct HtmlReport {
    root: PathBuf,
    asset_dir: PathBuf,
    asset_dir_name: String,
}

impl HtmlReport {
    pub fn new(root: PathBuf) -> HtmlReport {
        let asset_dir_name = root
            .file_stem()
            .map(|name| format!("{}_assets", name.to_string_lossy()))
            .unwrap_or_else(|| "assets".to_string());
        let asset_dir = root
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&asset_dir_name);
        HtmlReport {
            root,
            asset_dir,
            asset_dir_name,
        }
    }

    pub fn write(&self, report: &AnalysisReport, surfaces: &[RgbImage]) -> Result<(), HtmlReportError> {
        fs::create_dir_all(&self.asset_dir)?;
        let mut sources = Vec::with_capacity(surfaces.len());
        for (index, surface) in surfaces.iter().enumerate() {
            let file_name = format!("channel_{index}.png");
            surface.save(self.asset_dir.join(&file_name))?;
            sources.push(format!("{}/{}", self.asset_dir_name, file_name));
        }
        let page = render_page(report, &sources)?;
        fs::write(&self.root, page)?;
        Ok(())
    }
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    file_name: String,
    file_info: String,
    channels: Vec<ChannelView>,
}

struct ChannelView {
    label: String,
    src: String,
    width: u32,
    height: u32,
    frequency: Vec<String>,
    time: Vec<String>,
}

pub(crate) fn render_page(report: &AnalysisReport, sources: &[String]) -> Result<String, askama::Error> {
    let channels = report
        .channel_sections
        .iter()
        .zip(sources)
        .map(|(section, src)| ChannelView {
            label: section.label.clone(),
            src: src.clone(),
            width: section.width,
            height: section.height,
            // The label set runs bottom-up; the page column runs top-down.
            frequency: section
                .axis
                .frequency
                .iter()
                .rev()
                .map(|label| label.text.clone())
                .collect(),
            time: section.axis.time.iter().map(|label| label.text.clone()).collect(),
        })
        .collect();
    ReportTemplate {
        file_name: report.file_name.clone(),
        file_info: file_info_line(report),
        channels,
    }
    .render()
}
