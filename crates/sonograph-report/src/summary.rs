use crate::{AnalysisReport, file_info_line};
use std::io;
use std::io::Write;

pub fn write_summary<W: Write>(mut writer: W, report: &AnalysisReport) -> io::Result<()> {
    writeln!(writer, "{}", report.file_name)?;
    writeln!(writer, "{}", file_info_line(report))?;
    for section in &report.channel_sections {
        writeln!(
            writer,
            "{}: {} frames x {} bins, peak magnitude {:.3}, surface {}x{}",
            section.label,
            section.num_frames,
            section.freq_bins,
            section.max_magnitude,
            section.width,
            section.height
        )?;
    }
    writeln!(writer, "Wrote {}", report.image_path)
}
