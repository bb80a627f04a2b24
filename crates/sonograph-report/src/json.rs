use crate::AnalysisReport;
use std::io::Write;

pub fn write_json<W: Write>(writer: W, report: &AnalysisReport) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, report)
}
