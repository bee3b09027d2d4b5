//! Report rendering: terminal, JSON, and markdown writers.

use crate::core::{GateStatus, Report, Severity};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Table};
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub fn create_writer<W: Write + 'static>(format: OutputFormat, writer: W) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn severity_label(severity: Severity) -> ColoredString {
        match severity {
            Severity::Critical => "CRITICAL".red().bold(),
            Severity::High => "HIGH".red(),
            Severity::Medium => "MEDIUM".yellow(),
            Severity::Low => "LOW".cyan(),
            Severity::Info => "INFO".dimmed(),
        }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Codegate Analysis".bold())?;
        writeln!(
            self.writer,
            "{} files, {} functions, {} findings",
            report.summary.files_analyzed,
            report.summary.total_functions,
            report.summary.total_findings
        )?;
        if report.truncated {
            writeln!(
                self.writer,
                "{}",
                "warning: run hit its deadline; results are partial".yellow()
            )?;
        }
        writeln!(self.writer)?;

        for finding in &report.findings {
            writeln!(
                self.writer,
                "{:>8}  {}:{}  [{}] {}",
                Self::severity_label(finding.severity),
                finding.file.display(),
                finding.line,
                finding.rule_id,
                finding.message
            )?;
        }
        if !report.findings.is_empty() {
            writeln!(self.writer)?;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["severity", "count"]);
        for severity in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Info,
        ] {
            let count = report.summary.severity_count(severity);
            if count > 0 {
                table.add_row(vec![severity.to_string(), count.to_string()]);
            }
        }
        writeln!(self.writer, "{table}")?;

        let gate = match report.gate {
            GateStatus::Pass => "gate: PASS".green().bold(),
            GateStatus::Fail => "gate: FAIL".red().bold(),
        };
        writeln!(self.writer, "{gate}")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "# Codegate Analysis Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Generated: {}", report.timestamp.to_rfc3339())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- Files analyzed: {}", report.summary.files_analyzed)?;
        writeln!(self.writer, "- Findings: {}", report.summary.total_findings)?;
        writeln!(
            self.writer,
            "- Gate: **{}**{}",
            if report.gate.is_pass() { "PASS" } else { "FAIL" },
            if report.truncated { " (truncated run)" } else { "" }
        )?;
        writeln!(self.writer)?;

        if !report.findings.is_empty() {
            writeln!(self.writer, "## Findings")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Severity | File | Line | Rule | Message |")?;
            writeln!(self.writer, "|----------|------|------|------|---------|")?;
            for f in &report.findings {
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {} | {} |",
                    f.severity,
                    f.file.display(),
                    f.line,
                    f.rule_id,
                    f.message
                )?;
            }
            writeln!(self.writer)?;
        }

        if !report.metrics.is_empty() {
            writeln!(self.writer, "## Complexity")?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "- Functions: {} (max cyclomatic {}, average {:.1})",
                report.summary.total_functions,
                report.summary.max_cyclomatic,
                report.summary.average_cyclomatic
            )?;
        }
        Ok(())
    }
}
