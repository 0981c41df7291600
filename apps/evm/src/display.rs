//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use evm_ops::OperationResult;
use evm_types::{
    ColorChoice, DoctorReport, InstallAction, InstallReport, PackageListing, UninstallReport,
};
use std::io;
use std::path::Path;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render for humans
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::PackageList(packages) => self.render_package_list(packages),
            OperationResult::InstallReport(report) => self.render_install_report(report),
            OperationResult::UninstallReport(report) => self.render_uninstall_report(report),
            OperationResult::Binary(path) => Self::render_path(path),
            OperationResult::Setting { value, .. } => {
                if let Some(value) = value {
                    println!("{value}");
                }
                Ok(())
            }
            OperationResult::Doctor(report) => self.render_doctor(report),
            OperationResult::Success(message) => {
                println!("{message}");
                Ok(())
            }
        }
    }

    /// Render package list
    fn render_package_list(&self, packages: &[PackageListing]) -> io::Result<()> {
        if packages.is_empty() {
            println!("No recipes available. Run `evm update` to fetch them.");
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Package").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

        for package in packages {
            let name = if package.current {
                Cell::new(format!("* {}", package.name)).add_attribute(Attribute::Bold)
            } else {
                Cell::new(format!("  {}", package.name))
            };
            table.add_row(vec![name, self.format_status(package)]);
        }

        println!("{table}");
        Ok(())
    }

    fn format_status(&self, package: &PackageListing) -> Cell {
        let (text, color) = match (package.installed, package.current) {
            (true, true) => ("In use", Color::Green),
            (true, false) => ("Installed", Color::Blue),
            (false, true) => ("In use (missing)", Color::Red),
            (false, false) => ("Available", Color::Grey),
        };
        if self.supports_color() {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn render_install_report(&self, report: &InstallReport) -> io::Result<()> {
        let verb = match report.action {
            InstallAction::Installed => "Installed",
            InstallAction::Reinstalled => "Reinstalled",
            InstallAction::Skipped => "Already installed",
        };
        println!(
            "[OK] {verb} {} in {}ms",
            self.style_package_name(&report.package),
            report.duration_ms
        );
        println!("     {}", report.binary.display());
        if report.activated {
            println!("Using {}", report.package);
        }
        Ok(())
    }

    fn render_uninstall_report(&self, report: &UninstallReport) -> io::Result<()> {
        println!("[OK] Uninstalled {}", self.style_package_name(&report.package));
        if report.was_current {
            println!(
                "{} was in use; run `evm disuse` or `evm use <name>` to pick another version.",
                report.package
            );
        }
        Ok(())
    }

    fn render_path(path: &Path) -> io::Result<()> {
        println!("{}", path.display());
        Ok(())
    }

    fn render_doctor(&self, report: &DoctorReport) -> io::Result<()> {
        match &report.current {
            Some(name) => println!("Current: {}", self.style_package_name(name)),
            None => println!("Current: none"),
        }

        if report.is_healthy() {
            println!("[OK] No problems found.");
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Finding").add_attribute(Attribute::Bold),
            Cell::new("Subject").add_attribute(Attribute::Bold),
            Cell::new("Detail").add_attribute(Attribute::Bold),
        ]);
        for finding in &report.findings {
            let kind = serde_json::to_value(finding.kind)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| format!("{:?}", finding.kind));
            table.add_row(vec![
                Cell::new(kind),
                Cell::new(&finding.subject),
                Cell::new(&finding.detail),
            ]);
        }
        println!("[WARN] {} problem(s) found:", report.findings.len());
        println!("{table}");
        Ok(())
    }

    /// Style package name
    fn style_package_name(&self, name: &str) -> String {
        if self.supports_color() {
            Style::new().bold().apply_to(name).to_string()
        } else {
            name.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}
