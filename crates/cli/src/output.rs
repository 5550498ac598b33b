//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use storecheck_e2e::product::ProductRecord;
use storecheck_e2e::{ScenarioReport, StepResult, StepStatus};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for StepResult {
    fn headers() -> Vec<&'static str> {
        vec!["Step", "Status", "Duration", "Screenshot", "Error"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            status_label(self.status),
            format!("{} ms", self.duration_ms),
            self.screenshot_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            self.error.clone().unwrap_or_default(),
        ]
    }
}

impl TableDisplay for ProductRecord {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Product", "Price"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.rank.to_string(), self.name.clone(), format!("Rs. {}", self.price)]
    }
}

fn status_label(status: StepStatus) -> String {
    match status {
        StepStatus::Passed => "passed".green().to_string(),
        StepStatus::Failed => "failed".red().to_string(),
        StepStatus::Skipped => "skipped".yellow().to_string(),
    }
}

fn table<T: TableDisplay>(items: &[T]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

/// Print a scenario report
pub fn print_report(report: &ScenarioReport, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{}", table(&report.steps));

            let products: Vec<ProductRecord> = report.products().cloned().collect();
            if !products.is_empty() {
                println!("{}", table(&products));
            }
            print_summary(report);
        }
        OutputFormat::Json | OutputFormat::Yaml => print_structured(report, format),
        OutputFormat::Plain => {
            for step in &report.steps {
                println!("{}: {:?}", step.name, step.status);
                if let Some(err) = &step.error {
                    println!("  {}", err);
                }
            }
            for product in report.products() {
                println!("{}. {} - Rs. {}", product.rank, product.name, product.price);
            }
            print_summary(report);
        }
    }
}

/// Print any serializable value as JSON or YAML; other formats fall back to JSON
pub fn print_structured<T: Serialize>(item: &T, format: OutputFormat) {
    match render_structured(item, format) {
        Ok(text) => println!("{}", text),
        Err(e) => print_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn render_structured<T: Serialize>(item: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(item).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(item).map_err(|e| e.to_string()),
    }
}

fn print_summary(report: &ScenarioReport) {
    let line = format!(
        "{}: {} passed, {} failed, {} skipped ({} ms)",
        report.scenario, report.passed, report.failed, report.skipped, report.duration_ms
    );
    if report.success() {
        print_success(&line);
    } else {
        print_error(&line);
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("⚠️  {}", message);
}
