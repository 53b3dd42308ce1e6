//! Output abstraction for testable printing
//!
//! Results meant for the operator (the DAO address, decoded events, plan
//! listings) go through [`Output`]; diagnostics go through `tracing`.

use crate::error::CliResult;

/// Output abstraction for printing results
pub trait Output: Send + Sync {
    /// Print normal output
    fn print(&self, msg: &str) -> CliResult<()>;

    /// Print formatted JSON
    fn print_json(&self, data: &serde_json::Value) -> CliResult<()> {
        self.print(&serde_json::to_string_pretty(data)?)
    }

    /// Print error message
    fn error(&self, msg: &str) -> CliResult<()>;

    fn success(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("✅ {}", msg))
    }

    fn warning(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("⚠️  {}", msg))
    }

    /// One aligned `label value` row
    fn field(&self, label: &str, value: &str) -> CliResult<()> {
        self.print(&format!("  {:<22} {}", label, value))
    }

    /// Progress line of a multi-step deployment, e.g. `[3/6] installDepartment`
    fn step(&self, index: usize, total: usize, label: &str) -> CliResult<()> {
        self.print(&format!("[{}/{}] {}", index, total, label))
    }

    /// Print a section header
    fn header(&self, title: &str) -> CliResult<()> {
        self.print(&format!("\n{}\n{}", title, "=".repeat(title.len())))
    }
}

/// Standard console output implementation
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn print(&self, msg: &str) -> CliResult<()> {
        println!("{}", msg);
        Ok(())
    }

    fn error(&self, msg: &str) -> CliResult<()> {
        eprintln!("❌ {}", msg);
        Ok(())
    }
}
