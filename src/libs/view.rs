use crate::db::users::User;
use crate::libs::import::ImportReport;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn import_report(report: &ImportReport) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["MODULE", "CREATED", "FAILED"]);
        for (module, result) in &report.results {
            table.add_row(row![module, result.created, result.failed]);
        }
        table.add_row(row!["TOTAL", report.total_created, report.total_failed]);
        table.printstd();

        for (module, result) in &report.results {
            for error in &result.errors {
                println!("  {}: {}", module, error);
            }
        }

        Ok(())
    }

    pub fn users(users: &[User]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "CREATED AT"]);
        for user in users {
            table.add_row(row![user.id, user.name, user.created_at]);
        }
        table.printstd();

        Ok(())
    }
}
