//! Logs command implementation.

use crate::app::App;
use crate::cli::LogsArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the logs command.
pub async fn execute_logs(args: LogsArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let records = app.store().recent_logs(args.limit, args.failed)?;
    println!("{}", formatter.format_logs(&records)?);
    Ok(())
}
