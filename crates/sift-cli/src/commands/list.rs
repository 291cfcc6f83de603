//! List command implementation.

use crate::app::App;
use crate::cli::ListArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use sift_domain::traits::EntryStore;
use sift_domain::DataType;

/// Execute the list command.
pub async fn execute_list(args: ListArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let entries = match args.data_type {
        Some(name) => {
            let data_type = DataType::parse(&name).ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "Unknown data type '{}'. Must be one of: {}",
                    name,
                    DataType::ALL.map(|t| t.as_str()).join(", ")
                ))
            })?;
            app.store().list_by_data_type(data_type, Some(args.limit))?
        }
        None => app.store().list_range(0, args.limit)?,
    };

    println!("{}", formatter.format_entries(&entries)?);
    Ok(())
}
