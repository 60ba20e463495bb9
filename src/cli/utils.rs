use std::io::Read;

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::Pagination;
use crate::cli::OutputFormat;
use crate::error::ClientError;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error in the appropriate format
pub fn output_error(output_format: OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Report a failed command, keeping the client error code when there is one.
pub fn report_failure(output_format: OutputFormat, error: &anyhow::Error) -> anyhow::Result<()> {
    match error.downcast_ref::<ClientError>() {
        Some(client_error) => output_error(output_format, &client_error.to_string(), Some(client_error.error_code())),
        None => output_error(output_format, &error.to_string(), None),
    }
}

/// Output a list of records, one rendered line per record in text mode
pub fn output_records<T, F>(
    output_format: OutputFormat,
    collection_name: &str,
    items: &[T],
    pagination: Option<&Pagination>,
    render: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ collection_name: items });
            if let Some(pagination) = pagination {
                response["pagination"] = serde_json::to_value(pagination)?;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No {} found", collection_name);
            }
            for item in items {
                println!("{}", render(item));
            }
            if let Some(p) = pagination.filter(|p| p.total_pages > 1) {
                println!("Page {} of {} ({} total)", p.page, p.total_pages, p.total);
            }
        }
    }
    Ok(())
}

/// Output a single value as pretty JSON, or as rendered text
pub fn output_value<T, F>(output_format: OutputFormat, item_type: &str, item: &T, render: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ item_type: item }))?);
        }
        OutputFormat::Text => {
            println!("{}", render(item));
        }
    }
    Ok(())
}

/// Read a JSON document from stdin
pub fn read_json_stdin() -> anyhow::Result<Value> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Err(anyhow::anyhow!("Expected a JSON document on stdin"));
    }
    Ok(serde_json::from_str(&input)?)
}

/// Read one line from stdin, without the trailing newline
pub fn read_line_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse a `field=value` filter; the value is taken as JSON when it parses, as a string otherwise
pub fn parse_filter(raw: &str) -> anyhow::Result<(String, Value)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Filter '{}' must look like field=value", raw))?;

    if field.trim().is_empty() {
        return Err(anyhow::anyhow!("Filter '{}' has no field name", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((field.trim().to_string(), value))
}
