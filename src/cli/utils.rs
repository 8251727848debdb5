use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
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

/// Print a city or point of interest as `#id name - description`
pub fn output_entity(output_format: OutputFormat, entity: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entity)?),
        OutputFormat::Text => println!("{}", entity_line(entity)),
    }
    Ok(())
}

/// Output a list of entities, with pagination details when the server sent them
pub fn output_collection(
    output_format: OutputFormat,
    collection_name: &str,
    items: &[Value],
    pagination: Option<&Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ collection_name: items });
            if let Some(pagination) = pagination {
                response["pagination"] = pagination.clone();
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No {} found", collection_name);
            }
            for item in items {
                println!("{}", entity_line(item));
            }
            if let Some(p) = pagination {
                println!(
                    "Page {} of {} ({} total, {} per page)",
                    p["currentPage"], p["totalPages"], p["totalCount"], p["pageSize"]
                );
            }
        }
    }
    Ok(())
}

pub fn entity_line(entity: &Value) -> String {
    let id = &entity["id"];
    let name = entity["name"].as_str().unwrap_or("");
    match entity["description"].as_str() {
        Some(description) if !description.is_empty() => format!("#{} {} - {}", id, name, description),
        _ => format!("#{} {}", id, name),
    }
}
