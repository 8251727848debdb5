use clap::Subcommand;

use crate::cli::{utils, ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum CityCommands {
    #[command(about = "List cities, optionally filtered and paged")]
    List {
        #[arg(long, help = "Exact city name (case-insensitive)")]
        name: Option<String>,
        #[arg(long, help = "Text to look for in name or description")]
        search: Option<String>,
        #[arg(long, help = "Page number, starting at 1")]
        page: Option<i64>,
        #[arg(long, help = "Page size (the server caps it)")]
        page_size: Option<i64>,
    },

    #[command(about = "Show a single city")]
    Get {
        #[arg(help = "City id")]
        id: i32,
        #[arg(long, help = "Include the city's points of interest")]
        include_points: bool,
    },
}

pub async fn handle(cmd: CityCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CityCommands::List { name, search, page, page_size } => {
            let mut query = Vec::new();
            if let Some(name) = name {
                query.push(("name", name));
            }
            if let Some(search) = search {
                query.push(("searchQuery", search));
            }
            if let Some(page) = page {
                query.push(("pageNumber", page.to_string()));
            }
            if let Some(page_size) = page_size {
                query.push(("pageSize", page_size.to_string()));
            }

            let reply = client.get("/cities", &query).await?;
            let cities = reply
                .body
                .as_ref()
                .and_then(|b| b.as_array())
                .cloned()
                .unwrap_or_default();
            utils::output_collection(output_format, "cities", &cities, reply.pagination.as_ref())
        }
        CityCommands::Get { id, include_points } => {
            let query = [("includePointsOfInterest", include_points.to_string())];
            let reply = client.get(&format!("/cities/{}", id), &query).await?;
            let city = reply.body.unwrap_or_default();

            utils::output_entity(output_format, &city)?;
            if let (OutputFormat::Text, Some(points)) = (output_format, city["pointsOfInterest"].as_array()) {
                for point in points {
                    println!("  {}", utils::entity_line(point));
                }
            }
            Ok(())
        }
    }
}
