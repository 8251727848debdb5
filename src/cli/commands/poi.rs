use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils, ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum PoiCommands {
    #[command(about = "List the points of interest of a city")]
    List {
        #[arg(help = "City id")]
        city_id: i32,
    },

    #[command(about = "Show a single point of interest")]
    Get {
        #[arg(help = "City id")]
        city_id: i32,
        #[arg(help = "Point of interest id")]
        id: i32,
    },

    #[command(about = "Add a point of interest to a city")]
    Create {
        #[arg(help = "City id")]
        city_id: i32,
        #[arg(long, help = "Name")]
        name: String,
        #[arg(long, help = "Description (at most 200 characters)")]
        description: Option<String>,
    },

    #[command(about = "Replace name and description of a point of interest")]
    Update {
        #[arg(help = "City id")]
        city_id: i32,
        #[arg(help = "Point of interest id")]
        id: i32,
        #[arg(long, help = "Name")]
        name: String,
        #[arg(long, help = "Description (at most 200 characters)")]
        description: Option<String>,
    },

    #[command(about = "Delete a point of interest")]
    Delete {
        #[arg(help = "City id")]
        city_id: i32,
        #[arg(help = "Point of interest id")]
        id: i32,
    },
}

pub async fn handle(cmd: PoiCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PoiCommands::List { city_id } => {
            let reply = client.get(&format!("/cities/{}/pointsofinterest", city_id), &[]).await?;
            let points = reply
                .body
                .as_ref()
                .and_then(|b| b.as_array())
                .cloned()
                .unwrap_or_default();
            utils::output_collection(output_format, "points of interest", &points, None)
        }
        PoiCommands::Get { city_id, id } => {
            let reply = client
                .get(&format!("/cities/{}/pointsofinterest/{}", city_id, id), &[])
                .await?;
            utils::output_entity(output_format, &reply.body.unwrap_or_default())
        }
        PoiCommands::Create { city_id, name, description } => {
            let body = json!({ "name": name, "description": description });
            let reply = client
                .post(&format!("/cities/{}/pointsofinterest", city_id), &body)
                .await?;
            let created = reply.body.unwrap_or_default();
            utils::output_success(
                output_format,
                &format!("Created point of interest #{} at {}", created["id"], reply.location.unwrap_or_default()),
                Some(json!({ "pointOfInterest": created })),
            )
        }
        PoiCommands::Update { city_id, id, name, description } => {
            let body = json!({ "name": name, "description": description });
            client
                .put(&format!("/cities/{}/pointsofinterest/{}", city_id, id), &body)
                .await?;
            utils::output_success(output_format, &format!("Updated point of interest #{}", id), None)
        }
        PoiCommands::Delete { city_id, id } => {
            client
                .delete(&format!("/cities/{}/pointsofinterest/{}", city_id, id))
                .await?;
            utils::output_success(output_format, &format!("Deleted point of interest #{}", id), None)
        }
    }
}
