use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::time::Duration;

use crate::db::store::StoreError;

pub async fn create_mongo_client(uri: &str) -> Result<Client, StoreError> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some("tripolingo-api".to_string());
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // Stable API, MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client
        .database("admin")
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
    {
        Ok(_) => log::info!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping test failed: {}", e);
            log::warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Ok(client)
}
