use tsquery_client::QueryClient;

use crate::config::{CancelArgs, CommonArgs, Effective};
use crate::error::RunnerError;

pub async fn execute(args: CancelArgs) -> Result<(), RunnerError> {
    let eff = Effective::new(&args.common)?;
    let client = QueryClient::new(eff.client)?;
    cancel(&client, &args.query_id).await
}

/// Start the first configured query and cancel it by the id the service returns.
///
/// Can fail with "already finished" style service errors when the table is
/// small enough for the query to complete before the cancellation lands.
pub async fn try_cancel(args: CommonArgs) -> Result<(), RunnerError> {
    let eff = Effective::new(&args)?;
    let query = eff
        .queries
        .first()
        .ok_or_else(|| RunnerError::Config("no [[queries]] configured".into()))?;
    let client = QueryClient::new(eff.client.clone())?;

    println!("Running query: {}", query.sql);
    let page = client.query(&query.sql, None).await?;
    let query_id = page.query_id.ok_or(RunnerError::MissingQueryId)?;
    tracing::info!(query = %query.name, %query_id, "query started");

    cancel(&client, &query_id).await
}

async fn cancel(client: &QueryClient, query_id: &str) -> Result<(), RunnerError> {
    println!("Sending cancellation for query: {query_id}");
    match client.cancel(query_id).await? {
        Some(message) => println!("{message}"),
        None => println!("Query has been cancelled successfully"),
    }
    Ok(())
}
