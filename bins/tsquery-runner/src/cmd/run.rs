use std::io::Write;

use futures::StreamExt;

use tsquery_api::PageFetcher;
use tsquery_client::QueryClient;
use tsquery_engine::{Paginator, render_record};

use crate::config::{Effective, RunArgs};
use crate::error::RunnerError;

pub async fn execute(args: RunArgs) -> Result<(), RunnerError> {
    let eff = Effective::new(&args.common)?.with_run_args(&args)?;
    run(&eff).await
}

/// Run every query in turn. A failing query is logged and the rest still run.
pub async fn run(eff: &Effective) -> Result<(), RunnerError> {
    let client = QueryClient::new(eff.client.clone())?;
    tracing::info!(
        endpoint = %eff.client.endpoint,
        queries = eff.queries.len(),
        max_pages = ?eff.max_pages,
        "tsquery-runner starting"
    );

    let mut paginator = Paginator::new(client);
    if let Some(max) = eff.max_pages {
        paginator = paginator.with_max_pages(max);
    }

    let mut out = std::io::stdout();
    let mut failed = 0usize;

    for (i, q) in eff.queries.iter().enumerate() {
        writeln!(out, "Running query {} : {}", i + 1, q.sql)?;
        match print_query(&paginator, &q.sql, &mut out).await {
            Ok(rows) => tracing::info!(query = %q.name, rows, "query finished"),
            Err(e) => {
                failed += 1;
                tracing::error!(query = %q.name, error = %e, "error while querying");
            }
        }
    }

    if failed > 0 {
        return Err(RunnerError::QueriesFailed {
            failed,
            total: eff.queries.len(),
        });
    }
    Ok(())
}

/// Print metadata and rendered rows of every page. Returns the row count.
pub(crate) async fn print_query<F, W>(
    paginator: &Paginator<F>,
    sql: &str,
    out: &mut W,
) -> Result<usize, RunnerError>
where
    F: PageFetcher,
    W: Write,
{
    let pages = paginator.pages(sql);
    futures::pin_mut!(pages);

    let mut rows = 0usize;
    while let Some(page) = pages.next().await {
        let page = page?;
        writeln!(out, "Metadata: {}", serde_json::to_string(&page.columns)?)?;
        writeln!(out, "Data: ")?;
        for record in &page.records {
            writeln!(out, "{}", render_record(&page.columns, record))?;
        }
        rows += page.records.len();
    }
    Ok(rows)
}
