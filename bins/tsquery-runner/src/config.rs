use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use tsquery_client::ClientConfig;

use crate::error::RunnerError;

#[derive(Parser)]
#[command(name = "tsquery-runner", about = "Run queries against a time-series query service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured queries and print every decoded row
    Run(RunArgs),
    /// Cancel a running query
    Cancel(CancelArgs),
    /// Start the first configured query and cancel it right away
    TryCancel(CommonArgs),
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    /// Path to the TOML config file
    #[arg(long, default_value = "runner.toml", env = "TSQUERY_CONFIG")]
    pub config: String,

    /// Query service endpoint, overrides `[client].endpoint`
    #[arg(long, env = "TSQUERY_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Run this SQL instead of the configured queries
    #[arg(long)]
    pub query: Option<String>,

    /// Run only the configured query with this name
    #[arg(long, conflicts_with = "query")]
    pub name: Option<String>,

    /// Append `LIMIT n` to every query (forces small multi-page results)
    #[arg(long)]
    pub limit: Option<u64>,

    /// Stop a query after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,
}

#[derive(Args, Clone, Debug)]
pub struct CancelArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Id of the query to cancel
    #[arg(long)]
    pub query_id: String,
}

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct RunnerConfig {
    pub client: Option<ClientConfig>,
    pub max_pages: Option<usize>,
    #[serde(default)]
    pub queries: Vec<QueryConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryConfig {
    pub name: String,
    pub sql: String,
}

pub fn load_config(path: &str) -> Result<RunnerConfig, RunnerError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| RunnerError::Config(format!("cannot read config {path}: {e}")))?;
    parse_config(&content).map_err(|e| RunnerError::Config(format!("bad config {path}: {e}")))
}

fn parse_config(content: &str) -> Result<RunnerConfig, toml::de::Error> {
    toml::from_str(content)
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Final settings after merging: config file < env/CLI.
#[derive(Debug)]
pub struct Effective {
    pub client: ClientConfig,
    pub queries: Vec<QueryConfig>,
    pub max_pages: Option<usize>,
}

impl Effective {
    pub fn new(args: &CommonArgs) -> Result<Self, RunnerError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                tracing::debug!(config = %args.config, "config file not found, using CLI settings only");
                RunnerConfig::default()
            }
        };
        Self::merge(args, cfg)
    }

    fn merge(args: &CommonArgs, cfg: RunnerConfig) -> Result<Self, RunnerError> {
        let client = match (args.endpoint.clone(), cfg.client) {
            (Some(endpoint), Some(mut client)) => {
                client.endpoint = endpoint;
                client
            }
            (Some(endpoint), None) => ClientConfig::new(endpoint),
            (None, Some(client)) => client,
            (None, None) => {
                return Err(RunnerError::Config(
                    "no endpoint: set [client].endpoint or pass --endpoint".into(),
                ));
            }
        };

        Ok(Self {
            client,
            queries: cfg.queries,
            max_pages: cfg.max_pages,
        })
    }

    /// Apply `run` flags: query selection, `LIMIT` and page bound.
    pub fn with_run_args(mut self, args: &RunArgs) -> Result<Self, RunnerError> {
        if let Some(ref sql) = args.query {
            self.queries = vec![QueryConfig {
                name: "adhoc".into(),
                sql: sql.clone(),
            }];
        } else if let Some(ref name) = args.name {
            let available: Vec<String> = self.queries.iter().map(|q| q.name.clone()).collect();
            self.queries.retain(|q| q.name == *name);
            if self.queries.is_empty() {
                return Err(RunnerError::Config(format!(
                    "unknown query: {name}\navailable: {}",
                    available.join(" ")
                )));
            }
        }

        if self.queries.is_empty() {
            return Err(RunnerError::Config(
                "no queries: add [[queries]] to the config or pass --query".into(),
            ));
        }

        if let Some(limit) = args.limit {
            for q in &mut self.queries {
                q.sql = with_limit(&q.sql, limit);
            }
        }

        self.max_pages = args.max_pages.or(self.max_pages);
        Ok(self)
    }
}

/// `SELECT ...` → `SELECT ... LIMIT n`, dropping a trailing `;`.
pub fn with_limit(sql: &str, limit: u64) -> String {
    let sql = sql.trim_end();
    let sql = sql.strip_suffix(';').unwrap_or(sql).trim_end();
    format!("{sql} LIMIT {limit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        max_pages = 50

        [client]
        endpoint = "http://127.0.0.1:9300"
        max_rows = 500

        [[queries]]
        name = "select-all"
        sql = "SELECT * FROM BottlerDB.FactoryData"

        [[queries]]
        name = "binned"
        sql = "SELECT BIN(time, 30s) AS binned_timestamp FROM BottlerDB.FactoryData;"
    "#;

    fn common(endpoint: Option<&str>) -> CommonArgs {
        CommonArgs {
            config: "unused.toml".into(),
            endpoint: endpoint.map(str::to_string),
        }
    }

    fn run_args() -> RunArgs {
        RunArgs {
            common: common(None),
            query: None,
            name: None,
            limit: None,
            max_pages: None,
        }
    }

    #[test]
    fn parses_sample_config() {
        let cfg = parse_config(SAMPLE).unwrap();
        let client = cfg.client.unwrap();
        assert_eq!(client.endpoint, "http://127.0.0.1:9300");
        assert_eq!(client.max_rows, Some(500));
        assert_eq!(client.max_retries, 10);
        assert_eq!(cfg.max_pages, Some(50));
        assert_eq!(cfg.queries.len(), 2);
        assert_eq!(cfg.queries[1].name, "binned");
    }

    #[test]
    fn cli_endpoint_overrides_file() {
        let eff = Effective::merge(&common(Some("https://other:443")), parse_config(SAMPLE).unwrap()).unwrap();
        assert_eq!(eff.client.endpoint, "https://other:443");
        assert_eq!(eff.client.max_rows, Some(500));
    }

    #[test]
    fn endpoint_is_required() {
        let err = Effective::merge(&common(None), RunnerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no endpoint"), "{err}");
    }

    #[test]
    fn adhoc_query_replaces_configured_ones() {
        let eff = Effective::merge(&common(None), parse_config(SAMPLE).unwrap()).unwrap();
        let args = RunArgs {
            query: Some("SELECT 1".into()),
            ..run_args()
        };
        let eff = eff.with_run_args(&args).unwrap();
        assert_eq!(eff.queries, vec![QueryConfig { name: "adhoc".into(), sql: "SELECT 1".into() }]);
    }

    #[test]
    fn select_by_name_and_limit() {
        let eff = Effective::merge(&common(None), parse_config(SAMPLE).unwrap()).unwrap();
        let args = RunArgs {
            name: Some("binned".into()),
            limit: Some(10),
            max_pages: Some(2),
            ..run_args()
        };
        let eff = eff.with_run_args(&args).unwrap();
        assert_eq!(eff.queries.len(), 1);
        assert_eq!(
            eff.queries[0].sql,
            "SELECT BIN(time, 30s) AS binned_timestamp FROM BottlerDB.FactoryData LIMIT 10"
        );
        assert_eq!(eff.max_pages, Some(2));
    }

    #[test]
    fn unknown_name_lists_available() {
        let eff = Effective::merge(&common(None), parse_config(SAMPLE).unwrap()).unwrap();
        let args = RunArgs {
            name: Some("nope".into()),
            ..run_args()
        };
        let err = eff.with_run_args(&args).unwrap_err();
        assert!(err.to_string().contains("available: select-all binned"), "{err}");
    }

    #[test]
    fn no_queries_is_an_error() {
        let eff = Effective::merge(&common(Some("http://localhost")), RunnerConfig::default()).unwrap();
        assert!(eff.with_run_args(&run_args()).is_err());
    }

    #[test]
    fn example_config_parses() {
        let cfg = parse_config(include_str!("../runner.example.toml")).unwrap();
        assert!(cfg.client.is_some());
        assert_eq!(cfg.queries.len(), 3);
        assert!(cfg.queries[2].sql.contains("INTERPOLATE_LINEAR"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "tsquery-runner", "run", "--endpoint", "http://localhost:9300", "--query", "SELECT 1", "--max-pages", "3",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.common.endpoint.as_deref(), Some("http://localhost:9300"));
        assert_eq!(args.max_pages, Some(3));
    }

    #[test]
    fn limit_appends_once() {
        assert_eq!(with_limit("SELECT 1 ;  ", 5), "SELECT 1 LIMIT 5");
        assert_eq!(with_limit("SELECT 1", 5), "SELECT 1 LIMIT 5");
    }
}
