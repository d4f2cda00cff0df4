use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use cortxfs_hist::config::{Config, parse_rec_limit};
use cortxfs_hist::constants::DEFAULT_CONFIG_PATH;
use cortxfs_hist::error::Result;
use cortxfs_hist::report::{ReportConfig, SortOrder};

/// Histogram of per-operation execution times from a CORTXFS perfc database
#[derive(Debug, Parser)]
#[command(
    name = "cortxfs-hist",
    version,
    about = "Display a histogram graph of a provided cortxfs function",
    long_about = "Reads init/finish records of a profiled CORTXFS function from the performance database (entity_states table) and renders the execution time of each operation as an SVG bar chart.",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    /// Enable verbose output (debug level)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Suppress non-error output (error level only)
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path (optional, defaults are used when missing)
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 记录上限：`None` 表示不限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecLimit(pub Option<u32>);

fn parse_limit_arg(value: &str) -> std::result::Result<RecLimit, String> {
    parse_rec_limit(value).map(RecLimit)
}

fn parse_sort_arg(value: &str) -> std::result::Result<SortOrder, String> {
    match value.trim().to_ascii_uppercase().as_str() {
        "YES" => Ok(SortOrder::Duration),
        "NA" | "NO" => Ok(SortOrder::Selection),
        other => Err(format!("expected 'YES' or 'NA', got '{other}'")),
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// A valid fn_tag from the CORTXFS stack which is enabled for performance profiling (SQL LIKE pattern)
    #[arg(required = true)]
    pub fn_tag: Option<String>,

    /// Performance database [default: cortxfs_perfc.db]
    #[arg(short = 'd', long = "db")]
    pub db: Option<String>,

    /// How many max opids to show in a single graph, 'NA' for no limit [default: 10]
    #[arg(short = 'l', long = "rec_limit", value_parser = parse_limit_arg)]
    pub rec_limit: Option<RecLimit>,

    /// Lower bound of the opids shown, used along with the limit [default: 0]
    #[arg(short = 's', long = "start_opid", visible_alias = "so")]
    pub start_opid: Option<i64>,

    /// 'YES' sorts the samples by execution time (ascending), 'NA' keeps opid order [default: NA]
    #[arg(
        short = 't',
        long = "sort_option",
        visible_alias = "sort-by-time",
        value_parser = parse_sort_arg
    )]
    pub sort_option: Option<SortOrder>,

    /// Histogram graph output file (SVG) [default: cortxfs_hist_graph.svg]
    #[arg(short = 'o', long = "op_graph")]
    pub op_graph: Option<String>,

    /// Also export the samples as CSV to this file
    #[arg(long = "csv")]
    pub csv: Option<String>,
}

impl ReportArgs {
    /// 命令行参数覆盖配置文件，返回本次运行的报告参数
    pub fn resolve(&self, cfg: &mut Config) -> Result<ReportConfig> {
        if let Some(db) = &self.db {
            cfg.database.path.clone_from(db);
        }
        if let Some(op_graph) = &self.op_graph {
            cfg.report.op_graph.clone_from(op_graph);
        }
        if let Some(csv) = &self.csv {
            cfg.report.csv = Some(csv.clone());
        }

        let limit = match self.rec_limit {
            Some(RecLimit(limit)) => limit,
            None => cfg.report.limit()?,
        };

        Ok(ReportConfig {
            fn_tag: self.fn_tag.clone().unwrap_or_default(),
            limit,
            start_opid: self.start_opid.unwrap_or(cfg.report.start_opid),
            sort: self.sort_option.unwrap_or_else(|| cfg.report.sort_order()),
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a default configuration file
    Init {
        /// Output configuration file path
        #[arg(short = 'o', long = "output", default_value = DEFAULT_CONFIG_PATH)]
        output: String,
        /// Force overwrite if file exists
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Validate the configuration file and the database schema
    Validate,
    /// Generate shell completion scripts
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completions
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
    }
}
