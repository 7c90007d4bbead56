use crate::item::ItemKind;
use crate::tracing::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Search documentation indexes across packages", long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/docsearch/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct PayloadArgs {
    /// Payload files (`search-index.js` or JSON); defaults to the config's list
    pub payloads: Vec<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one query and print ranked results
    Query {
        text: String,
        #[command(flatten)]
        payloads: PayloadArgs,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[arg(short = 'p', long)]
        package: Option<String>,
        /// Restrict results to kinds; repeatable
        #[arg(short, long = "kind", value_parser = parse_kind)]
        kinds: Vec<ItemKind>,
        /// Print hits as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Serve the `search`, `reload` and `list_packages` tools over MCP stdio
    Serve {
        #[command(flatten)]
        payloads: PayloadArgs,
    },
}

fn parse_kind(s: &str) -> Result<ItemKind, String> {
    s.parse().map_err(|e: crate::item::UnknownKind| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query() {
        let cli = Cli::try_parse_from([
            "docsearch", "query", "Packet", "a.js", "b.json", "-n", "5", "-p", "telephone",
            "-k", "struct", "--kind", "fn",
        ])
        .unwrap();

        let_assert!(
            Commands::Query {
                text,
                payloads,
                limit,
                package,
                kinds,
                json,
            } = cli.command
        );
        check!(text == "Packet");
        check!(payloads.payloads == [PathBuf::from("a.js"), PathBuf::from("b.json")]);
        check!(limit == Some(5));
        check!(package.as_deref() == Some("telephone"));
        check!(kinds == [ItemKind::Struct, ItemKind::Function]);
        check!(!json);
    }

    #[test]
    fn test_rejects_unknown_kind() {
        check!(Cli::try_parse_from(["docsearch", "query", "x", "-k", "gizmo"]).is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["docsearch", "serve", "--config", "c.toml"]).unwrap();
        check!(cli.config == Some(PathBuf::from("c.toml")));
        check!(matches!(cli.command, Commands::Serve { .. }));
    }
}
