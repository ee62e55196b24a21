use std::path::PathBuf;

use bakul_types::ItemId;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bakul",
    about = "Bakul: typed node trees with schema-driven properties",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./bakul.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file holding the item tree
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered node types and their fields
    Types,
    /// Create a node
    Create(CreateArgs),
    /// Bind a node to a node type
    SetType(SetTypeArgs),
    /// Set property values on a node
    Set(SetArgs),
    /// Print one property value
    Get(GetArgs),
    /// List a node's properties
    Props(NodeArgs),
    /// Check which properties a node has
    Has(HasArgs),
    /// Print a subtree
    Tree(TreeArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    pub name: String,
    /// Node type to bind right away
    #[arg(long = "type")]
    pub node_type: Option<String>,
    #[arg(long)]
    pub parent: Option<ItemId>,
    /// Property assignment, `name=value`; repeatable
    #[arg(long = "set", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct SetTypeArgs {
    pub id: ItemId,
    pub node_type: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    pub id: ItemId,
    #[arg(required = true, value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub id: ItemId,
    pub property: String,
}

#[derive(Args, Debug)]
pub struct NodeArgs {
    pub id: ItemId,
}

#[derive(Args, Debug)]
pub struct HasArgs {
    pub id: ItemId,
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    pub id: ItemId,
    #[arg(long, default_value = "3")]
    pub depth: usize,
}

/// Split `name=value` at the first `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got {s:?}")),
    }
}
