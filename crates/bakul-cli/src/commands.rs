use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bakul_node::{Node, NodeService};
use bakul_property::PropertyValue;
use bakul_schema::InMemorySchemaRegistry;
use bakul_tree::{InMemoryItemStore, Item, ItemStore};
use bakul_types::ItemId;
use colored::Colorize;
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref(), cli.data)?;
    let session = Session::open(&config)?;
    print!("{}", session.execute(cli.command)?);
    Ok(())
}

/// A loaded item tree plus the configured schema.
///
/// Mutating commands write the snapshot back only when they succeed
/// completely.
pub struct Session {
    store: Arc<InMemoryItemStore>,
    service: NodeService,
    data: PathBuf,
}

impl Session {
    pub fn open(config: &CliConfig) -> anyhow::Result<Self> {
        let store = if config.data.exists() {
            InMemoryItemStore::load_from(&config.data)
                .with_context(|| format!("loading {}", config.data.display()))?
        } else {
            InMemoryItemStore::new()
        };
        let store = Arc::new(store);

        let registry = InMemorySchemaRegistry::new();
        config.schema.apply(&registry).context("applying schema")?;

        let service = NodeService::with_config(store.clone(), Arc::new(registry), config.node.clone());
        debug!(data = %config.data.display(), items = store.len()?, "opened session");
        Ok(Self {
            store,
            service,
            data: config.data.clone(),
        })
    }

    pub fn execute(&self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Types => self.cmd_types(),
            Command::Create(args) => self.persisting(|| self.cmd_create(args)),
            Command::SetType(args) => self.persisting(|| self.cmd_set_type(args)),
            Command::Set(args) => self.persisting(|| self.cmd_set(args)),
            Command::Get(args) => self.cmd_get(args),
            Command::Props(args) => self.cmd_props(args),
            Command::Has(args) => self.cmd_has(args),
            Command::Tree(args) => self.cmd_tree(args),
        }
    }

    fn persisting(&self, f: impl FnOnce() -> anyhow::Result<String>) -> anyhow::Result<String> {
        let output = f()?;
        self.store
            .save_to(&self.data)
            .with_context(|| format!("saving {}", self.data.display()))?;
        Ok(output)
    }

    fn node(&self, id: ItemId) -> anyhow::Result<Node> {
        Ok(self.service.get_node(id)?)
    }

    /// Parse each raw value as its property's kind, then write them all.
    fn assign(&self, node: &Node, assignments: &[(String, String)]) -> anyhow::Result<Vec<Item>> {
        let mut pairs = Vec::with_capacity(assignments.len());
        for (name, raw) in assignments {
            if self.service.config().is_reserved(name) {
                continue;
            }
            let item = self.service.property(node, name)?;
            let kind = item
                .property()
                .map(|typed| typed.kind())
                .with_context(|| format!("{name} is not a property"))?;
            let value = PropertyValue::parse_as(kind, raw)?;
            pairs.push((name.clone(), value));
        }
        Ok(self.service.set_property(node, pairs)?)
    }

    fn cmd_types(&self) -> anyhow::Result<String> {
        let schema = self.service.schema();
        let mut out = String::new();
        for node_type in schema.node_types()? {
            if node_type.is_untyped() {
                writeln!(out, "{} {}", node_type.name.bold(), "(untyped)".dimmed())?;
                continue;
            }
            writeln!(out, "{}", node_type.name.bold())?;
            if let Some(description) = &node_type.description {
                writeln!(out, "  {}", description.dimmed())?;
            }
            for spec in schema.property_specs(&node_type)? {
                writeln!(out, "  {}: {}", spec.name, spec.kind.to_string().cyan())?;
            }
        }
        Ok(out)
    }

    fn cmd_create(&self, args: CreateArgs) -> anyhow::Result<String> {
        let parent = args.parent.map(|id| self.node(id)).transpose()?;
        let node = self.service.create_node(parent.as_ref(), Some(&args.name))?;
        if let Some(node_type) = &args.node_type {
            self.service.set_node_type(&node, node_type)?;
        }
        if !args.assignments.is_empty() {
            self.assign(&node, &args.assignments)?;
        }

        let item = self.service.item(&node)?;
        let mut out = String::new();
        writeln!(
            out,
            "{} Created node {} <{}>",
            "✓".green().bold(),
            args.name.bold(),
            item.id.to_string().yellow()
        )?;
        writeln!(out, "  uuid: {}", item.uuid.as_str().dimmed())?;
        if let Some(node_type) = item.node_type() {
            writeln!(out, "  type: {}", node_type.cyan())?;
        }
        Ok(out)
    }

    fn cmd_set_type(&self, args: SetTypeArgs) -> anyhow::Result<String> {
        let node = self.node(args.id)?;
        let node_type = self.service.set_node_type(&node, &args.node_type)?;
        let count = self.service.properties(&node)?.count();
        Ok(format!(
            "{} Bound <{}> to {} ({} properties)\n",
            "✓".green().bold(),
            args.id.to_string().yellow(),
            node_type.name.cyan(),
            count
        ))
    }

    fn cmd_set(&self, args: SetArgs) -> anyhow::Result<String> {
        let node = self.node(args.id)?;
        let updated = self.assign(&node, &args.assignments)?;
        let mut out = String::new();
        for item in updated {
            if let (Some(name), Some(typed)) = (&item.name, item.property()) {
                writeln!(out, "  {} = {}", name.bold(), typed.value())?;
            }
        }
        Ok(out)
    }

    fn cmd_get(&self, args: GetArgs) -> anyhow::Result<String> {
        let node = self.node(args.id)?;
        let value = self.service.get_value(&node, &args.property)?;
        Ok(format!("{value}\n"))
    }

    fn cmd_props(&self, args: NodeArgs) -> anyhow::Result<String> {
        let node = self.node(args.id)?;
        let mut out = String::new();
        for item in self.service.properties(&node)? {
            if let (Some(name), Some(typed)) = (&item.name, item.property()) {
                writeln!(
                    out,
                    "{} {} = {}",
                    name.bold(),
                    format!("({})", typed.kind()).dimmed(),
                    typed.value()
                )?;
            }
        }
        if out.is_empty() {
            out.push_str("No properties.\n");
        }
        Ok(out)
    }

    fn cmd_has(&self, args: HasArgs) -> anyhow::Result<String> {
        let node = self.node(args.id)?;
        let flags = self
            .service
            .has_properties(&node, args.names.as_slice(), false)?;
        let mut out = String::new();
        for (name, present) in args.names.iter().zip(flags) {
            let mark = if present { "yes".green() } else { "no".red() };
            writeln!(out, "{name}: {mark}")?;
        }
        Ok(out)
    }

    fn cmd_tree(&self, args: TreeArgs) -> anyhow::Result<String> {
        let node = self.node(args.id)?;
        let mut out = String::new();
        for line in self.service.dump_tree(&node, args.depth)? {
            let line = line?;
            let name = line.name.as_deref().unwrap_or("");
            writeln!(out, "{line} {} {}", name.bold(), line.label.dimmed())?;
        }
        Ok(out)
    }
}
