//! Auto-group handlers: create with rules, replace rules, evaluate.

use tabled::Tabled;
use unigroup_core::{AutoGroupRules, ClientRecord, ClientView, CompiledRules, GroupManager};

use crate::cli::{AutoArgs, GlobalOpts, OutputFormat, RuleArgs};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

// ── Rule helpers ────────────────────────────────────────────────────

/// Build a rule set from flags. At least one category must be given.
fn rules_from_args(args: RuleArgs) -> Result<AutoGroupRules, CliError> {
    let rules = AutoGroupRules {
        vendor: args.vendor,
        name: args.name_pattern,
        hostname: args.hostname,
        network: args.network,
        ip: args.ip,
        mac: args.mac,
        conn_type: args
            .conn_type
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect(),
    };
    if rules.is_empty() {
        return Err(CliError::Validation {
            field: "rules".into(),
            reason: "specify at least one of --vendor, --name, --hostname, --network, --ip, --mac, --type"
                .into(),
        });
    }
    Ok(rules)
}

/// `category: a, b` lines for every non-empty category.
pub(super) fn rule_lines(rules: &AutoGroupRules) -> Vec<String> {
    rules
        .categories()
        .filter(|(_, patterns)| !patterns.is_empty())
        .map(|(category, patterns)| format!("{category}: {}", patterns.join(", ")))
        .collect()
}

fn print_rules(global: &GlobalOpts, rules: &AutoGroupRules) {
    for line in rule_lines(rules) {
        output::print_hint(global, &format!("  {line}"));
    }
}

// ── Client table ────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Type")]
    kind: String,
}

impl From<&ClientRecord> for ClientRow {
    fn from(c: &ClientRecord) -> Self {
        let text = |v: Option<&str>| v.unwrap_or("-").to_owned();
        Self {
            mac: text(c.mac()),
            name: text(c.display_name()),
            vendor: text(c.vendor()),
            network: text(c.network()),
            ip: text(c.ip()),
            kind: c.connection_type().to_string(),
        }
    }
}

fn print_clients(global: &GlobalOpts, clients: &[&ClientRecord]) -> Result<(), CliError> {
    let format = global.output_format();
    if clients.is_empty() && format == OutputFormat::Table {
        output::print_hint(global, "No matching clients");
        return Ok(());
    }
    let out = output::render_list(
        &format,
        clients,
        |c| ClientRow::from(*c),
        |c| c.mac().unwrap_or_default().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn auto(manager: &mut GroupManager, args: AutoArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let rules = rules_from_args(args.rules)?;

    if args.dry_run {
        output::print_status(global, Tone::Warning, "Preview", &format!("auto group '{}'", args.name));
        if let Some(ref description) = args.description {
            output::print_hint(global, &format!("Description: {description}"));
        }
        output::print_hint(global, "Rules:");
        print_rules(global, &rules);

        if let Some(ref path) = args.clients {
            let clients = util::read_clients(path)?;
            let compiled = CompiledRules::compile(&rules);
            let matched: Vec<&ClientRecord> = clients.iter().filter(|c| compiled.matches(*c)).collect();
            print_clients(global, &matched)?;
        }
        output::print_hint(global, "Dry run - group not created");
        return Ok(());
    }

    let (slug, group) = manager.create_group(&args.name, args.description, rules.into())?;
    output::print_status(global, Tone::Success, "Created auto group", &format!("{} ({slug})", group.name));
    if let Some(rules) = group.rules() {
        print_rules(global, rules);
    }
    output::print_hint(global, &format!("View matches: unigroup match {slug} --clients <FILE>"));
    Ok(())
}

pub fn set_rules(
    manager: &mut GroupManager,
    identifier: &str,
    args: RuleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let rules = rules_from_args(args)?;
    let group = manager.set_rules(identifier, rules)?;
    output::print_status(global, Tone::Success, "Updated rules", &group.name);
    if let Some(rules) = group.rules() {
        print_rules(global, rules);
    }
    Ok(())
}

pub fn match_clients(
    manager: &mut GroupManager,
    identifier: &str,
    clients: &std::path::Path,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let candidates = util::read_clients(clients)?;
    let matched = manager.filter_clients(identifier, &candidates)?;
    print_clients(global, &matched)
}
