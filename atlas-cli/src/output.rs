use atlas_model::ResourceKind;
use atlas_reconcile::{BootstrapSummary, Located, ResolvedResource};
use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;

const UNTITLED: &str = "(untitled)";

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn display_name(resource: &ResolvedResource) -> &str {
    if resource.name.trim().is_empty() {
        UNTITLED
    } else {
        &resource.name
    }
}

/// Table of every resource the run resolved. Page rows lead with the
/// title, collection rows with the id.
pub fn summary_table(summary: &BootstrapSummary) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Kind", "Resource", "Detail", "Outcome"]);

    for resource in summary.resources() {
        let (primary, detail) = match resource.kind {
            ResourceKind::Page => (display_name(resource).to_string(), resource.id.to_string()),
            ResourceKind::Collection => (resource.id.to_string(), display_name(resource).to_string()),
        };
        builder.push_record([
            resource.kind.as_str().to_string(),
            primary,
            detail,
            resource.outcome.as_str().to_string(),
        ]);
    }

    if let Some(entry) = &summary.change_entry {
        builder.push_record([
            "record".to_string(),
            entry.id.to_string(),
            format!("v{}", entry.key),
            entry.outcome.as_str().to_string(),
        ]);
    }
    builder.push_record([
        "record".to_string(),
        summary.audit_record_id.to_string(),
        "audit".to_string(),
        "appended".to_string(),
    ]);

    builder.build().with(Style::rounded()).to_string()
}

pub fn print_summary(summary: &BootstrapSummary, owner: &str) {
    println!("{}", summary_table(summary));
    println!("{} {}", "Owner:".cyan(), owner);
    for ambiguity in &summary.ambiguities {
        print_warning(&format!("{ambiguity}; used {}", ambiguity.chosen));
    }
    print_success(&format!("Bootstrap completed against {}", summary.provider));
}

pub fn print_summary_json(summary: &BootstrapSummary) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

pub fn print_located(name: &str, kind: ResourceKind, located: Option<&Located>) {
    match located {
        Some(located) => {
            print_success(&format!(
                "{} {:?}: {}",
                kind, located.resource.name, located.resource.id
            ));
            if let Some(ambiguity) = &located.ambiguity {
                print_warning(&ambiguity.to_string());
            }
        }
        None => print_warning(&format!("No {kind} titled {name:?}")),
    }
}
