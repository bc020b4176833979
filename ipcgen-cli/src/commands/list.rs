use super::{fail, ConfigArgs};
use console::style;
use ipcgen::{DispatchRule, Generator};
use std::path::Path;

/// Describe which constructors a rule dispatches to
fn shape(rule: &DispatchRule) -> String {
    let mut parts = Vec::new();
    if let Some(payload) = &rule.parameterized {
        parts.push(format!(
            "{}(context, {})",
            payload.constructor, payload.payload_type
        ));
    }
    if let Some(plain) = &rule.context_only {
        parts.push(format!("{}(context)", plain.constructor));
    }
    parts.join(" | ")
}

pub fn run(src: String, all: bool, config: ConfigArgs) {
    let generator = Generator::new(config.into_config());
    let artifact = match generator.generate_crate(Path::new(&src)) {
        Ok(artifact) => artifact,
        Err(e) => fail(e),
    };

    if artifact.table.is_empty() {
        println!("{}", style("No services found.").yellow());
    }

    for (index, rule) in artifact.table.rules().iter().enumerate() {
        println!(
            "{:>3}. {} {}",
            index + 1,
            style(&rule.target).green(),
            style(shape(rule)).dim()
        );
    }

    if all && !artifact.excluded.is_empty() {
        println!();
        println!("{}", style("Excluded:").yellow());
        for excluded in &artifact.excluded {
            println!("  {} {}: {}", style("-").dim(), excluded.name, excluded.reason);
        }
    }

    println!();
    println!(
        "{} {} service(s), {} excluded",
        style("->").cyan(),
        artifact.table.len(),
        artifact.excluded.len()
    );
}
