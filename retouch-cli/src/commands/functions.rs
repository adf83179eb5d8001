//! Function catalog listing

use colored::*;
use retouch_core::domain::catalog::FunctionSpec;

use crate::config::Config;

/// Print every function in the catalog
pub fn list_functions(config: &Config) {
    println!(
        "{}",
        format!("{} function(s) available:", config.catalog.len()).bold()
    );
    println!();
    for spec in config.catalog.iter() {
        print_function(spec);
    }
}

fn print_function(spec: &FunctionSpec) {
    println!("  {} {}", "▸".cyan(), spec.function.as_str().bold());
    println!("    Label:      {}", spec.label);
    println!("    Prompt:     {}", spec.default_prompt.dimmed());
    if !spec.default_parameters.is_empty() {
        println!("    Parameters:");
        for (key, value) in &spec.default_parameters {
            println!("      {} = {}", key.cyan(), value);
        }
    }
    println!();
}
