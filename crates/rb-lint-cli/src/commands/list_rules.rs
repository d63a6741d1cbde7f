//! List rules command implementation.

use rb_lint_core::Config;
use rb_lint_rules::{all_rules, all_text_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    let config = Config::default();

    println!("Available rules:\n");
    println!("{:<8} {:<32} Description", "Code", "Name");
    println!("{}", "-".repeat(96));

    for rule in all_rules(&config) {
        println!("{:<8} {:<32} {}", rule.code(), rule.name(), rule.description());
    }
    for rule in all_text_rules(&config) {
        println!(
            "{:<8} {:<32} {} (.{})",
            rule.code(),
            rule.name(),
            rule.description(),
            rule.extensions().join(", .")
        );
    }

    println!("\nPresets:");
    for preset in Preset::ALL {
        let mut codes: Vec<&str> = preset.rules(&config).iter().map(|r| r.code()).collect();
        codes.extend(preset.text_rules(&config).iter().map(|r| r.code()));
        let marker = if preset == Preset::Recommended { " (default)" } else { "" };
        println!("  {:<12} {}{}", preset.name(), codes.join(", "), marker);
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  rb-lint check --rules require-constant-prefix,no-reload");
    println!("  rb-lint check --rules RBL001,RBL005");
}
