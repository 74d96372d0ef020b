//! Catalog command implementation

use std::path::Path;

use anyhow::Result;
use txsms_core::Catalog;

use super::load_catalog;

pub fn cmd_catalog(path: Option<&Path>, check: bool) -> Result<()> {
    let catalog = load_catalog(path)?;
    print_catalog(&catalog);

    if check {
        check_catalog(&catalog)?;
    }

    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    println!("📋 Message catalog ({})", catalog.source());
    println!("   Reference zone: {}", catalog.zone());
    println!("   Banks: {}", catalog.banks().tokens().join(", "));
    println!("   Debit verbs: {}", sorted(catalog.kinds().debit_verbs()));
    println!("   Credit verbs: {}", sorted(catalog.kinds().credit_verbs()));
    println!();

    for (i, template) in catalog.templates().iter().enumerate() {
        let fields: Vec<&str> = template.fields().iter().map(|f| f.as_str()).collect();
        println!(
            "  {:>2}. {:<28} {:<8} {} sample(s)",
            i + 1,
            template.name(),
            template.bank(),
            template.samples().len()
        );
        println!("      fields: {}", fields.join(", "));
    }
}

fn sorted<'a>(verbs: impl Iterator<Item = &'a str>) -> String {
    let mut verbs: Vec<&str> = verbs.collect();
    verbs.sort_unstable();
    verbs.join(", ")
}

/// Fail if any sample is not won by its own template
pub fn check_catalog(catalog: &Catalog) -> Result<()> {
    let samples: usize = catalog.templates().iter().map(|t| t.samples().len()).sum();
    let violations = catalog.verify();

    println!();
    if violations.is_empty() {
        println!(
            "✅ {} sample(s) across {} template(s), all won by their own template",
            samples,
            catalog.templates().len()
        );
        return Ok(());
    }

    for violation in &violations {
        println!("❌ {}", violation);
    }
    anyhow::bail!("{} precedence violation(s) in catalog", violations.len())
}
