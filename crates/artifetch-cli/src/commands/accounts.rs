//! Accounts command - list configured accounts

use console::style;

use artifetch_repo::CredentialsRepository;

use crate::error::Result;

pub fn run(accounts: &CredentialsRepository, json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = accounts
            .all()
            .map(|c| {
                serde_json::json!({
                    "name": c.name(),
                    "providerType": c.provider_type().as_str(),
                    "types": c.types(),
                    "listable": c.lister().is_some(),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(entries));
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts configured.");
        println!();
        println!(
            "Enable a provider section in {} to add one.",
            style("artifacts.yaml").cyan()
        );
        return Ok(());
    }

    println!("{}", style("Accounts:").bold());
    println!();
    for credentials in accounts.all() {
        println!(
            "  {} ({})",
            style(credentials.name()).cyan().bold(),
            credentials.provider_type()
        );
        println!("    Types: {}", credentials.types().join(", "));
    }

    Ok(())
}
