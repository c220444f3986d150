use std::process::Command;

use anyhow::{Context, Result};

/// Workspace packages checked in isolation, lowest layer first.
const PACKAGES: &[&str] =
    &["tallybridge-domain", "tallybridge-core", "tallybridge-infra", "tallybridge-agent"];

/// Check that every layer compiles on its own, catching dependency leaks
/// hidden by workspace feature unification.
pub fn check_each_package() -> Result<()> {
    println!("Checking {} workspace packages in isolation...", PACKAGES.len());

    for (index, package) in PACKAGES.iter().enumerate() {
        println!("\n[{}/{}] cargo check -p {package} --all-targets", index + 1, PACKAGES.len());

        let status = Command::new("cargo")
            .args(["check", "-p", package, "--all-targets"])
            .status()
            .with_context(|| format!("Failed to run cargo check for '{package}'"))?;

        if !status.success() {
            anyhow::bail!("Package '{package}' failed to compile");
        }

        println!("✅ {package} compiled successfully");
    }

    println!("\n✅ All {} packages compile in isolation!", PACKAGES.len());
    Ok(())
}
