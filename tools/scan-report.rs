//! Run a discovery pass over a catalog manifest and print what was found
//!
//! Usage:
//!   scan-report catalog.toml --module app --module lib=lib::store --singleton
//!   scan-report catalog.toml --settings scan.toml --json

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use dispatch_scan::utils::init_logging_from_config;
use dispatch_scan::{
    DeclaredMarkers, DiscoveryPipeline, Implementation, ModuleRef, ScanOptions, ScanSettings,
    ServiceCollection, TypeCatalog,
};

#[derive(Debug, Parser)]
#[command(name = "scan-report", about = "Discover effects and reducers in a catalog manifest")]
struct Args {
    /// Catalog manifest (TOML)
    catalog: PathBuf,

    /// Settings file (TOML or JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Module to scan, optionally narrowed as `module=namespace` (repeatable)
    #[arg(long = "module", value_name = "MODULE[=NAMESPACE]")]
    modules: Vec<String>,

    /// Register discovered services as singletons
    #[arg(long)]
    singleton: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => ScanSettings::from_file(path)?,
        None => ScanSettings::default(),
    };
    init_logging_from_config(settings.logging.as_ref());

    let catalog = TypeCatalog::from_manifest_file(&args.catalog)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;

    let mut options = ScanOptions::new(ServiceCollection::new());
    settings.apply(&mut options)?;
    for entry in &args.modules {
        match entry.split_once('=') {
            Some((module, namespace)) => {
                options.add_scan_namespace(module, namespace)?;
            }
            None => {
                options.add_scan_targets(Some(ModuleRef::new(entry.as_str())), [])?;
            }
        }
    }
    if options.scan_targets().is_empty() {
        // Nothing configured: scan every module in the catalog
        let mut modules = catalog.modules().into_iter();
        if let Some(primary) = modules.next() {
            options.add_scan_targets(Some(primary), modules)?;
        }
    }
    if args.singleton {
        options.use_singleton_registration();
    }

    let report = DiscoveryPipeline::new(catalog, DeclaredMarkers).run(&mut options)?;
    info!(
        "Scan complete: {} effects, {} reducers",
        report.effects.len(),
        report.reducers.len()
    );

    let summary = report.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Scan targets:");
    for target in options.scan_targets() {
        println!("  {}", target);
    }
    println!("Effects ({}):", summary.effects.len());
    for effect in &summary.effects {
        println!("  {}", effect);
    }
    println!("Reducers ({}):", summary.reducers.len());
    for reducer in &summary.reducers {
        let action = reducer.action_type.as_deref().unwrap_or("-");
        let note = if reducer.registered { "" } else { " (abstract host, not registered)" };
        println!("  {}::{} [{}]{}", reducer.host, reducer.method, action, note);
    }
    println!("Registrations ({}):", options.services().len());
    for descriptor in options.services().descriptors() {
        let implementation = match &descriptor.implementation {
            Implementation::SelfType => "self".to_string(),
            Implementation::Type(ty) => ty.full_name(),
            Implementation::Factory(_) => "factory".to_string(),
        };
        println!(
            "  {} {} -> {}",
            descriptor.lifetime, descriptor.service, implementation
        );
    }
    Ok(())
}
