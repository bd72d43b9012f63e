mod annotate;
mod config;
mod loader;
mod moduleinfo;
mod page;
mod resolve;
mod tooltip;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use annotate::{Annotator, CollectSink, ScanReport};
use config::Config;
use loader::InfoLoader;
use page::PageModel;
use tooltip::Tooltip;

/// TypeLens - overlay inferred types onto rendered code-review diffs
#[derive(Parser, Debug)]
#[command(name = "typelens")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page snapshot (JSON) produced by the host page adapter
    page: PathBuf,

    /// Package-info response (JSON) from the retrieval service
    #[arg(long)]
    info: PathBuf,

    /// File-kind marker to annotate (overrides TYPELENS_FILE_KIND)
    #[arg(long)]
    file_kind: Option<String>,

    /// Emit annotation payloads as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Simulate a hover over a typed span (owner id, e.g. "src/Lib.hs:8:0")
    /// and print the tooltip text
    #[arg(long)]
    hover: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = Config::resolve(args.file_kind.clone());

    let bytes = fs::read(&args.page)
        .with_context(|| format!("failed to read page snapshot {}", args.page.display()))?;
    let page: PageModel =
        serde_json::from_slice(&bytes).context("failed to parse page snapshot")?;

    // The one async boundary: request the package info, resume once it
    // arrives, then run everything else synchronously.
    let mut info_loader = InfoLoader::new();
    info_loader.load(args.info.clone());
    let mut response = None;
    while info_loader.is_loading() {
        match info_loader.poll() {
            Some(resolved) => response = resolved,
            None => thread::sleep(Duration::from_millis(10)),
        }
    }
    let response = response.ok_or_else(|| {
        anyhow::anyhow!("failed to load package info from {}", args.info.display())
    })?;

    let annotator = Annotator::new(&response, &config.file_kind);
    let mut sink = CollectSink::default();
    let scan = annotator.scan(&page, &mut sink);

    // Hover setup is independent of the scan outcome; after a fatal
    // abort it simply finds no typed spans.
    let targets = tooltip::hover_targets(&sink.payloads);
    let mut tooltip = Tooltip::new(config.fancy_arrows);
    log::info!("hover tooltip armed for {} typed spans", targets.len());

    if let Some(owner) = &args.hover {
        match targets.iter().find(|t| &t.owner == owner) {
            Some(target) => {
                tooltip.show(&target.owner, &target.type_text);
                if let Some(text) = tooltip.text() {
                    println!("{}", text);
                }
                tooltip.hide();
            }
            None => log::warn!("no typed span with owner {}", owner),
        }
    }

    let report = match scan {
        Ok(report) => report,
        Err(err) => {
            log::error!("fatal: {}", err);
            log::error!("annotation stopped for this page; try reloading it");
            log::error!("if the page structure changed upstream, please report this");
            return Err(err.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sink.payloads)?);
    } else {
        print_summary(&report, targets.len());
    }

    Ok(())
}

fn print_summary(report: &ScanReport, hover_targets: usize) {
    println!(
        "{} container(s) scanned, {} line(s) annotated, {} miss(es)",
        report.containers,
        report.annotated,
        report.misses.len()
    );
    if report.skipped_files > 0 {
        println!("{} file(s) without module info skipped", report.skipped_files);
    }
    if report.empty_containers > 0 {
        println!("{} container(s) had no diff rows", report.empty_containers);
    }
    println!("{} typed span(s) respond to hover", hover_targets);
    for miss in &report.misses {
        match miss.line {
            Some(line) => println!(
                "  miss: {} line {} ({}) - {:?}",
                miss.file_path,
                line.line_number + 1,
                line.state,
                miss.reason
            ),
            None => println!("  miss: {} - {:?}", miss.file_path, miss.reason),
        }
    }
}
