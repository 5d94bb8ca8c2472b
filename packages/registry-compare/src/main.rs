//! Compare LegalMap and Pappers data for one SIREN.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use legalmap_client::BundleOptions;
use registry_common::{Outcome, Siren};
use registry_compare::report::outcome_text;
use registry_compare::{default_csv_path, AppConfig, CompanyReport, Comparator, ReportOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cell width in the terminal table.
const CELL_WIDTH: usize = 48;

#[derive(Parser, Debug)]
#[command(name = "registry-compare", version, about = "Comparaison LegalMap vs Pappers pour un SIREN")]
struct Cli {
    /// SIREN, 9 digits (spaces are ignored)
    siren: String,

    /// Write the comparison table as CSV (default: comparaison_<siren>.csv)
    #[arg(long, value_name = "PATH")]
    csv: Option<Option<PathBuf>>,

    /// LegalMap documents to fetch details for
    #[arg(long, default_value_t = 0)]
    enrich_top: usize,

    /// How far back the LegalMap document search reaches, in days
    #[arg(long, default_value_t = 365)]
    lookback_days: u32,

    /// Skip the per-source LLM summaries
    #[arg(long)]
    no_summaries: bool,

    /// Skip the web research report
    #[arg(long)]
    no_research: bool,

    /// Print the whole report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,registry_compare=debug,legalmap_client=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let siren = Siren::parse(&cli.siren.replace(' ', ""))
        .context("SIREN invalide: il doit contenir exactement 9 chiffres")?;

    let config = AppConfig::from_env();
    let bundle = BundleOptions::default()
        .with_enrich_top(cli.enrich_top)
        .with_lookback_days(cli.lookback_days);
    let options = ReportOptions {
        summaries: !cli.no_summaries,
        research: !cli.no_research,
    };

    let report = Comparator::from_config(&config, bundle, options)
        .run(&siren)
        .await;

    if let Some(path) = cli.csv {
        let path = path.unwrap_or_else(|| default_csv_path(&siren));
        report
            .table
            .save_csv(&path)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        eprintln!("{} {}", "CSV écrit:".green(), path.display());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &CompanyReport) {
    println!(
        "{}",
        format!("Comparaison LEGALMAP vs PAPPERS (SIREN {})", report.siren).bold()
    );

    print_source_status("LegalMap", &report.legalmap);
    print_source_status("Pappers", &report.pappers);

    println!();
    println!(
        "{} ({} champs, {} identiques)",
        "Tableau comparatif".bold(),
        report.table.len(),
        report.table.matching()
    );
    println!(
        "{:<w$}  {:<w$}  {:<w$}",
        "champ".underline(),
        "legalmap".underline(),
        "pappers".underline(),
        w = CELL_WIDTH
    );
    for row in &report.table.rows {
        let line = format!(
            "{:<w$}  {:<w$}  {:<w$}",
            cell(&row.key),
            cell(&row.left_display()),
            cell(&row.right_display()),
            w = CELL_WIDTH
        );
        if row.is_match() {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }

    if let Some(provider) = &report.summarizer {
        println!();
        println!("{} {}", "Synthèses par agent:".bold(), provider);
    }
    print_text("Synthèse à partir de LegalMap uniquement", report.legalmap_summary.as_ref());
    print_text("Synthèse à partir de Pappers uniquement", report.pappers_summary.as_ref());
    print_text("Recherche web (rapport indépendant)", report.research.as_ref());

    let cost = &report.cost;
    println!();
    println!("{}", "Estimation des coûts".bold());
    println!("- Pappers (fixe): ~{:.2} € / requête", cost.pappers_eur);
    println!(
        "- Perplexity ({}): ~{:.4} $ (estim., {} tokens in / {} out)",
        cost.perplexity_model,
        cost.perplexity_usd,
        cost.perplexity_tokens_in,
        cost.perplexity_tokens_out
    );
    println!(
        "- Synthèses: ~{} tokens en sortie (tarif du fournisseur non estimé)",
        cost.summary_tokens_out
    );
}

fn print_source_status(name: &str, outcome: &Outcome<serde_json::Value>) {
    match outcome.marker() {
        None => println!("  {} {}", "●".green(), name),
        Some(marker) => println!("  {} {}: {}", "●".red(), name, marker.message.red()),
    }
}

fn print_text(title: &str, outcome: Option<&Outcome<String>>) {
    let Some(outcome) = outcome else {
        return;
    };
    println!();
    println!("{}", title.cyan().bold());
    match outcome {
        Outcome::Ok(text) if text.trim().is_empty() => println!("{}", "(réponse vide)".dimmed()),
        Outcome::Ok(text) => println!("{text}"),
        Outcome::Degraded(_) => println!("{}", outcome_text(outcome).red()),
    }
}

/// One terminal cell: single line, cut to the column width.
fn cell(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}
