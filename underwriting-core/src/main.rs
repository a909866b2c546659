//! Underwriting XAI - Command Line Entry Point
//!
//! Runs one analysis for the applicant given on the command line, prints the
//! attribution chart and the decision letter, and optionally saves the letter.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use underwriting_core::constants;
use underwriting_core::logic::dataset::DatasetWriter;
use underwriting_core::logic::explain::render_text;
use underwriting_core::{
    Analysis, AnalysisRequest, ApplicationRecord, Decision, LetterComposer, LetterConfig, Pipeline,
    PipelineConfig,
};

#[derive(Debug, Parser)]
#[command(name = "underwrite", version, about = "Explain an underwriting decision and draft the letter")]
struct Cli {
    /// Applicant name
    #[arg(long, default_value = "John Doe")]
    name: String,

    /// Policy number
    #[arg(long, default_value = "POL-2024-001")]
    policy: String,

    /// Credit score (300-850)
    #[arg(long, default_value_t = 700.0)]
    credit_score: f64,

    /// Age (18-100)
    #[arg(long, default_value_t = 35.0)]
    age: f64,

    /// Annual income (0-1,000,000)
    #[arg(long, default_value_t = 50_000.0)]
    income: f64,

    /// Number of previous claims (0-10)
    #[arg(long, default_value_t = 0)]
    claims_history: u32,

    /// Coverage amount (0-1,000,000)
    #[arg(long, default_value_t = 100_000.0)]
    coverage_amount: f64,

    /// Underwriter's decision: Approved or Rejected
    #[arg(long, default_value = "Approved")]
    decision: Decision,

    /// Clamp out-of-range inputs instead of rejecting them
    #[arg(long)]
    clamp: bool,

    /// Never call the text generation service
    #[arg(long)]
    offline: bool,

    /// Directory to save the letter into
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the full analysis as JSON
    #[arg(long)]
    json: bool,

    /// Write the training corpus as JSONL (default: the local data directory)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    export_corpus: Option<Option<PathBuf>>,
}

impl Cli {
    fn record(&self) -> anyhow::Result<ApplicationRecord> {
        if self.clamp {
            return Ok(ApplicationRecord::clamped(
                self.credit_score,
                self.age,
                self.income,
                self.claims_history,
                self.coverage_amount,
            ));
        }
        ApplicationRecord::new(
            self.credit_score,
            self.age,
            self.income,
            self.claims_history,
            self.coverage_amount,
        )
        .context("invalid applicant data (use --clamp to clamp into range)")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    let record = cli.record()?;

    let composer = if cli.offline {
        LetterComposer::offline()
    } else {
        let letter_config = LetterConfig::from_env();
        if !letter_config.is_configured() {
            log::info!("OPENAI_API_KEY not set - letters will use the template");
        }
        LetterComposer::from_config(&letter_config)?
    };

    let pipeline = Pipeline::new(PipelineConfig::from_env(), composer);

    if let Some(dir) = &cli.export_corpus {
        let writer = match dir {
            Some(dir) => DatasetWriter::from_path(dir.clone()),
            None => DatasetWriter::new(),
        };
        writer
            .write_corpus(&pipeline.corpus()?)
            .with_context(|| format!("failed to export corpus to {}", writer.base_dir().display()))?;
        if let Ok((files, size_mb)) = writer.get_stats() {
            log::debug!("Corpus directory holds {} exports ({:.2} MB)", files, size_mb);
        }
    }

    let analysis = pipeline
        .run(AnalysisRequest {
            applicant_name: cli.name.clone(),
            policy_number: cli.policy.clone(),
            decision: cli.decision,
            record,
        })
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&analysis);
    }

    if let Some(dir) = &cli.out_dir {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&analysis.letter_file_name);
        std::fs::write(&path, &analysis.letter.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Letter saved to {}", path.display());
    }

    Ok(())
}

fn print_report(analysis: &Analysis) {
    println!(
        "Policy {} | {} | decision: {}",
        analysis.policy_number, analysis.applicant_name, analysis.decision
    );
    println!(
        "Model approval probability: {:.3} (baseline {:.3})\n",
        analysis.approval_probability, analysis.baseline
    );
    println!("{}", render_text(&analysis.chart, 30));

    println!("Top factors:");
    for (rank, factor) in analysis.factors.iter().enumerate() {
        println!(
            "  {}. {} = {} ({:+.4}, {})",
            rank + 1,
            factor.label,
            factor.display_value(),
            factor.attribution,
            factor.impact().adverb()
        );
    }

    println!("\n--- Decision Letter ({:?}) ---\n", analysis.letter.source);
    println!("{}", analysis.letter.text);
}
