//! Hopgraph CLI
//!
//! Multi-hop question answering over knowledge-graph snapshots:
//! - `answer`: run questions through the query planner against a snapshot
//! - `stats`: summarize a snapshot
//!
//! The CLI wires deterministic lexical collaborators (label-index linker,
//! token-overlap ranker) into the planner's seams; trained models replace
//! them in the full pipeline without touching the planner.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use hopgraph_core::RelationId;
use hopgraph_kg::MemoryGraph;
use hopgraph_planner::{PlannerConfig, QueryPlanner, QuestionInput};

mod lexical;

#[derive(Parser)]
#[command(name = "hopgraph")]
#[command(
    author,
    version,
    about = "Multi-hop question answering over knowledge-graph snapshots"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer questions against a graph snapshot
    Answer {
        /// Graph snapshot (JSON array of triples)
        #[arg(long)]
        graph: PathBuf,

        /// Planner config JSON (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Rank list for first-stage superlative relations (tab-separated,
        /// id in the first column)
        #[arg(long, requires = "rank_rels_second")]
        rank_rels_first: Option<PathBuf>,

        /// Rank list for second-stage superlative relations
        #[arg(long, requires = "rank_rels_first")]
        rank_rels_second: Option<PathBuf>,

        /// A single question to answer
        #[arg(long, conflicts_with = "questions")]
        question: Option<String>,

        /// Template code for the single question (0-7)
        #[arg(long, default_value = "7")]
        template: String,

        /// Comma-separated entity mentions for the single question
        #[arg(long, default_value = "")]
        entities: String,

        /// Batch file: one question per line, optionally followed by
        /// TAB template-code TAB comma-separated mentions
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Print one resolved answer per question instead of candidates
        #[arg(long)]
        resolve: bool,

        /// Relation id of the snapshot's label edges
        #[arg(long, default_value = "label")]
        label_relation: String,
    },

    /// Print a snapshot summary
    Stats {
        /// Graph snapshot (JSON array of triples)
        graph: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match cli.command {
        Commands::Answer {
            graph,
            config,
            rank_rels_first,
            rank_rels_second,
            question,
            template,
            entities,
            questions,
            resolve,
            label_relation,
        } => cmd_answer(AnswerArgs {
            graph,
            config,
            rank_rels_first,
            rank_rels_second,
            question,
            template,
            entities,
            questions,
            resolve,
            label_relation,
        }),
        Commands::Stats { graph } => cmd_stats(&graph),
    }
}

struct AnswerArgs {
    graph: PathBuf,
    config: Option<PathBuf>,
    rank_rels_first: Option<PathBuf>,
    rank_rels_second: Option<PathBuf>,
    question: Option<String>,
    template: String,
    entities: String,
    questions: Option<PathBuf>,
    resolve: bool,
    label_relation: String,
}

fn cmd_answer(args: AnswerArgs) -> Result<()> {
    let graph = MemoryGraph::load_json(&args.graph)?;
    let mut config = match &args.config {
        Some(path) => PlannerConfig::load_json(path)?,
        None => PlannerConfig::default(),
    };
    if let (Some(first), Some(second)) = (&args.rank_rels_first, &args.rank_rels_second) {
        config.load_rank_lists(first, second)?;
    }
    let resolve = args.resolve || config.return_answers;

    let batch = match (&args.question, &args.questions) {
        (Some(question), None) => vec![QuestionInput::new(
            question.clone(),
            args.template.clone(),
            split_mentions(&args.entities),
        )],
        (None, Some(path)) => read_batch(path)?,
        _ => return Err(anyhow!("provide either --question or --questions")),
    };

    let label_relation = RelationId::new(args.label_relation.clone());
    let linker = lexical::LabelLinker::from_graph(&graph, &label_relation);
    let ranker = lexical::LexicalRanker::new(&graph, label_relation);
    let planner = QueryPlanner::new(&graph, lexical::NoTemplates, linker, ranker, config);

    if resolve {
        let answers = planner.resolve_batch(&batch)?;
        for (input, answer) in batch.iter().zip(&answers) {
            println!("{} {}", "Q:".bold(), input.question);
            if answer.is_empty() {
                println!("  {}", "no answer".yellow());
            } else {
                println!("  {}", answer.as_str().green().bold());
            }
        }
    } else {
        let candidate_lists = planner.answer_batch(&batch);
        for (input, candidates) in batch.iter().zip(&candidate_lists) {
            println!("{} {}", "Q:".bold(), input.question);
            if candidates.is_empty() {
                println!("  {}", "no candidates".yellow());
            } else {
                for candidate in candidates {
                    println!("  {}", candidate.to_string().green());
                }
            }
        }
    }
    Ok(())
}

fn cmd_stats(path: &Path) -> Result<()> {
    let graph = MemoryGraph::load_json(path)?;
    let (direct, statement, qualifier) = graph.kind_counts();
    println!("{} {}", "snapshot:".bold(), path.display());
    println!("  edges:      {}", graph.edge_count());
    println!("  subjects:   {}", graph.subject_count());
    println!("  direct:     {direct}");
    println!("  statement:  {statement}");
    println!("  qualifier:  {qualifier}");
    Ok(())
}

/// Parse a batch file: `question[TAB template-code[TAB mention,mention]]`.
fn read_batch(path: &Path) -> Result<Vec<QuestionInput>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read questions file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut fields = line.split('\t');
            let question = fields.next().unwrap_or_default().to_string();
            let template = fields.next().unwrap_or("7").to_string();
            let mentions = split_mentions(fields.next().unwrap_or_default());
            QuestionInput::new(question, template, mentions)
        })
        .collect())
}

fn split_mentions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}
