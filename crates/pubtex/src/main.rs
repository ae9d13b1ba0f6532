/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! pubtex CLI
//!
//! Pre-cleans manuscript markup, lists its citations, and post-processes
//! document trees built from it.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use pubtex_core::PipelineConfig;
use pubtex_processor::io::{load_bibliography, load_config, load_funding, load_tree};
use pubtex_processor::markup::find_citations;
use pubtex_processor::{AuthorDateFormatter, PostProcessInput, PostProcessor, Precleaner, Result};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite markup for the tree builder, resolving footnote and caption citations
    Clean {
        /// Manuscript markup
        tex: PathBuf,
        /// BibTeX database; defaults to the markup's embedded filecontents
        #[arg(long)]
        bib: Option<PathBuf>,
        /// Pipeline configuration (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the citation occurrences of the markup as JSON
    Citations {
        /// Manuscript markup
        tex: PathBuf,
    },
    /// Finish a JSON document tree built from the markup
    Process {
        /// Document tree (a doc node or an array of nodes)
        tree: PathBuf,
        /// Manuscript markup the tree was built from
        #[arg(long)]
        tex: PathBuf,
        /// BibTeX database used for the reference list
        #[arg(long)]
        bib: Option<PathBuf>,
        /// Abstract as an HTML file
        #[arg(long = "abstract")]
        abstract_html: Option<PathBuf>,
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long)]
        doi: Option<String>,
        /// Funding metadata (JSON), forwarded untouched
        #[arg(long)]
        funding: Option<PathBuf>,
        /// Pipeline configuration (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Clean {
            tex,
            bib,
            config,
            output,
        } => {
            let config = config_or_default(config.as_deref())?;
            let markup = fs::read_to_string(&tex)?;
            let bibliography = bib.as_deref().map(load_bibliography).transpose()?;

            let cleaned = Precleaner::new(&config, &AuthorDateFormatter)
                .clean(&markup, bibliography.as_ref())?;
            log::info!("cleaned {}", tex.display());
            write_output(output.as_deref(), &cleaned)
        }
        Commands::Citations { tex } => {
            let markup = fs::read_to_string(&tex)?;
            let occurrences = find_citations(&markup);
            log::info!("found {} citation(s) in {}", occurrences.len(), tex.display());
            println!("{}", serde_json::to_string_pretty(&occurrences)?);
            Ok(())
        }
        Commands::Process {
            tree,
            tex,
            bib,
            abstract_html,
            keywords,
            doi,
            funding,
            config,
            output,
        } => {
            let config = config_or_default(config.as_deref())?;
            let doc = load_tree(&tree)?;
            let input = PostProcessInput {
                tex: fs::read_to_string(&tex)?,
                bibliography: bib.as_deref().map(load_bibliography).transpose()?,
                abstract_html: abstract_html.map(fs::read_to_string).transpose()?,
                keywords,
                doi,
                funding: funding.as_deref().map(load_funding).transpose()?,
            };

            let processed = PostProcessor::new(&config, &AuthorDateFormatter, input).run(doc)?;
            log::info!("processed {}", tree.display());
            write_output(output.as_deref(), &serde_json::to_string_pretty(&processed)?)
        }
    }
}

fn config_or_default(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
