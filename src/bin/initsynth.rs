//! Extract a test-initialization table from an annotated UML model.
//!
//! Loads a Papyrus-style XMI document, runs the extraction pipeline,
//! prints the table and the extracted structures for inspection, and
//! writes the CSV artifacts.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use initsynth::report::{render_pairs, render_row, render_table};
use initsynth::{annotations, pipeline, ModelDocument};

#[derive(Parser, Debug)]
#[command(name = "initsynth")]
struct Args {
    /// Path to the XMI model document
    model: PathBuf,

    /// Directory the CSV artifacts are written into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip writing artifacts; print only
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print model statistics (tag and annotation counts)
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let doc = ModelDocument::from_path(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;
    let out = pipeline::run(&doc).context("extraction pipeline")?;

    println!("{}", render_table(&out.table));

    println!("------Protected characteristics------");
    println!("{}", render_row(&out.protected_characteristics));

    println!("------Attribute data types------");
    println!("{}", render_pairs(&out.data_types));

    println!("------Class names------");
    println!("{}", render_row(&out.class_names));

    match &out.decision_attributes {
        Some(decisions) => {
            println!("------Decision data attributes------");
            println!("{}", render_pairs(&decisions.types));
        }
        None => println!("(no decision data attributes extracted)"),
    }

    if args.stats {
        println!(
            "model: {} tags, {} annotated elements",
            doc.node_count(),
            annotations::critical_count(&doc)
        );
    }

    if !args.dry_run {
        let written = initsynth::report::write_artifacts(&out, &args.out_dir)
            .context("writing artifacts")?;
        for path in written {
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
