use amr_canon::{Result, amtree, graph, report};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "amr-canon")]
#[command(about = "Canonical trees for AMR graphs and AM dependency trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize every graph of a PENMAN corpus file.
    Graph {
        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: String,

        #[arg(long)]
        pretty: bool,
    },

    /// Assemble every sentence of an amconll file.
    Amtree {
        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: String,

        #[arg(long)]
        pretty: bool,
    },

    /// Convert bracketed phrase-structure trees, one per line.
    Constituency {
        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: String,

        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (json, out) = match cli.cmd {
        Commands::Graph { input, out, pretty } => {
            let graphs = graph::load_corpus(&input)?;
            let views = report::graph_views(&graphs)?;
            (report::to_json(&views, pretty)?, out)
        }
        Commands::Amtree { input, out, pretty } => {
            let sentences = amtree::load_amconll(&input)?;
            let views = report::sentence_views(&sentences)?;
            (report::to_json(&views, pretty)?, out)
        }
        Commands::Constituency { input, out, pretty } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("read tree file {}", input))?;
            let trees = report::constituency_views(&text)?;
            (report::to_json(&trees, pretty)?, out)
        }
    };

    std::fs::write(&out, json)?;
    println!("Wrote {}", out);

    Ok(())
}
