use anyhow::Context;
use clap::Parser;
use kira_otuclust_seqindex::*;
use std::path::PathBuf;
use tracing::info;

/// Greedy OTU clustering of FASTA/FASTQ sequences.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input FASTA/FASTQ(.gz) path
    input: PathBuf,

    /// Output cluster table (tab-separated, representative first)
    #[arg(long)]
    out_clust: PathBuf,

    /// Output representative sequences (FASTA)
    #[arg(long)]
    out_rep: Option<PathBuf>,

    /// Minimum alignment identity to join a cluster
    #[arg(short, long, default_value_t = 0.97)]
    similarity: f64,

    /// Consecutive rejected candidates before a search gives up
    #[arg(short = 'r', long, default_value_t = 8)]
    max_rejects: usize,

    /// Minimum abundance of a unique sequence to found a cluster
    #[arg(short, long, default_value_t = 2)]
    min_size: usize,

    /// Join a representative that starts with the sequence before aligning
    #[arg(short, long, default_value_t = false)]
    derep_prefix: bool,

    /// Bases compared by --derep-prefix
    #[arg(short = 'l', long, default_value_t = 200)]
    derep_fast_len: usize,

    /// Threads for k-mer scoring (0 = sequential)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("configuring thread pool")?;
    }

    let params = SearchParams::default()
        .with_similarity(args.similarity)
        .max_rejects(args.max_rejects)
        .parallel(args.threads > 0);
    let cfg = ClusterConfig::default()
        .search(params)
        .min_size(args.min_size)
        .prefix_dereplication(args.derep_prefix)
        .derep_fast_len(args.derep_fast_len);
    let clusterer = Clusterer::new(cfg)?;

    let mut reader = needletail::parse_fastx_file(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let mut records: Vec<(String, String)> = Vec::new();
    while let Some(record) = reader.next() {
        let record = record?;
        let header = String::from_utf8_lossy(record.id());
        let id = header.split_whitespace().next().unwrap_or_default().to_owned();
        let seq = String::from_utf8_lossy(&record.seq()).into_owned();
        records.push((id, seq));
    }
    info!(records = records.len(), "read {}", args.input.display());

    let done = clusterer.cluster(records)?;
    ClusterWriter::new(&done.clusters, &done.representatives)
        .write_to(&args.out_clust, args.out_rep.as_deref())
        .context("writing clusters")?;

    info!(
        clusters = done.clusters.len(),
        unassigned = done.unassigned.len(),
        similarity = args.similarity,
        max_rejects = args.max_rejects,
        "wrote {}",
        args.out_clust.display()
    );
    Ok(())
}
