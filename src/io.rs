//! Clustering output: tab-separated cluster table and representative FASTA.
//!
//! Table: one line per cluster, member ids separated by tabs, representative
//! first. FASTA: one record per kept cluster, sequence wrapped at 60 columns.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cluster::Cluster;
use crate::index::SeqIndex;

/// FASTA line width.
pub const FASTA_WIDTH: usize = 60;

/// Writes finished clusters and their representative sequences.
pub struct ClusterWriter<'a> {
    clusters: &'a [Cluster],
    reps: &'a SeqIndex,
}

impl<'a> ClusterWriter<'a> {
    /// `reps` must hold the sequence of every cluster representative.
    pub fn new(clusters: &'a [Cluster], reps: &'a SeqIndex) -> Self {
        Self { clusters, reps }
    }

    /// Write the cluster table to `w`.
    pub fn write_table<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for c in self.clusters {
            writeln!(w, "{}", c.members().join("\t"))?;
        }
        Ok(())
    }

    /// Write representative sequences as FASTA to `w`.
    pub fn write_fasta<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for c in self.clusters {
            let rep = c.representative();
            let record = self.reps.get(rep).ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("representative {rep} is not indexed"),
                )
            })?;
            writeln!(w, ">{rep}")?;
            for line in record.seq().as_bytes().chunks(FASTA_WIDTH) {
                w.write_all(line)?;
                w.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    /// Write the table to `table` and, if given, the FASTA to `fasta`.
    pub fn write_to(&self, table: &Path, fasta: Option<&Path>) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(table)?);
        self.write_table(&mut out)?;
        out.flush()?;

        if let Some(path) = fasta {
            let mut out = BufWriter::new(File::create(path)?);
            self.write_fasta(&mut out)?;
            out.flush()?;
        }
        Ok(())
    }
}
