//! Append-only consensus snapshot file (§4.7, §6).
//!
//! One line per committed block: `block_number\tops_hash_hex\tconsensus_hash_hex\n`.
//! The file is never rewritten, only extended — replay determinism means
//! a crash after a partial append is recoverable by truncating to the
//! last well-formed line and re-processing from there, which is why the
//! format is line-oriented rather than a binary framed log.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::types::{ConsensusHash, Sha256Digest};

use super::error::FatalError;
use super::window::ConsensusHashHistory;

struct SnapshotLine {
    block_number: u64,
    ops_hash: Sha256Digest,
    consensus_hash: ConsensusHash,
}

fn parse_line(line: &str) -> Option<SnapshotLine> {
    let mut parts = line.splitn(3, '\t');
    let block_number: u64 = parts.next()?.parse().ok()?;
    let ops_hash_hex = parts.next()?;
    let consensus_hash_hex = parts.next()?.trim_end();

    let ops_hash_bytes = hex::decode(ops_hash_hex).ok()?;
    if ops_hash_bytes.len() != crate::types::SHA256_LEN {
        return None;
    }
    let mut ops_hash_arr = [0u8; crate::types::SHA256_LEN];
    ops_hash_arr.copy_from_slice(&ops_hash_bytes);

    let consensus_hash = ConsensusHash::from_hex(consensus_hash_hex)?;

    Some(SnapshotLine {
        block_number,
        ops_hash: Sha256Digest(ops_hash_arr),
        consensus_hash,
    })
}

/// Owns the on-disk snapshot file plus an in-memory index of every
/// consensus hash seen so far, so [`validate_binding`](super::window::validate_binding)
/// doesn't have to re-scan the file on every `NAME_UPDATE`/`NAME_TRANSFER`.
pub struct ConsensusSnapshot {
    path: PathBuf,
    file: File,
    index: HashMap<u64, ConsensusHash>,
    last_block: Option<u64>,
}

impl ConsensusSnapshot {
    /// Opens (creating if absent) the snapshot file at `path` and replays
    /// every existing line into the in-memory index.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut index = HashMap::new();
        let mut last_block = None;

        if path.exists() {
            let read_handle = File::open(&path)?;
            for line in BufReader::new(read_handle).lines() {
                let line = line?;
                if line.is_empty() {
                    continue;
                }
                if let Some(parsed) = parse_line(&line) {
                    last_block = Some(parsed.block_number);
                    index.insert(parsed.block_number, parsed.consensus_hash);
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(ConsensusSnapshot { path, file, index, last_block })
    }

    pub fn last_block(&self) -> Option<u64> {
        self.last_block
    }

    /// Appends one line recording the block's ops-hash and consensus hash,
    /// flushing before returning. A write failure here is fatal (§7): the
    /// engine has already decided the block's final state, and losing the
    /// snapshot entry would silently desynchronize future window lookups.
    pub fn append_block(
        &mut self,
        block_number: u64,
        ops_hash: &Sha256Digest,
        consensus_hash: &ConsensusHash,
    ) -> Result<(), FatalError> {
        let line = format!(
            "{block_number}\t{}\t{}\n",
            ops_hash.to_hex(),
            consensus_hash.to_hex()
        );
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|e| FatalError::SnapshotWriteFailed {
                block_number,
                detail: format!("{e} (path: {})", self.path.display()),
            })?;

        self.index.insert(block_number, *consensus_hash);
        self.last_block = Some(block_number);
        Ok(())
    }
}

impl ConsensusHashHistory for ConsensusSnapshot {
    fn consensus_hash_at(&self, block_number: u64) -> Option<ConsensusHash> {
        self.index.get(&block_number).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_reopen_recovers_every_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.log");

        {
            let mut snapshot = ConsensusSnapshot::open(&path).expect("open");
            let ops_hash = Sha256Digest::compute(b"block-1");
            let consensus_hash = ConsensusHash::truncated_sha256(b"ch-1");
            snapshot.append_block(1, &ops_hash, &consensus_hash).expect("append");

            let ops_hash2 = Sha256Digest::compute(b"block-2");
            let consensus_hash2 = ConsensusHash::truncated_sha256(b"ch-2");
            snapshot.append_block(2, &ops_hash2, &consensus_hash2).expect("append");
        }

        let reopened = ConsensusSnapshot::open(&path).expect("reopen");
        assert_eq!(reopened.last_block(), Some(2));
        assert!(reopened.consensus_hash_at(1).is_some());
        assert!(reopened.consensus_hash_at(2).is_some());
        assert!(reopened.consensus_hash_at(3).is_none());
    }

    #[test]
    fn fresh_snapshot_has_no_last_block() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("snapshot.log");
        let snapshot = ConsensusSnapshot::open(&path).expect("open");
        assert_eq!(snapshot.last_block(), None);
    }
}
