use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;

/// A saved network: weights, running statistics and the metadata describing
/// when and why it was saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub metadata: ModelMetadata,
    pub network: Network,
}

/// Borrowed form of `Checkpoint` so saving does not clone the weights.
#[derive(Serialize)]
struct CheckpointRef<'a> {
    metadata: &'a ModelMetadata,
    network: &'a Network,
}

impl Checkpoint {
    /// Writes `network` with `metadata` to a pretty-printed JSON file.
    pub fn write(path: impl AsRef<Path>, metadata: &ModelMetadata, network: &Network) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &CheckpointRef { metadata, network })?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a checkpoint previously written by `write`.
    pub fn load(path: impl AsRef<Path>) -> Result<Checkpoint> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
