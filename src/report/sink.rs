//! The downstream block sink.

use std::io::{self, Write};

use crate::record::Block;

/// Where decoded blocks are handed over. The transport behind the sink is
/// the consumer's concern, not this crate's.
pub trait BlockSink {
    fn write_block(&mut self, block: &Block) -> io::Result<()>;
}

/// Writes each block as one JSON line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BlockSink for JsonLinesSink<W> {
    fn write_block(&mut self, block: &Block) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, block)?;
        self.out.write_all(b"\n")
    }
}
