//! Main assembler logic

use crate::error::{AssemblerError, Result};
use crate::parser::{parse_line, Statement};
use pm4_spec::{Codec, Generation, PacketDescriptor};
use tracing::debug;

/// Source-to-command-stream assembler
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    generation: Option<Generation>,
    codec: Codec,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target used until the source's first `.gen` directive
    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Parse every packet line, keeping its 1-based line number
    pub fn parse(&self, source: &str) -> Result<Vec<(usize, PacketDescriptor)>> {
        let mut generation = self.generation;
        let mut packets = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let line_num = index + 1;
            match parse_line(line, generation).map_err(|e| e.at_line(line_num))? {
                Some(Statement::Generation(target)) => generation = Some(target),
                Some(Statement::Packet(desc)) => packets.push((line_num, desc)),
                None => {}
            }
        }
        Ok(packets)
    }

    /// Assemble source into one flat dword stream
    pub fn assemble(&self, source: &str) -> Result<Vec<u32>> {
        let packets = self.parse(source)?;
        let mut words = Vec::new();
        for (line_num, desc) in &packets {
            self.codec
                .encode_into(desc, &mut words)
                .map_err(|e| AssemblerError::from(e).at_line(*line_num))?;
        }
        debug!(packets = packets.len(), dwords = words.len(), "assembled stream");
        Ok(words)
    }
}

/// Assemble source code into a command stream
pub fn assemble(source: &str) -> Result<Vec<u32>> {
    Assembler::new().assemble(source)
}

/// Parse source code into packet descriptors without encoding them
pub fn assemble_packets(source: &str) -> Result<Vec<PacketDescriptor>> {
    let packets = Assembler::new().parse(source)?;
    Ok(packets.into_iter().map(|(_, desc)| desc).collect())
}
