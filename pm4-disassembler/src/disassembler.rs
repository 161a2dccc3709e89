//! Main disassembler logic

use crate::decoder::Decoder;
use crate::error::Result;
use crate::formatter::{format, format_words};
use pm4_spec::Generation;
use std::fmt::Write;

/// Stream-to-text disassembler
///
/// Output starts with a `.gen` directive and re-assembles to the same
/// words. Raw-word annotations are emitted as comments.
#[derive(Debug, Clone)]
pub struct Disassembler {
    decoder: Decoder,
    annotate: bool,
    keep_going: bool,
}

impl Default for Disassembler {
    fn default() -> Self {
        Self {
            decoder: Decoder::default(),
            annotate: true,
            keep_going: false,
        }
    }
}

impl Disassembler {
    pub fn new(decoder: Decoder) -> Self {
        Self {
            decoder,
            ..Self::default()
        }
    }

    /// Precede each packet with a comment holding its offset and raw words
    pub fn annotated(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Report undecodable packets as comments instead of failing
    ///
    /// Stream framing errors still fail: without a valid header there is
    /// no way to find the next packet.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn disassemble(&self, words: &[u32], generation: Generation) -> Result<String> {
        let packets = self.decoder.split(words)?;
        let mut output = String::new();

        let _ = writeln!(output, ".gen {}", generation);
        for raw in &packets {
            if self.annotate {
                let _ = writeln!(output, "; {:#06x}: {}", raw.offset, format_words(raw.words));
            }
            match self.decoder.decode_packet(raw, generation) {
                Ok(desc) => {
                    let _ = writeln!(output, "{}", format(&desc));
                }
                Err(e) if self.keep_going => {
                    let _ = writeln!(output, "; ERROR: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(output)
    }
}

/// Disassemble a command stream into annotated assembly text
pub fn disassemble(words: &[u32], generation: Generation) -> Result<String> {
    Disassembler::default().disassemble(words, generation)
}
