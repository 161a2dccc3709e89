//! PM4 Packet Assembler
//!
//! Assemble a line-oriented packet description language into a PM4
//! command stream.
//!
//! ## Example
//!
//! ```rust
//! use pm4_assembler::assemble;
//!
//! let source = r#"
//!     .gen gfx10
//!     DRAW_INDEX_AUTO index_count=3 draw_initiator=2
//!     EVENT_WRITE event_type=0x16 event_index=cs_vs_ps_partial_flush
//! "#;
//!
//! let words = assemble(source).unwrap();
//! assert_eq!(words.len(), 5);
//! ```

pub mod assembler;
pub mod error;
pub mod lexer;
pub mod parser;

pub use assembler::{assemble, assemble_packets, Assembler};
pub use error::{AssemblerError, Result};
pub use parser::{parse_line, parse_number, parse_packet, Statement, PAYLOAD_KEY};
