use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use pm4_assembler::Assembler;
use pm4_disassembler::{Decoder, Disassembler};
use pm4_spec::{
    Catalog, Codec, CodecConfig, Generation, Opcode, PacketLayout, ReservedPolicy, VariantSelector,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pm4",
    version,
    about = "Assemble, disassemble and inspect PM4 type-3 command packets"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble packet descriptions into a command stream
    Asm {
        /// Source file ("-" for stdin)
        input: PathBuf,

        /// Output path (defaults to stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Target generation until the source's first .gen directive
        #[arg(long = "gen", value_name = "GEN")]
        generation: Option<Generation>,

        #[arg(long, value_enum, default_value_t = StreamFormat::Hex)]
        format: StreamFormat,
    },

    /// Disassemble a command stream
    Dis {
        /// Stream file ("-" for stdin)
        input: PathBuf,

        #[arg(long = "gen", value_name = "GEN")]
        generation: Generation,

        /// Preferred layout variant where a packet defines it (repeatable)
        #[arg(long = "variant", value_name = "NAME")]
        variants: Vec<String>,

        #[arg(long, value_enum, default_value_t = StreamFormat::Bin)]
        format: StreamFormat,

        /// Drop non-zero reserved bits with a warning instead of failing
        #[arg(long, action = clap::ArgAction::SetTrue)]
        lenient: bool,

        /// Report undecodable packets as comments and continue
        #[arg(long, action = clap::ArgAction::SetTrue)]
        keep_going: bool,

        /// Omit the raw-word comment before each packet
        #[arg(long, action = clap::ArgAction::SetTrue)]
        no_annotate: bool,
    },

    /// Print the field layout of an opcode
    Layout {
        /// Opcode name (ACQUIRE_MEM) or number (0x58)
        opcode: String,

        /// Only this generation (defaults to every supported one)
        #[arg(long = "gen", value_name = "GEN")]
        generation: Option<Generation>,
    },
}

/// On-disk representation of a dword stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StreamFormat {
    /// Little-endian binary dwords
    Bin,
    /// Whitespace-separated hex dwords
    Hex,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli.command)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Asm {
            input,
            output,
            generation,
            format,
        } => {
            let source = String::from_utf8(read_input(&input)?)
                .with_context(|| format!("{} is not UTF-8 text", input.display()))?;
            let mut assembler = Assembler::new();
            if let Some(generation) = generation {
                assembler = assembler.with_generation(generation);
            }
            let words = assembler
                .assemble(&source)
                .with_context(|| format!("assemble {}", input.display()))?;
            tracing::info!(dwords = words.len(), "assembled {}", input.display());
            write_output(output.as_deref(), &encode_stream(&words, format))
        }
        Command::Dis {
            input,
            generation,
            variants,
            format,
            lenient,
            keep_going,
            no_annotate,
        } => {
            let words = decode_stream(&read_input(&input)?, format)
                .with_context(|| format!("read stream {}", input.display()))?;
            let config = if lenient {
                CodecConfig {
                    reserved_policy: ReservedPolicy::Lenient,
                    ..CodecConfig::DEFAULT
                }
            } else {
                CodecConfig::DEFAULT
            };
            let decoder = Decoder::new(Codec::new(config)?)
                .with_variants(variants.into_iter().collect::<VariantSelector>());
            let text = Disassembler::new(decoder)
                .annotated(!no_annotate)
                .keep_going(keep_going)
                .disassemble(&words, generation)
                .with_context(|| format!("disassemble {}", input.display()))?;
            write_output(None, text.as_bytes())
        }
        Command::Layout { opcode, generation } => {
            let opcode = parse_opcode(&opcode)?;
            let entry = Catalog::global()
                .entry(opcode)
                .with_context(|| format!("{} has no layout", opcode))?;
            let mut out = String::new();
            match generation {
                Some(generation) => {
                    let layout = Catalog::global().packet_layout(opcode, generation)?;
                    describe_layout(&mut out, layout);
                }
                None => {
                    for layout in entry.layouts() {
                        describe_layout(&mut out, layout);
                    }
                }
            }
            write_output(None, out.as_bytes())
        }
    }
}

fn parse_opcode(text: &str) -> anyhow::Result<Opcode> {
    let number = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .map(|hex| u8::from_str_radix(hex, 16))
        .or_else(|| text.starts_with(|c: char| c.is_ascii_digit()).then(|| text.parse::<u8>()));
    match number {
        Some(value) => {
            let value = value.with_context(|| format!("invalid opcode number {}", text))?;
            Opcode::from_u8(value).with_context(|| format!("unknown opcode {:#04x}", value))
        }
        None => Ok(text.parse()?),
    }
}

fn describe_layout(out: &mut String, layout: &PacketLayout) {
    use std::fmt::Write as _;

    let sizes: Vec<String> = layout
        .sizes()
        .map(|s| {
            if s.groups.is_empty() {
                s.dwords.to_string()
            } else {
                format!("{} (with {})", s.dwords, s.groups.join(", "))
            }
        })
        .collect();
    let _ = writeln!(
        out,
        "{} ({:#04x}) on {}: {} dwords",
        layout.opcode,
        layout.opcode.to_u8(),
        layout.generation,
        sizes.join(" | ")
    );

    for ordinal in &layout.ordinals {
        let group = ordinal
            .group
            .map(|g| format!(" [optional: {}]", g))
            .unwrap_or_default();
        let _ = writeln!(out, "  ordinal {}{}", ordinal.number, group);
        for variant in &ordinal.variants {
            let indent = if ordinal.has_alternatives() {
                let when: Vec<String> = variant
                    .when
                    .iter()
                    .map(|c| format!("{} in {:?}", c.field, c.values))
                    .collect();
                let mut header = format!("    @{}", variant.name);
                if variant.default {
                    header.push_str(" (default)");
                }
                if !when.is_empty() {
                    let _ = write!(header, " when {}", when.join(" and "));
                }
                let _ = writeln!(out, "{}", header);
                "      "
            } else {
                "    "
            };
            for spec in variant.fields.iter().rev() {
                let _ = writeln!(out, "{}{}", indent, spec);
            }
        }
    }
    if let Some(payload) = layout.payload() {
        let _ = writeln!(
            out,
            "  then {} payload dwords (at least {})",
            payload.name, payload.min_dwords
        );
    }
    out.push('\n');
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("read stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("read {}", path.display()))
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => fs::write(path, bytes).with_context(|| format!("write {}", path.display())),
        None => io::stdout().write_all(bytes).context("write stdout"),
    }
}

fn encode_stream(words: &[u32], format: StreamFormat) -> Vec<u8> {
    match format {
        StreamFormat::Bin => words.iter().flat_map(|w| w.to_le_bytes()).collect(),
        StreamFormat::Hex => {
            let mut text: String = words
                .chunks(8)
                .map(|line| {
                    line.iter()
                        .map(|w| format!("{:08x}", w))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n");
            if !text.is_empty() {
                text.push('\n');
            }
            text.into_bytes()
        }
    }
}

fn decode_stream(bytes: &[u8], format: StreamFormat) -> anyhow::Result<Vec<u32>> {
    match format {
        StreamFormat::Bin => {
            if bytes.len() % 4 != 0 {
                bail!("binary stream length {} is not a multiple of 4", bytes.len());
            }
            Ok(bytes
                .chunks_exact(4)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect())
        }
        StreamFormat::Hex => {
            let text = std::str::from_utf8(bytes).context("hex stream is not UTF-8 text")?;
            text.lines()
                .map(|line| line.split(['#', ';']).next().unwrap_or(""))
                .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ','))
                .filter(|token| !token.is_empty())
                .map(|token| {
                    let digits = token
                        .strip_prefix("0x")
                        .or_else(|| token.strip_prefix("0X"))
                        .unwrap_or(token);
                    u32::from_str_radix(digits, 16)
                        .with_context(|| format!("invalid hex dword {:?}", token))
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["pm4", "-v", "dis", "in.bin", "--gen", "gfx10", "--variant", "with_addr"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Dis {
                generation,
                variants,
                format,
                ..
            } => {
                assert_eq!(generation, Generation::Gfx10);
                assert_eq!(variants, vec!["with_addr".to_string()]);
                assert_eq!(format, StreamFormat::Bin);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stream_formats() {
        let words = [0xC001_2D00, 3, 2];
        let hex = encode_stream(&words, StreamFormat::Hex);
        assert_eq!(hex, b"c0012d00 00000003 00000002\n");
        assert_eq!(decode_stream(&hex, StreamFormat::Hex).unwrap(), words);

        let bin = encode_stream(&words, StreamFormat::Bin);
        assert_eq!(bin.len(), 12);
        assert_eq!(decode_stream(&bin, StreamFormat::Bin).unwrap(), words);
        assert!(decode_stream(&bin[..5], StreamFormat::Bin).is_err());
    }

    #[test]
    fn test_hex_stream_comments() {
        let text = b"; 0x0000: header\nC0012D00, 0x3 2 # trailing\n";
        assert_eq!(
            decode_stream(text, StreamFormat::Hex).unwrap(),
            vec![0xC001_2D00, 3, 2]
        );
    }

    #[test]
    fn test_parse_opcode() {
        assert_eq!(parse_opcode("acquire_mem").unwrap(), Opcode::AcquireMem);
        assert_eq!(parse_opcode("0x58").unwrap(), Opcode::AcquireMem);
        assert_eq!(parse_opcode("88").unwrap(), Opcode::AcquireMem);
        assert!(parse_opcode("0x01").is_err());
        assert!(parse_opcode("NOT_A_PACKET").is_err());
    }

    #[test]
    fn test_describe_layout() {
        let layout = Catalog::global()
            .packet_layout(Opcode::WaitRegMem64, Generation::Gfx10)
            .unwrap();
        let mut out = String::new();
        describe_layout(&mut out, layout);
        assert!(out.starts_with("WAIT_REG_MEM64 (0x93) on gfx10: 9 dwords\n"));
        assert!(out.contains("@mem when mem_space in [1]"));
        assert!(out.contains("[31:3] mem_poll_addr_lo (address, 8-byte aligned)"));
        assert!(out.contains("[2:0] reserved3_0"));
    }
}
