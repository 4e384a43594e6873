use std::{
    io::{BufReader, Read, Write, stdout},
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser, Subcommand};

use crate::{CodeTable, FrequencyTable, HuffmanCoding};

#[derive(Parser)]
#[command(
    version,
    author,
    about = "Command line utility to compress and restore ASCII text with Huffman codes"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = ArgAction::Count, global = true)]
    /// Raise log verbosity: -v for info, -vv for debug, -vvv for trace
    verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Encode a text file.
    ///
    /// The code is built from the frequencies of the input itself. The encoded
    /// file carries no table, so keep the original or pass `--table-file` to
    /// save the frequency table as JSON for decoding later.
    Encode {
        input: PathBuf,
        output: PathBuf,

        #[arg(short, long)]
        /// Also write the frequency table to this file
        table_file: Option<PathBuf>,

        #[arg(short, long)]
        /// Whether to output the table in pretty JSON
        pretty: bool,
    },
    /// Decode a file produced by `encode`.
    ///
    /// The tree is rebuilt either from the original source or from a table
    /// saved with `encode --table-file`.
    Decode {
        input: PathBuf,
        output: PathBuf,

        #[arg(short, long, required_unless_present = "table_file")]
        /// Original text the encoding was built from
        source: Option<PathBuf>,

        #[arg(short, long, conflicts_with = "source")]
        /// Frequency table written by `encode --table-file`
        table_file: Option<PathBuf>,
    },
    /// Print the code assigned to every symbol of a text file.
    Codes {
        input: PathBuf,

        #[arg(short, long)]
        /// Output as a JSON object instead of one line per symbol
        json: bool,

        #[arg(short, long)]
        /// Whether to output JSON pretty printed
        pretty: bool,
    },
    /// Print the structure of the tree built for a text file.
    Tree { input: PathBuf },
}
use Command::*;

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("read file {:?} failed: {}", path, e))
}

fn session_from_source(path: &Path) -> Result<HuffmanCoding, String> {
    let data = read_file(path)?;
    HuffmanCoding::from_reader(&data[..])
        .map_err(|e| format!("build code from {:?} failed: {}", path, e))
}

fn write_table(
    table: &FrequencyTable,
    mut writer: impl Write,
    pretty: bool,
) -> Result<(), String> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, table)
    } else {
        serde_json::to_writer(&mut writer, table)
    }
    .map_err(|e| format!("write frequency table failed: {}", e))?;
    writeln!(&mut writer).map_err(|e| format!("write newline failed: {}", e))?;
    Ok(())
}

fn read_table(reader: impl Read) -> Result<FrequencyTable, String> {
    serde_json::from_reader(reader).map_err(|e| format!("error parsing frequency table: {}", e))
}

fn write_codes(
    codes: &CodeTable,
    mut writer: impl Write,
    json: bool,
    pretty: bool,
) -> Result<(), String> {
    let result = match (json, pretty) {
        (true, true) => serde_json::to_writer_pretty(&mut writer, codes)
            .map_err(|e| e.to_string())
            .and_then(|_| writeln!(&mut writer).map_err(|e| e.to_string())),
        (true, false) => serde_json::to_writer(&mut writer, codes)
            .map_err(|e| e.to_string())
            .and_then(|_| writeln!(&mut writer).map_err(|e| e.to_string())),
        (false, _) => codes
            .iter()
            .try_for_each(|(symbol, code)| writeln!(&mut writer, "{:?}: {}", symbol, code))
            .map_err(|e| e.to_string()),
    };
    result.map_err(|e| format!("write code table failed: {}", e))
}

fn encode(
    input: &Path,
    output: &Path,
    table_file: Option<&Path>,
    pretty: bool,
) -> Result<(), String> {
    let data = read_file(input)?;
    let session = HuffmanCoding::from_reader(&data[..])
        .map_err(|e| format!("build code from {:?} failed: {}", input, e))?;

    let mut encoded = Vec::new();
    session
        .encode(&data[..], &mut encoded)
        .map_err(|e| format!("encode {:?} failed: {}", input, e))?;

    if let Some(table_file) = table_file {
        let mut json = Vec::new();
        write_table(session.table(), &mut json, pretty)?;
        std::fs::write(table_file, &json)
            .map_err(|e| format!("write file {:?} failed: {}", table_file, e))?;
    }

    std::fs::write(output, &encoded).map_err(|e| format!("write file {:?} failed: {}", output, e))
}

fn decode(input: &Path, output: &Path, session: &HuffmanCoding) -> Result<(), String> {
    let encoded = read_file(input)?;

    let mut decoded = Vec::new();
    let stats = session
        .decode(&encoded[..], &mut decoded)
        .map_err(|e| format!("decode {:?} failed: {}", input, e))?;
    if stats.corrupt_padding {
        tracing::warn!(file = ?input, "padding header was corrupt, output may be wrong");
    }

    std::fs::write(output, &decoded).map_err(|e| format!("write file {:?} failed: {}", output, e))
}

pub fn run(cli: Cli) -> Result<(), String> {
    let span = tracing::info_span!("command");
    let _enter = span.enter();

    match cli.command {
        Encode {
            input,
            output,
            table_file,
            pretty,
        } => encode(&input, &output, table_file.as_deref(), pretty),
        Decode {
            input,
            output,
            source,
            table_file,
        } => {
            let session = match (source, table_file) {
                (Some(source), _) => session_from_source(&source)?,
                (None, Some(table_file)) => {
                    let f = std::fs::File::open(&table_file)
                        .map_err(|e| format!("open file {:?} failed: {}", table_file, e))?;
                    HuffmanCoding::from_table(read_table(BufReader::new(f))?)
                }
                (None, None) => return Err("either --source or --table-file is required".into()),
            };
            decode(&input, &output, &session)
        }
        Codes {
            input,
            json,
            pretty,
        } => write_codes(session_from_source(&input)?.codes(), stdout(), json, pretty),
        Tree { input } => {
            let session = session_from_source(&input)?;
            write!(stdout(), "{}", session.tree()).map_err(|e| format!("write tree failed: {}", e))
        }
    }
}
