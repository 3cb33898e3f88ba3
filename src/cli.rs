//! Command-line front end of the `streamdelta` binary.
//!
//! `streamdelta OLD NEW` builds the block signature of `OLD`, streams `NEW`
//! through a [`BlockMatcher`](matching::BlockMatcher) and prints how much of
//! `NEW` was found in `OLD`. With `--output` the new version is rebuilt from
//! `OLD` and the delta, which checks the delta end to end.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::num::{NonZeroU8, NonZeroU32};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use thiserror::Error;

use checksums::RollingChecksum;
use checksums::strong::{Md4, Md5, Sha1, Sha256, StrongDigest, Xxh3, Xxh64};
use logging::{FlagParseError, InitError, VerbosityConfig, init_tracing};
use matching::{
    ApplyError, ChecksumTable, ConfigError, DeltaError, DeltaEvent, DeltaScript, MatchConfig,
    apply_delta, generate_delta,
};
use signature::{SignatureError, SignatureLayout, generate_file_signature};

/// Exit code for a completed run.
pub const EXIT_OK: u8 = 0;
/// Exit code for invalid command-line usage.
pub const EXIT_SYNTAX: u8 = 1;
/// Exit code for failures while matching or rebuilding.
pub const EXIT_FAILURE: u8 = 2;

const CHECKSUM_NAMES: [&str; 6] = ["md4", "md5", "sha1", "sha256", "xxh64", "xxh3"];

/// Failures reported by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// File that was being opened.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The output file could not be created.
    #[error("failed to create {}: {source}", path.display())]
    Create {
        /// File that was being created.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The `--debug` flag list was malformed.
    #[error("invalid --debug value: {0}")]
    DebugFlags(#[from] FlagParseError),
    /// Signature generation failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// The matcher configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Delta generation failed.
    #[error(transparent)]
    Delta(#[from] DeltaError),
    /// Rebuilding the new version failed.
    #[error(transparent)]
    Apply(#[from] ApplyError),
    /// Writing the report or the rebuilt file failed.
    #[error("write failed: {0}")]
    Output(#[from] io::Error),
}

/// Parsed command-line options.
#[derive(Clone, Debug)]
struct Options {
    old: PathBuf,
    new: PathBuf,
    block_size: Option<u32>,
    chunk_size: Option<usize>,
    strong_length: Option<u8>,
    checksum: String,
    checksum_seed: Option<String>,
    output: Option<PathBuf>,
    events: bool,
    verbose: u8,
    debug: Option<String>,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Option<Self> {
        Some(Self {
            old: matches.get_one::<PathBuf>("old")?.clone(),
            new: matches.get_one::<PathBuf>("new")?.clone(),
            block_size: matches.get_one::<u32>("block-size").copied(),
            chunk_size: matches.get_one::<usize>("chunk-size").copied(),
            strong_length: matches.get_one::<u8>("strong-length").copied(),
            checksum: matches.get_one::<String>("checksum")?.clone(),
            checksum_seed: matches.get_one::<String>("checksum-seed").cloned(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            events: matches.get_flag("events"),
            verbose: matches.get_count("verbose"),
            debug: matches.get_one::<String>("debug").cloned(),
        })
    }
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new("streamdelta")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Match NEW against the block signature of OLD and report the delta.")
        .arg(
            Arg::new("old")
                .value_name("OLD")
                .help("Reference (old) version.")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("new")
                .value_name("NEW")
                .help("New version to describe in terms of OLD.")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("block-size")
                .long("block-size")
                .short('B')
                .value_name("SIZE")
                .help("Block length in bytes (default: derived from the size of OLD).")
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .value_name("SIZE")
                .help("Matcher working buffer size in bytes.")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("strong-length")
                .long("strong-length")
                .value_name("BYTES")
                .help("Strong checksum bytes compared per block (default: 16 or the digest width).")
                .value_parser(value_parser!(u8).range(1..)),
        )
        .arg(
            Arg::new("checksum")
                .long("checksum")
                .value_name("ALGORITHM")
                .help("Strong checksum algorithm.")
                .value_parser(CHECKSUM_NAMES)
                .default_value("md4"),
        )
        .arg(
            Arg::new("checksum-seed")
                .long("checksum-seed")
                .value_name("SEED")
                .help("Seed appended to every strong checksum input."),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Rebuild NEW from OLD and the delta into FILE.")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("events")
                .long("events")
                .help("Print every delta event.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic verbosity (repeatable).")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Per-subsystem verbosity, e.g. match2,table1 or all3."),
        )
}

/// Parses `args`, runs the command and reports to `stdout` and `stderr`.
pub fn run_with<I, T, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let matches = match clap_command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            use clap::error::ErrorKind;
            let informational = matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            );
            let sink: &mut dyn Write = if informational { stdout } else { stderr };
            let _ = write!(sink, "{}", error.render());
            return ExitCode::from(if informational { EXIT_OK } else { EXIT_SYNTAX });
        }
    };

    let Some(options) = Options::from_matches(&matches) else {
        let _ = writeln!(stderr, "streamdelta: missing required operands");
        return ExitCode::from(EXIT_SYNTAX);
    };

    match run(&options, stdout, stderr) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(error) => {
            let _ = writeln!(stderr, "streamdelta: {error}");
            let code = if matches!(error, CliError::DebugFlags(_)) {
                EXIT_SYNTAX
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

fn run<Out: Write, Err: Write>(
    options: &Options,
    stdout: &mut Out,
    stderr: &mut Err,
) -> Result<(), CliError> {
    let mut verbosity = VerbosityConfig::from_verbose_level(options.verbose);
    if let Some(flags) = &options.debug {
        verbosity.apply_debug_flags(flags)?;
    }
    if let Err(InitError::Filter(error)) = init_tracing(&verbosity) {
        writeln!(stderr, "streamdelta: logging disabled: {error}")?;
    }

    match options.checksum.as_str() {
        "md5" => run_with_digest::<Md5, _>(options, stdout),
        "sha1" => run_with_digest::<Sha1, _>(options, stdout),
        "sha256" => run_with_digest::<Sha256, _>(options, stdout),
        "xxh64" => run_with_digest::<Xxh64, _>(options, stdout),
        "xxh3" => run_with_digest::<Xxh3, _>(options, stdout),
        _ => run_with_digest::<Md4, _>(options, stdout),
    }
}

fn open(path: &Path) -> Result<File, CliError> {
    File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn run_with_digest<S: StrongDigest, Out: Write>(
    options: &Options,
    stdout: &mut Out,
) -> Result<(), CliError> {
    let old = open(&options.old)?;
    let old_len = old
        .metadata()
        .map_err(|source| CliError::Open {
            path: options.old.clone(),
            source,
        })?
        .len();

    let default_strong = S::DIGEST_LEN.min(16) as u8;
    let strong = NonZeroU8::new(options.strong_length.unwrap_or(default_strong))
        .ok_or(ConfigError::ZeroStrongLength)?;
    let layout = match options.block_size.and_then(NonZeroU32::new) {
        Some(block) => SignatureLayout::new(block, strong),
        None => SignatureLayout::for_file_length(old_len, strong),
    };
    let seed = options.checksum_seed.as_deref().map(str::as_bytes);

    let signature = generate_file_signature::<S, _>(BufReader::new(old), layout, seed)?;
    let table = Arc::new(ChecksumTable::from_signature(&signature)?);

    let mut builder = MatchConfig::builder_for_layout(layout);
    if let Some(chunk) = options.chunk_size {
        builder = builder.chunk_size(chunk);
    }
    if let Some(seed) = seed {
        builder = builder.checksum_seed(seed);
    }
    let config = builder.build()?;

    let new = open(&options.new)?;
    let script = generate_delta::<RollingChecksum, S, _>(BufReader::new(new), config, table)?;

    if options.events {
        write_events(&script, stdout)?;
    }
    write_summary::<S, _>(&script, layout, signature.blocks().len(), stdout)?;

    if let Some(path) = &options.output {
        let basis = open(&options.old)?;
        let output = File::create(path).map_err(|source| CliError::Create {
            path: path.clone(),
            source,
        })?;
        let mut output = BufWriter::new(output);
        let written = apply_delta(BufReader::new(basis), &script, &mut output)?;
        output.flush()?;
        writeln!(stdout, "rebuilt: {written} bytes -> {}", path.display())?;
    }
    Ok(())
}

fn write_events<Out: Write>(script: &DeltaScript, stdout: &mut Out) -> io::Result<()> {
    for event in script {
        match event {
            DeltaEvent::Offsets(copy) => writeln!(
                stdout,
                "copy new={} old={} len={}",
                copy.new_offset, copy.old_offset, copy.length
            )?,
            DeltaEvent::DataBlock(block) => writeln!(
                stdout,
                "data new={} len={}",
                block.offset,
                block.data.len()
            )?,
        }
    }
    Ok(())
}

fn write_summary<S: StrongDigest, Out: Write>(
    script: &DeltaScript,
    layout: SignatureLayout,
    blocks: usize,
    stdout: &mut Out,
) -> io::Result<()> {
    let copies = script.events().iter().filter(|event| !event.is_literal()).count();
    writeln!(
        stdout,
        "signature: {blocks} blocks of {} bytes, {} strong bytes ({})",
        layout.block_length(),
        layout.strong_sum_length(),
        S::NAME
    )?;
    writeln!(
        stdout,
        "events: {} ({copies} copies, {} literals)",
        script.len(),
        script.len() - copies
    )?;
    writeln!(stdout, "matched: {} bytes", script.copy_bytes())?;
    writeln!(stdout, "literal: {} bytes", script.literal_bytes())?;
    writeln!(stdout, "total: {} bytes", script.total_len())
}
