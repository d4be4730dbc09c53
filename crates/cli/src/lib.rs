#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the thin command-line front-end for the `oc-mirror`
//! workspace. The crate recognises the mirroring switches (`--source`,
//! `--target`, `--diff`, `--generations`, `--exclude`, `--exclude-name`,
//! `--verbosity`) together with `--help`/`-h` and `--version`/`-V`, builds a
//! [`SyncRequest`] from them, and delegates the run to [`engine::run_sync`].
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function
//! accepts an iterator of arguments together with handles for standard
//! output and error, so tests drive it with `Vec<u8>` buffers and the binary
//! wires in locked stdio. Internally a [`clap`](https://docs.rs/clap/)
//! command definition performs the parse; help and version output are
//! rendered from deterministic snapshots rather than clap's generated text
//! so the wording stays byte-identical across clap upgrades.
//!
//! # Invariants
//!
//! - [`run`] never panics; every failure surfaces as a non-zero exit code
//!   with a diagnostic on `stderr`.
//! - Progress output goes to `stdout` through the verbosity-gated
//!   [`MessageSink`]; warnings and errors about the invocation itself go to
//!   `stderr`.
//! - Exit codes come from the shared [`ExitCode`] taxonomy: usage errors are
//!   `1`, a missing source root is `3`, kind collisions at the top level are
//!   `4`, I/O failures are `11`, and a partially applied run is `23`.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["oc-mirror", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(!stdout.is_empty());
//! assert!(stderr.is_empty());
//! ```
//!
//! # See also
//!
//! - `engine` for the reconciliation pipeline behind [`run`].
//! - `bin/oc-mirror` for the binary crate that wires [`run`] into `main`.

use std::ffi::OsString;
use std::io::Write;
use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};
use core::exit_code::{ExitCode, HasExitCode};
use core::message::Message;
use core::version;
use engine::{DiffOptions, SyncRequest, run_sync};
use filters::ExclusionSet;
use logging::{MessageSink, Verbosity};

/// Deterministic help text describing the supported CLI surface.
const HELP_TEXT: &str = concat!(
    "oc-mirror: one-directional directory mirroring with rotating diff generations\n",
    "https://github.com/oferchen/oc-mirror\n",
    "\n",
    "Usage: oc-mirror [OPTIONS] --source <DIR> --target <DIR>\n",
    "\n",
    "Makes TARGET structurally and content-equal to SOURCE. With --diff, every\n",
    "file or directory the run overwrites or deletes is first copied into the\n",
    "newest numbered generation under the diff root.\n",
    "\n",
    "  -s, --source <DIR>         Source root of the mirror.\n",
    "  -t, --target <DIR>         Target root; created when missing.\n",
    "  -d, --diff <DIR>           Diff root; enables pre-change capture.\n",
    "  -n, --generations <N>      Retained generation count (default 9).\n",
    "  -e, --exclude <PATH>       Exact path exempt from creation (repeatable).\n",
    "  -k, --exclude-name <NAME>  Exact basename exempt from creation (repeatable).\n",
    "  -v, --verbosity <LEVEL>    Diagnostic volume, 0 to 5 (default 2).\n",
    "  -h, --help                 Show this help message and exit.\n",
    "  -V, --version              Output version information and exit.\n",
    "\n",
    "Equality is judged by size and microsecond-truncated modification time;\n",
    "file content is never read. Symbolic links are never followed.\n",
);

/// Parsed command produced by [`parse_args`].
#[derive(Debug, Default)]
struct ParsedArgs {
    show_help: bool,
    show_version: bool,
    source: Option<OsString>,
    target: Option<OsString>,
    diff: Option<OsString>,
    generations: Option<u32>,
    excludes: Vec<OsString>,
    exclude_names: Vec<OsString>,
    verbosity: u8,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new("oc-mirror")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg_required_else_help(false)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .value_name("DIR")
                .help("Source root of the mirror.")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .value_name("DIR")
                .help("Target root; created when missing.")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("diff")
                .long("diff")
                .short('d')
                .value_name("DIR")
                .help("Diff root; enables pre-change capture.")
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("generations")
                .long("generations")
                .short('n')
                .value_name("N")
                .help("Retained generation count (default 9).")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .short('e')
                .value_name("PATH")
                .help("Exact path exempt from creation.")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude-name")
                .long("exclude-name")
                .short('k')
                .value_name("NAME")
                .help("Exact basename exempt from creation.")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .short('v')
                .value_name("LEVEL")
                .help("Diagnostic volume, 0 to 5 (default 2).")
                .value_parser(value_parser!(u8)),
        )
}

/// Parses raw arguments into a [`ParsedArgs`] value.
fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = clap_command().try_get_matches_from(arguments)?;
    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        source: matches.get_one::<OsString>("source").cloned(),
        target: matches.get_one::<OsString>("target").cloned(),
        diff: matches.get_one::<OsString>("diff").cloned(),
        generations: matches.get_one::<u32>("generations").copied(),
        excludes: matches
            .get_many::<OsString>("exclude")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        exclude_names: matches
            .get_many::<OsString>("exclude-name")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        verbosity: matches
            .get_one::<u8>("verbosity")
            .copied()
            .unwrap_or(Verbosity::DEFAULT.level()),
    })
}

/// Writes a usage diagnostic and returns the syntax exit code.
fn usage_error<E: Write>(stderr: &mut E, text: impl Into<std::borrow::Cow<'static, str>>) -> i32 {
    let message = Message::error(text).with_code(ExitCode::Syntax.as_i32());
    let _ = message.render_line(stderr);
    ExitCode::Syntax.as_i32()
}

/// Runs the CLI against the provided arguments and output handles.
///
/// `arguments` must include the program name as its first item, mirroring
/// `std::env::args_os`. Returns the process exit code.
pub fn run<I, S, O, E>(arguments: I, stdout: &mut O, stderr: &mut E) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    O: Write,
    E: Write,
{
    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return ExitCode::Syntax.as_i32();
        }
    };

    if parsed.show_help {
        let _ = stdout.write_all(HELP_TEXT.as_bytes());
        return ExitCode::Ok.as_i32();
    }
    if parsed.show_version {
        let _ = stdout.write_all(version::banner().as_bytes());
        return ExitCode::Ok.as_i32();
    }

    let Some(source) = parsed.source else {
        return usage_error(stderr, "a source root is required (use --source <DIR>)");
    };
    let Some(target) = parsed.target else {
        return usage_error(stderr, "a target root is required (use --target <DIR>)");
    };

    let exclusions = match ExclusionSet::new(
        parsed.excludes.into_iter().map(PathBuf::from),
        parsed.exclude_names,
    ) {
        Ok(exclusions) => exclusions,
        Err(error) => {
            let message = Message::error(format!(
                "failed to resolve exclusion paths: {error}"
            ))
            .with_code(ExitCode::FileIo.as_i32());
            let _ = message.render_line(stderr);
            return ExitCode::FileIo.as_i32();
        }
    };

    let mut request = SyncRequest::new(PathBuf::from(source), PathBuf::from(target))
        .with_exclusions(exclusions);
    if let Some(diff) = parsed.diff {
        let mut options = DiffOptions::new(PathBuf::from(diff));
        if let Some(generations) = parsed.generations {
            let Some(generations) = NonZeroU32::new(generations) else {
                return usage_error(stderr, "the generation count must be positive");
            };
            options = options.with_max_generations(generations);
        }
        request = request.with_diff(options);
    }

    let verbosity = Verbosity::new(parsed.verbosity);
    let mut sink = MessageSink::new(&mut *stdout, verbosity);
    let result = run_sync(&request, &mut sink);
    let _ = sink.flush();

    match result {
        Ok(summary) => summary.exit_code().as_i32(),
        Err(error) => {
            let code = error.exit_code();
            let message = Message::error(error.to_string()).with_code(code.as_i32());
            let _ = message.render_line(stderr);
            code.as_i32()
        }
    }
}
