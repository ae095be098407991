//! CLI tool to parse C and C++ files, dump their syntax trees, and write
//! tag files.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cfront_rs::tags::{Extras, Fields, TagOptions};
use cfront_rs::{Error, Mode, ParseOptions, Parsed, Tag, dump, tags};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Usage errors, following sysexits.
const EXIT_USAGE: u8 = 64;
const EXIT_DIAGNOSTICS: u8 = 1;
const EXIT_IO: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "cfront", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse files, report diagnostics, and optionally dump the tree
    Parse {
        /// Source files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language mode (c, cpp, auto)
        #[arg(long, default_value = "auto")]
        mode: Mode,

        /// What to print on stdout
        #[arg(long, value_enum, default_value_t = DumpFormat::None)]
        dump: DumpFormat,

        /// Keep comments in the tree
        #[arg(long)]
        comments: bool,

        /// Print a summary line per file
        #[arg(short, long)]
        verbose: bool,
    },
    /// Write a Vi-compatible tag file for the given sources
    Tags {
        /// Source files to index
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language mode (c, cpp, auto)
        #[arg(long, default_value = "auto")]
        mode: Mode,

        /// Tag file to write, `-` for stdout
        #[arg(short = 'f', default_value = "tags")]
        tag_file: String,

        /// Sort tags by name (yes, no)
        #[arg(long, default_value = "yes", value_parser = parse_switch, action = ArgAction::Set)]
        sort: bool,

        /// Extra entries: `+q` qualified names, `+f` file-scope markers
        #[arg(long)]
        extras: Option<Extras>,

        /// Fields to print, e.g. `+e-a` or `nksSt`
        #[arg(long)]
        fields: Option<Fields>,
    },
}

/// ctags-style switch value.
fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "on" | "true" | "1" => Ok(true),
        "no" | "off" | "false" | "0" => Ok(false),
        _ => Err(format!("expected yes or no, got '{value}'")),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    Sexp,
    Json,
    Tags,
    None,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match cli.command {
        Command::Parse {
            files,
            mode,
            dump,
            comments,
            verbose,
        } => {
            let options = ParseOptions::new().mode(mode).keep_comments(comments);
            run_parse(&files, &options, dump, verbose)
        }
        Command::Tags {
            files,
            mode,
            tag_file,
            sort,
            extras,
            fields,
        } => {
            let options = TagOptions {
                sort,
                extras: extras.unwrap_or_default(),
                fields: fields.unwrap_or_default(),
            };
            run_tags(&files, &ParseOptions::new().mode(mode), &tag_file, &options)
        }
    }
}

fn run_tags(
    files: &[PathBuf],
    parse_options: &ParseOptions,
    tag_file: &str,
    options: &TagOptions,
) -> ExitCode {
    let mut io_failed = false;
    let mut had_diagnostics = false;
    let unsorted = TagOptions {
        sort: false,
        ..*options
    };
    let mut all: Vec<Tag> = Vec::new();

    for (path, result) in files
        .iter()
        .zip(cfront_rs::parse_files(files, parse_options))
    {
        match result {
            Ok(parsed) => {
                eprint!("{}", parsed.render_diagnostics());
                had_diagnostics |= !parsed.diagnostics.is_empty();
                let file = path.display().to_string();
                all.extend(tags::collect_with(
                    &parsed.unit,
                    &parsed.source,
                    &file,
                    &unsorted,
                ));
            }
            Err(e @ Error::Io { .. }) => {
                eprintln!("{e}");
                io_failed = true;
            }
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                had_diagnostics = true;
            }
        }
    }

    if options.sort {
        tags::sort(&mut all);
    }
    let written = if tag_file == "-" {
        tags::write_tags(BufWriter::new(io::stdout().lock()), &all, options)
    } else {
        File::create(tag_file)
            .and_then(|file| tags::write_tags(BufWriter::new(file), &all, options))
    };
    if let Err(e) = written {
        eprintln!("{tag_file}: {e}");
        io_failed = true;
    }

    if io_failed {
        ExitCode::from(EXIT_IO)
    } else if had_diagnostics {
        ExitCode::from(EXIT_DIAGNOSTICS)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_parse(
    files: &[PathBuf],
    options: &ParseOptions,
    format: DumpFormat,
    verbose: bool,
) -> ExitCode {
    let mut io_failed = false;
    let mut had_diagnostics = false;

    for (path, result) in files.iter().zip(cfront_rs::parse_files(files, options)) {
        let parsed = match result {
            Ok(parsed) => parsed,
            Err(e @ Error::Io { .. }) => {
                eprintln!("{e}");
                io_failed = true;
                continue;
            }
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                had_diagnostics = true;
                continue;
            }
        };

        eprint!("{}", parsed.render_diagnostics());
        had_diagnostics |= !parsed.diagnostics.is_empty();

        if let Err(e) = print_dump(&parsed, path, format) {
            eprintln!("{}: {e}", path.display());
            io_failed = true;
        }

        if verbose {
            let items = parsed.unit.items.len();
            let diagnostics = parsed.diagnostics.len();
            eprintln!(
                "{}: {}, {items} item(s), {diagnostics} diagnostic(s)",
                path.display(),
                parsed.unit.language
            );
        }
    }

    if io_failed {
        ExitCode::from(EXIT_IO)
    } else if had_diagnostics {
        ExitCode::from(EXIT_DIAGNOSTICS)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_dump(parsed: &Parsed, path: &Path, format: DumpFormat) -> Result<(), Error> {
    match format {
        DumpFormat::Sexp => print!("{}", dump::to_sexp(&parsed.unit)?),
        DumpFormat::Json => print!("{}", dump::to_json(&parsed.unit)?),
        DumpFormat::Tags => {
            let file = path.display().to_string();
            let options = TagOptions::default();
            for tag in tags::collect_with(&parsed.unit, &parsed.source, &file, &options) {
                println!("{}", tag.render(&options));
            }
        }
        DumpFormat::None => {}
    }
    Ok(())
}
