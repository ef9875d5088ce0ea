mod logging;

use std::io::Write;
use std::process::exit;

use anyhow::{bail, Context, Result};
use clap::{ColorChoice, CommandFactory as _, Parser, Subcommand};
use kube_patch::{diff_json_map, diff_metadata, ObjectMetadata, PatchOperations};
use kube_patch_cli::input::{self, Source};
use serde_json::{Map, Value};

fn main() {
    let args = Args::parse();
    handle_result(run_args(args));
}

fn run_args(args: Args) -> Result<()> {
    logging::set_up(&logging::Options {
        verbose: args.options.verbose,
        color: args.options.color,
    })?;

    let mut out = std::io::stdout().lock();
    run_command(&args.command, &mut out)
}

/// Run a command, writing its result to `out`.
fn run_command(command: &Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Diff {
            prefix,
            inputs,
            pretty,
        } => {
            let (old, new) = inputs.sources()?;
            let old = match old {
                Some(source) => input::read_json_object(&source)?,
                None => Map::new(),
            };
            let new = input::read_json_object(&new)?;
            let ops = diff_json_map(prefix, &old, &new)
                .with_context(|| format!("Could not diff the maps at {}", prefix))?;
            tracing::info!(prefix = prefix.as_str(), operations = ops.len(), "computed patch");
            print_patch(&ops, *pretty, out)
        }
        Commands::Metadata {
            prefix,
            inputs,
            pretty,
        } => {
            let (old, new) = inputs.sources()?;
            let old: ObjectMetadata = match old {
                Some(source) => input::read_json(&source)?,
                None => ObjectMetadata::default(),
            };
            let new: ObjectMetadata = input::read_json(&new)?;
            let ops = diff_metadata(prefix, &old, &new);
            tracing::info!(prefix = prefix.as_str(), operations = ops.len(), "computed patch");
            print_patch(&ops, *pretty, out)
        }
        Commands::Check {
            patch,
            document,
            expect,
        } => {
            let patch_source = Source::from_path(patch);
            let document_source = Source::from_path(document);
            let expect_source = expect.as_deref().map(Source::from_path);
            input::check_single_stdin(
                [&patch_source, &document_source]
                    .into_iter()
                    .chain(expect_source.as_ref()),
            )?;

            let ops: PatchOperations = input::read_json(&patch_source)?;
            let mut doc: Value = input::read_json(&document_source)?;
            tracing::debug!(operations = ops.len(), "applying patch");
            ops.apply(&mut doc).with_context(|| {
                format!("Could not apply {} to {}", patch_source, document_source)
            })?;

            match expect_source {
                Some(expect_source) => {
                    let expected: Value = input::read_json(&expect_source)?;
                    if doc != expected {
                        bail!(
                            "Patched document does not match {}:\n{}",
                            expect_source,
                            serde_json::to_string_pretty(&doc)?
                        );
                    }
                    tracing::info!("patched document matches {}", expect_source);
                }
                None => {
                    serde_json::to_writer_pretty(&mut *out, &doc)?;
                    out.write_all(b"\n")?;
                }
            }
            Ok(())
        }
        Commands::GenerateMan => {
            let cmd = Args::command();
            let man = clap_mangen::Man::new(cmd);
            let mut buffer: Vec<u8> = Default::default();
            man.render(&mut buffer)?;
            writeln!(out, "{}", String::from_utf8(buffer)?)?;
            Ok(())
        }
        Commands::GenerateMarkdown => {
            let opts = clap_markdown::MarkdownOptions::new().show_footer(false);
            let markdown: String = clap_markdown::help_markdown_custom::<Args>(&opts);
            writeln!(out, "{}", markdown)?;
            Ok(())
        }
        Commands::GenerateCompletion { shell } => {
            let mut cmd = Args::command();
            clap_complete::generate(*shell, &mut cmd, "kube-patch", out);
            Ok(())
        }
    }
}

fn print_patch(ops: &PatchOperations, pretty: bool, out: &mut impl Write) -> Result<()> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(ops)?
    } else {
        ops.to_json()?
    };
    out.write_all(&bytes)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn handle_result(r: Result<()>) {
    match r {
        Ok(()) => {}
        Err(e) => {
            eprintln!("kube-patch error: {:#}", e);
            exit(1);
        }
    }
}

/// Print the JSON Patch that turns one string map into another
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: Options,
}

#[derive(Parser, Debug, Clone)]
struct Options {
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[arg(long, global = true, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

/// The old and new state of the object to diff.
///
/// FILE arguments may be `-` to read standard input.
#[derive(clap::Args, Debug)]
struct Inputs {
    /// File with the current state (default: empty)
    #[arg(long, value_name = "FILE", conflicts_with = "old_json")]
    old: Option<String>,

    /// The current state, as inline JSON
    #[arg(long, value_name = "JSON")]
    old_json: Option<String>,

    /// File with the desired state
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "new_json",
        required_unless_present = "new_json"
    )]
    new: Option<String>,

    /// The desired state, as inline JSON
    #[arg(long, value_name = "JSON")]
    new_json: Option<String>,
}

impl Inputs {
    fn sources(&self) -> Result<(Option<Source>, Source)> {
        let old = Source::from_args(self.old.as_deref(), self.old_json.as_deref());
        let new = Source::from_args(self.new.as_deref(), self.new_json.as_deref())
            .ok_or_else(|| {
                anyhow::anyhow!("The desired state is required: pass --new or --new-json")
            })?;
        input::check_single_stdin(old.iter().chain(Some(&new)))?;
        Ok((old, new))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Diff two JSON objects whose values are strings
    Diff {
        /// JSON Pointer of the object in the target resource, e.g. `/metadata/labels`
        #[arg(long)]
        prefix: String,

        #[command(flatten)]
        inputs: Inputs,

        /// Pretty-print the patch
        #[arg(long)]
        pretty: bool,
    },

    /// Diff the labels and annotations of two object metadata blocks
    Metadata {
        /// JSON Pointer of the metadata block in the target resource
        #[arg(long, default_value = "/metadata")]
        prefix: String,

        #[command(flatten)]
        inputs: Inputs,

        /// Pretty-print the patch
        #[arg(long)]
        pretty: bool,
    },

    /// Apply a patch to a document, and optionally compare the result
    Check {
        /// The patch file, as printed by `diff` or `metadata`
        #[arg(long, value_name = "FILE")]
        patch: String,

        /// The document to patch
        #[arg(long, value_name = "FILE")]
        document: String,

        /// The document that patching should produce
        #[arg(long, value_name = "FILE")]
        expect: Option<String>,
    },

    /// Generate markdown documentation for kube-patch
    #[command(hide = true)]
    GenerateMarkdown,

    /// Generate a manpage for kube-patch
    #[command(hide = true)]
    GenerateMan,

    /// Generate shell completion for kube-patch
    #[command(hide = true)]
    GenerateCompletion {
        /// The shell to generate completion for
        #[arg(long)]
        shell: clap_complete::Shell,
    },
}
