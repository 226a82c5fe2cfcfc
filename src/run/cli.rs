use crate::ContentKind;
use clap::{Parser, ValueEnum};
use derive_builder::Builder;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

macro_rules! create_options_structs {
    (
        $(
            $(#[$meta:meta])*
            clap $clap:tt
            pub $name:ident : $ty:ty
        ),* $(,)?
    ) => {
        #[derive(Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Parser)]
        #[command(version, about, long_about = None)]
        #[doc(hidden)]
        pub struct CliOptions {
            $(
            $(#[$meta])*
            #[arg$clap]
            pub(crate) $name: $ty,
            )*

            // clap-only stuff:

            /// A content item to query, as `[KIND:]PATH`. May be repeated; items are queried in the order given.
            ///
            /// KIND is one of text, html or json. Without it, the kind comes from the file extension: .html and .htm
            /// are HTML, .json is JSON, and anything else is text.
            ///
            /// A PATH of "-" is standard input. All but the first "-" are ignored. If no files are given at all,
            /// standard input is read as text.
            #[arg(long = "file", short = 'f', value_name = "[KIND:]PATH")]
            pub(crate) files: Vec<InputSpec>,

            /// The queries to run, each as `[regex:|css:|xpath:|json:]EXPRESSION[ >> FUNCTION]*`.
            #[arg(required = true, value_name = "QUERY")]
            pub(crate) queries: Vec<String>,
        }

        /// Options analogous to the strainer CLI's switches.
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
        pub struct RunOptions {
            $(
            $(#[$meta])*
            pub $name: $ty,
            )*

            /// The content items to load, in order. Empty means "stdin, as text".
            #[builder(default)]
            pub inputs: Vec<InputSpec>,

            pub queries: Vec<String>,
        }

        impl From<CliOptions> for RunOptions {
            fn from(value: CliOptions) -> Self {
                Self {
                    $($name: value.$name,)*
                    inputs: value.files,
                    queries: value.queries,
                }
            }
        }
    };
}

create_options_structs! {
    /// Which result to keep from each query. -1 keeps all of them; 0 or more keeps only that one.
    clap(long, short, default_value_t = -1, allow_negative_numbers = true)
    pub index: i64,

    /// How to combine the queries.
    clap(long, short, value_enum, default_value_t = Mode::Batch)
    pub mode: Mode,

    /// Specifies the output format. Defaults to plain.
    clap(long, short, value_enum, default_value_t = OutputFormat::Plain)
    pub output: OutputFormat,

    /// Quiet: do not print anything to stdout. The exit code will still be 0 if anything matched, and non-0 if not.
    clap(long, short)
    pub quiet: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            index: -1,
            mode: Mode::Batch,
            output: OutputFormat::Plain,
            quiet: false,
            inputs: Vec::new(),
            queries: Vec::new(),
        }
    }
}

/// How the queries combine, analogous to `--mode` in the CLI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Mode {
    /// Run every query independently, and report each one's results.
    #[default]
    Batch,

    /// Report the results of the first query that finds anything.
    First,

    /// Report the union of every query's results, without duplicates.
    Many,
}

/// Output formats, analogous to `--output` in the CLI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum OutputFormat {
    /// One result per line.
    #[default]
    Plain,

    /// A JSON array. In batch mode, each element is an object with the query and its results; otherwise, each element
    /// is one result.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let self_str = match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
        };
        f.write_str(self_str)
    }
}

/// One `--file` argument: a path, and the kind of content it holds.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InputSpec {
    pub kind: ContentKind,
    pub path: String,
}

impl InputSpec {
    pub fn new(kind: ContentKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn is_stdin(&self) -> bool {
        self.path == "-"
    }
}

impl FromStr for InputSpec {
    type Err = String;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        let explicit = [ContentKind::Text, ContentKind::Html, ContentKind::Json]
            .into_iter()
            .find_map(|kind| arg.strip_prefix(&format!("{kind}:")).map(|path| (kind, path)));
        let (kind, path) = match explicit {
            Some(found) => found,
            None => (kind_from_extension(arg), arg),
        };
        if path.is_empty() {
            return Err(format!("no path in {arg:?}"));
        }
        Ok(Self::new(kind, path))
    }
}

fn kind_from_extension(path: &str) -> ContentKind {
    let extension = Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("html" | "htm") => ContentKind::Html,
        Some("json") => ContentKind::Json,
        _ => ContentKind::Text,
    }
}
