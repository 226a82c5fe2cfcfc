use crate::run::cli::{InputSpec, Mode, OutputFormat};
use crate::run::RunOptions;
use crate::{ContentItem, ContentKind, Strainer};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::{env, io};

/// The run's overall possible error.
#[derive(Debug)]
pub enum Error {
    /// Couldn't read an input file.
    FileReadError(Input, io::Error),

    /// Couldn't write the results.
    Output(io::Error),
}

impl std::error::Error for Error {}

/// Stdin or an input file by path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Stdin,
    FilePath(String),
}

impl Error {
    pub(crate) fn from_io_error(error: io::Error, file: Input) -> Self {
        Error::FileReadError(file, error)
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::FilePath(file) => write!(f, "file {file:?}"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (err, context) = match self {
            Error::FileReadError(file, err) => (err, format!("while reading {file}")),
            Error::Output(err) => (err, "while writing output".to_string()),
        };
        if env::var("STRAINER_PORTABLE_ERRORS").unwrap_or_default().is_empty() {
            writeln!(f, "{err} {context}")
        } else {
            writeln!(f, "{} {context}", err.kind())
        }
    }
}

/// A simple facade for handling I/O.
///
/// This trait lets you do "I/O-y stuff" like mocking out stdin or reading files. The [`run`] method uses it.
pub trait OsFacade {
    /// Read stdin (or your mock of it) to a `String`.
    fn read_stdin(&self) -> io::Result<String>;

    /// Read a file path (or your mock of one) to a `String`.
    fn read_file(&self, path: &str) -> io::Result<String>;

    /// Get a writer for stdout (or your mock of it).
    fn stdout(&mut self) -> impl Write;

    /// Handle an error.
    fn write_error(&mut self, err: Error);

    /// Read each input into its own [ContentItem], in order.
    ///
    /// The default implementation (which you should feel free to use) reads all of stdin as a single text item if
    /// `inputs` is empty. Otherwise, the first `"-"` path reads all of stdin (via [`Self::read_stdin`]), and subsequent
    /// `"-"`s get silently ignored.
    fn read_inputs(&self, inputs: &[InputSpec]) -> Result<Vec<ContentItem>, Error> {
        if inputs.is_empty() {
            let stdin = self.read_stdin().map_err(|err| Error::from_io_error(err, Input::Stdin))?;
            return Ok(vec![ContentItem::new(stdin, ContentKind::Text)]);
        }
        let mut items = Vec::with_capacity(inputs.len());
        let mut have_read_stdin = false;
        for input in inputs {
            let payload = if input.is_stdin() {
                if have_read_stdin {
                    continue;
                }
                have_read_stdin = true;
                self.read_stdin().map_err(|err| Error::from_io_error(err, Input::Stdin))?
            } else {
                self.read_file(&input.path)
                    .map_err(|err| Error::from_io_error(err, Input::FilePath(input.path.clone())))?
            };
            items.push(ContentItem::new(payload, input.kind));
        }
        Ok(items)
    }
}

/// Runs strainer end to end.
///
/// This uses the provided [RunOptions] and [OsFacade] to load every input into a [Strainer], runs
/// [`RunOptions::queries`] against it as [`RunOptions::mode`] says, and then writes the results to the given
/// [`OsFacade`] in the format specified by [`RunOptions::output`]. Returns whether anything matched.
pub fn run(cli: &RunOptions, os: &mut impl OsFacade) -> bool {
    match run_or_error(cli, os) {
        Ok(ok) => ok,
        Err(err) => {
            os.write_error(err);
            false
        }
    }
}

#[derive(Serialize)]
struct QueryResults<'a> {
    query: &'a str,
    results: &'a [String],
}

fn run_or_error(cli: &RunOptions, os: &mut impl OsFacade) -> Result<bool, Error> {
    let mut strainer = Strainer::new();
    for item in os.read_inputs(&cli.inputs)? {
        strainer.add_item(item);
    }

    let queries: Vec<(i64, &str)> = cli.queries.iter().map(|query| (cli.index, query.as_str())).collect();
    let mut out: Vec<u8> = Vec::with_capacity(256); // just a guess
    let (found_any, written) = match cli.mode {
        Mode::Batch => {
            let batch = strainer.query_batch(&queries);
            let written = match cli.output {
                OutputFormat::Plain => write_lines(&mut out, batch.iter().flatten()),
                OutputFormat::Json => {
                    let objects: Vec<_> = cli
                        .queries
                        .iter()
                        .zip(&batch)
                        .map(|(query, results)| QueryResults { query, results })
                        .collect();
                    write_json(&mut out, &objects)
                }
            };
            (batch.iter().any(|results| !results.is_empty()), written)
        }
        Mode::First | Mode::Many => {
            let results = match cli.mode {
                Mode::First => strainer.select_first(&queries),
                _ => strainer.select_many(&queries),
            };
            let written = match cli.output {
                OutputFormat::Plain => write_lines(&mut out, &results),
                OutputFormat::Json => write_json(&mut out, &results),
            };
            (!results.is_empty(), written)
        }
    };
    written.map_err(Error::Output)?;

    if !cli.quiet {
        os.stdout().write_all(&out).map_err(Error::Output)?;
    }
    Ok(found_any)
}

fn write_lines<'a, W, I>(out: &mut W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a String>,
{
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}
