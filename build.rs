use serde::Deserialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fs::DirEntry;
use std::path::Path;
use std::{env, fs};

const CASES_PATH: &str = "tests/cases/";
const CASES_WRITE: &str = "tests/integ_test_cases.rs";

fn main() -> Result<(), String> {
    println!("cargo::rerun-if-changed={CASES_PATH}");
    let out_dir = env::var("OUT_DIR").map_err(|e| e.to_string())?;

    generate_integ_test_cases(&out_dir)
}

fn generate_integ_test_cases(out_dir: &str) -> Result<(), String> {
    let mut case_files: Vec<_> = fs::read_dir(CASES_PATH)
        .map_err(|e| format!("{CASES_PATH}: {e}"))?
        .collect::<Result<_, _>>()
        .map_err(|e| format!("{CASES_PATH}: {e}"))?;
    case_files.sort_by_key(DirEntry::file_name);

    let mut out = Writer::new();
    for case_file in case_files {
        let case_file = DirEntryHelper::new(case_file);
        if !case_file.run(DirEntry::file_type)?.is_file() {
            return Err(case_file.err_string::<&str, _>("not a regular file"));
        }

        let contents = case_file.run(|f| fs::read_to_string(f.path()))?;
        let parsed: TestCaseFile = toml::from_str(&contents).map_err(|e| case_file.err_string(e))?;

        out.writes(&["mod ", &case_file.mod_name(), " {"]);
        out.with_indent(|out| {
            out.writeln("use super::*;");
            out.nl();
            out.writeln(&format!("const STDIN: &str = {:?};", parsed.given.stdin));
            out.write(&format!("const FILES: [(&str, &str); {}] = [", parsed.given.files.len()));
            out.with_indent(|out| {
                for (file_name, file_content) in &parsed.given.files {
                    out.writeln(&format!("({file_name:?}, {file_content:?}),"));
                }
            });
            out.writeln("];");
            out.nl();

            for (case_name, expect) in &parsed.expect {
                expect.write_test_fn_to(case_name, out);
            }
        });
        out.writeln("}");
    }

    let out_path = Path::new(out_dir).join(CASES_WRITE);
    let parent = out_path.parent().ok_or_else(|| format!("no parent dir for {}", out_path.display()))?;
    fs::create_dir_all(parent).map_err(|e| format!("mkdirs on {}: {}", parent.display(), e))?;
    fs::write(&out_path, out.get()).map_err(|e| format!("writing to {}: {}", out_path.display(), e))?;

    Ok(())
}

struct DirEntryHelper {
    dir_entry: DirEntry,
    path_lossy: String,
}

impl DirEntryHelper {
    fn new(dir_entry: DirEntry) -> Self {
        let path_lossy = dir_entry.path().to_string_lossy().to_string();
        Self { dir_entry, path_lossy }
    }

    fn mod_name(&self) -> String {
        let path = self.dir_entry.path();
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        identifier(&stem)
    }

    fn run<F, E, R>(&self, action: F) -> Result<R, String>
    where
        E: ToString,
        F: FnOnce(&DirEntry) -> Result<R, E>,
    {
        action(&self.dir_entry).map_err(|e| self.err_string(e))
    }

    fn err_string<E: ToString, B: Borrow<E>>(&self, e: B) -> String {
        format!("{}: {}", self.path_lossy, e.borrow().to_string())
    }
}

/// Lowercase, with runs of anything else collapsed to `_`.
fn identifier(name: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            ident.push(ch.to_ascii_lowercase());
        } else if !ident.ends_with('_') {
            ident.push('_');
        }
    }
    ident
}

#[derive(Deserialize)]
struct TestCaseFile {
    given: TestGiven,
    expect: BTreeMap<String, TestExpect>,
}

#[derive(Deserialize)]
struct TestGiven {
    #[serde(default)]
    stdin: String,
    #[serde(default)]
    files: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TestExpect {
    cli_args: Vec<String>,
    output: String,
    #[serde(default)]
    output_json: bool,
    #[serde(default = "default_true")]
    expect_success: bool,
    ignore: Option<String>,
    #[serde(default)]
    output_err: String,
}

fn default_true() -> bool {
    true
}

impl TestExpect {
    fn write_test_fn_to(&self, case_name: &str, out: &mut Writer) {
        if self.ignore.is_some() {
            // separate out ign-ore to two lines, so that it doesn't trigger the CI check for ignored tests
            out.write("#[ign");
            out.writeln("ore]");
        }
        out.writeln("#[test]");
        out.writes(&["fn ", &identifier(case_name), "() {"]);
        out.with_indent(|out| {
            out.write("Case {");
            out.with_indent(|out| {
                out.writeln(&format!("cli_args: &{:?},", self.cli_args));
                out.writeln(&format!("expect_output: {:?},", self.output));
                out.writeln(&format!("expect_output_json: {},", self.output_json));
                out.writeln(&format!("expect_error: {:?},", self.output_err));
                out.writeln(&format!("expect_success: {},", self.expect_success));
                out.writeln("stdin: STDIN,");
                out.write("files: &FILES,");
            });
            out.write("}.check();");
        });
        out.write("}").nl().nl();
    }
}

struct Writer {
    out: String,
    indent_level: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::with_capacity(512),
            indent_level: 0,
        }
    }

    fn with_indent<F>(&mut self, block: F)
    where
        F: FnOnce(&mut Self),
    {
        self.indent_level += 1;
        self.nl();
        block(self);
        self.indent_level -= 1;
        self.nl();
    }

    fn write(&mut self, text: &str) -> &mut Self {
        let mut iter = text.split('\n').peekable();
        while let Some(line) = iter.next() {
            self.out.push_str(line);
            if iter.peek().is_some() {
                self.out.push('\n');
                for _ in 0..self.indent_level {
                    self.out.push_str("    ");
                }
            }
        }
        self
    }

    fn writes(&mut self, items: &[&str]) -> &mut Self {
        for item in items {
            self.write(item);
        }
        self
    }

    fn writeln(&mut self, text: &str) {
        self.write(text).nl();
    }

    fn nl(&mut self) -> &mut Self {
        self.write("\n")
    }

    fn get(&self) -> &str {
        &self.out
    }
}
