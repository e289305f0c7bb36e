use anyhow::{Context, Result};
use argspec::{ConvertError, Matches, Value};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A text file loaded while parsing the `file` positional.
#[derive(Debug)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

/// Conversion function for the `file` param: reads the whole file up front so
/// a bad path is reported as an invalid argument.
pub fn load(raw: &str) -> Result<Value, ConvertError> {
    let text = fs::read_to_string(raw)?;
    Ok(Value::opaque(Document {
        path: PathBuf::from(raw),
        text,
    }))
}

pub fn parse_top(raw: &str) -> Result<Value, ConvertError> {
    let n: u32 = raw.parse()?;
    Ok(Value::Int(i64::from(n)))
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Report {
    pub file: String,
    pub lines: usize,
    pub words: usize,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_words: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

pub fn analyze(doc: &Document, top: usize, tags: Vec<String>) -> Report {
    let mut freq: IndexMap<String, usize> = IndexMap::new();
    let mut words = 0;
    for word in doc.text.split_whitespace() {
        words += 1;
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if !word.is_empty() {
            *freq.entry(word).or_default() += 1;
        }
    }

    // Stable sort keeps first-seen order between equal counts.
    let mut top_words: Vec<(String, usize)> = freq.into_iter().collect();
    top_words.sort_by(|a, b| b.1.cmp(&a.1));
    top_words.truncate(top);

    Report {
        file: doc.path.display().to_string(),
        lines: doc.text.lines().count(),
        words,
        bytes: doc.text.len(),
        top_words,
        tags,
    }
}

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("file:  {}\n", report.file));
    out.push_str(&format!("lines: {}\n", report.lines));
    out.push_str(&format!("words: {}\n", report.words));
    out.push_str(&format!("bytes: {}\n", report.bytes));
    if !report.tags.is_empty() {
        out.push_str(&format!("tags:  {}\n", report.tags.join(", ")));
    }
    if !report.top_words.is_empty() {
        out.push_str("\nTop words:\n");
        let width = report
            .top_words
            .iter()
            .map(|(w, _)| w.chars().count())
            .max()
            .unwrap_or(0);
        for (word, count) in &report.top_words {
            out.push_str(&format!("  {word:<width$} {count}\n"));
        }
    }
    out
}

/// Run the `stats` command against parsed arguments.
pub fn run(matches: &Matches) -> Result<()> {
    let doc = matches
        .get_as::<Document>("file")
        .context("`file` was not converted to a document")?;
    let top = matches
        .get("top")
        .and_then(Value::as_int)
        .unwrap_or(0)
        .max(0) as usize;
    let tags: Vec<String> = matches
        .get_list("tag")
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    let verbosity = matches.count("verbose");

    let report = analyze(doc, top, tags);
    if verbosity > 0 {
        tracing::info!(
            file = %report.file,
            lines = report.lines,
            words = report.words,
            "analyzed document"
        );
    }

    let rendered = if matches.is_present("json") {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        json
    } else {
        render_text(&report)
    };

    match matches.get_str("output") {
        Some(output) => write_report(Path::new(output), &rendered),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn write_report(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote report");
    eprintln!("Wrote: {}", path.display());
    Ok(())
}
