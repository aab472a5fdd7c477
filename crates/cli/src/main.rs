mod args;
mod compare;
mod history;
mod input;
mod json;
mod logging;
mod text;

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use args::{
    Command, Localization, OutputFormat, ParsedArgs, detect_localization, parse_args, print_help,
    tr,
};
use compare::{PairOutcome, PairResult, PairSettings, compare_all};
use input::{Loaded, expand_candidates, load_source};

fn main() {
    logging::init_tracing();

    let argv: Vec<String> = env::args().skip(1).collect();
    let localization = match detect_localization(&argv) {
        Ok(v) => v,
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help(Localization::En);
            std::process::exit(2);
        }
    };

    let wants_help = argv
        .iter()
        .take_while(|arg| arg.as_str() != "--")
        .any(|arg| arg == "-h" || arg == "--help");
    if wants_help {
        print_help(localization);
        return;
    }
    let wants_version = argv
        .iter()
        .take_while(|arg| arg.as_str() != "--")
        .any(|arg| arg == "-V" || arg == "--version");
    if wants_version {
        println!("code-pair-check {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let parsed = match parse_args(&argv, localization) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{} {message}\n", tr(localization, "Error:", "错误:"));
            print_help(localization);
            std::process::exit(2);
        }
    };

    match run(&parsed) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("{} {err}", tr(localization, "Error:", "错误:"));
            std::process::exit(1);
        }
    }
}

fn run(parsed: &ParsedArgs) -> io::Result<i32> {
    match &parsed.command {
        Command::ListHistory(file) => {
            let records = history::load_records(file)?;
            print!("{}", history::format_records(&records, parsed.localization));
            Ok(0)
        }
        Command::Compare { base, candidates } => run_compare(parsed, base, candidates),
    }
}

fn run_compare(parsed: &ParsedArgs, base: &Path, candidates: &[PathBuf]) -> io::Result<i32> {
    let localization = parsed.localization;
    let base_text = match load_source(base, parsed.max_file_size)? {
        Loaded::Text(text) => text,
        Loaded::Skipped(reason) => {
            return Err(io::Error::other(format!(
                "{} {} ({reason})",
                tr(localization, "cannot read base file", "无法读取基准文件"),
                base.display()
            )));
        }
    };

    let candidates = expand_candidates(
        base,
        candidates,
        &parsed.extensions,
        parsed.respect_gitignore,
    );
    if candidates.is_empty() {
        eprintln!(
            "{}",
            tr(
                localization,
                "no candidate files to compare",
                "没有可比较的候选文件"
            )
        );
        return Ok(if parsed.strict { 1 } else { 0 });
    }

    let settings = PairSettings {
        options: parsed.options,
        fallback_lines: parsed.fallback_lines,
        max_file_size: parsed.max_file_size,
    };
    let results = compare_all(&base_text, &candidates, &settings)?;

    match parsed.format {
        OutputFormat::Json => json::write_json(&json::map_results(base, &results))?,
        OutputFormat::Html => print!(
            "{}",
            text::render_html_document(localization, base, &base_text, &results)
        ),
        OutputFormat::Text => print_text(parsed, base, &base_text, &results),
    }

    if let Some(file) = &parsed.history {
        history::append_records(file, &history_records(base, &results))?;
    }

    let incomparable = results.iter().filter(|r| !r.outcome.is_compared()).count();
    if parsed.strict && incomparable > 0 {
        eprintln!(
            "{}: {incomparable}",
            tr(
                localization,
                "pairs that could not be compared",
                "无法比较的文件对"
            )
        );
        return Ok(1);
    }
    Ok(0)
}

fn print_text(parsed: &ParsedArgs, base: &Path, base_text: &str, results: &[PairResult]) {
    let mut out = String::new();
    for result in results {
        out.push_str(&text::format_summary_line(parsed.localization, base, result));
        out.push('\n');
        if parsed.summary {
            continue;
        }
        if let PairOutcome::Compared {
            report,
            candidate_text,
            ..
        } = &result.outcome
        {
            out.push_str(&text::format_pair_detail(
                parsed.localization,
                (base, base_text),
                (&result.candidate, candidate_text),
                report,
                parsed.color,
            ));
        }
    }
    print!("{out}");
}

fn history_records(base: &Path, results: &[PairResult]) -> Vec<history::HistoryRecord> {
    let timestamp = history::now_unix_seconds();
    results
        .iter()
        .filter_map(|result| match &result.outcome {
            PairOutcome::Compared { report, .. } => Some(history::HistoryRecord {
                timestamp,
                base_file: base.display().to_string(),
                compare_file: result.candidate.display().to_string(),
                mode: report.mode.to_string(),
                overall_similarity: report.overall,
            }),
            _ => None,
        })
        .collect()
}
