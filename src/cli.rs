// src/cli.rs
use std::{env, path::PathBuf, str::FromStr};

use crate::config::options::{AppOptions, ExportFormat};
use crate::error::{Error, Result};
use crate::progress::{Progress, Stage};
use crate::runner::{self, RunSummary};

pub const HELP: &str = include_str!("cli_help.txt");

pub enum Command {
    Run(AppOptions),
    Help,
}

pub fn run() -> Result<()> {
    let opts = match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{HELP}");
            return Ok(());
        }
        Command::Run(opts) => opts,
    };

    let mut progress = StdoutProgress::default();
    let summary = runner::run(&opts, Some(&mut progress))?;
    print_summary(&summary);
    Ok(())
}

/// Numbered steps on stdout, details indented under them.
#[derive(Default)]
struct StdoutProgress {
    total: usize,
}

impl Progress for StdoutProgress {
    fn begin(&mut self, total: usize) { self.total = total; }

    fn stage_start(&mut self, stage: Stage) {
        println!("{}/{}. {}...", stage.number(), self.total, stage.label());
    }

    fn log(&mut self, msg: &str) { println!("   {msg}"); }
}

fn print_summary(summary: &RunSummary) {
    let report = &summary.report;
    let filled = report.template.rows().iter()
        .filter(|r| r.cells.iter().any(|c| !c.is_empty()))
        .count();
    println!();
    println!("Populated {} of {} template rows across {} dates",
        filled, report.template.rows().len(), report.dates.len());
    let flagged = report.extraction.mapping.iter()
        .flat_map(|(_, values)| values.values())
        .filter(|v| v.is_flagged())
        .count();
    if flagged > 0 {
        println!("{flagged} result(s) flagged high/low");
    }
    if !report.extraction.suspect.is_empty() {
        println!("Check by hand (values may be shifted): {}", report.extraction.suspect.join(", "));
    }
    if !report.diagnostics.is_empty() {
        println!("{} warning(s), see above", report.diagnostics.len());
    }
    println!("Results saved to {}", summary.out_path.display());
}

pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = AppOptions::default();
    let mut have_image = false;
    let mut have_template = false;

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str()
        {
            "-i" | "--image" => {
                opts.input.image = PathBuf::from(value(&mut args, &a)?);
                have_image = true; }
            "-t" | "--template" => {
                opts.input.template = PathBuf::from(value(&mut args, &a)?);
                have_template = true; }
            "--sheet" => opts.input.template_sheet = value(&mut args, &a)?,
            "--text" => opts.input.text_only = true,
            "-o" | "--out" => opts.export.out = PathBuf::from(value(&mut args, &a)?),
            "--format" => {
                let v = value(&mut args, &a)?;
                opts.export.format = Some(match v.to_ascii_lowercase().as_str() {
                    "csv" => ExportFormat::Csv,
                    "tsv" => ExportFormat::Tsv,
                    other => return Err(usage(format!("Unknown format: {other}"))),
                });}
            "--tesseract" => opts.ocr.engine = PathBuf::from(value(&mut args, &a)?),
            "--oem" => opts.ocr.oem = number(&mut args, &a)?,
            "--psm" => opts.ocr.psm = number(&mut args, &a)?,
            "--no-preprocess" => opts.ocr.preprocess = false,
            "--header-skip" => opts.parse.header_skip = number(&mut args, &a)?,
            "--max-dates" => {
                let n: usize = number(&mut args, &a)?;
                if n == 0 { return Err(usage("--max-dates must be at least 1")); }
                opts.parse.max_dates = n; }
            "--debug-text" => opts.export.debug_text = Some(PathBuf::from(value(&mut args, &a)?)),
            "--no-debug-text" => opts.export.debug_text = None,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(usage(format!("Unknown arg: {a}"))),
        }
    }

    if !have_image { return Err(usage("Missing --image (see --help)")); }
    if !have_template { return Err(usage("Missing --template (see --help)")); }
    Ok(Command::Run(opts))
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| usage(format!("Missing value for {flag}")))
}

fn number<T: FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T> {
    let v = value(args, flag)?;
    v.parse().map_err(|_| usage(format!("Invalid number for {flag}: {v}")))
}

fn usage(msg: impl Into<String>) -> Error {
    Error::Usage(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_args(args.iter().map(|a| s!(*a)))
    }

    fn opts(args: &[&str]) -> AppOptions {
        match parse(args).unwrap() {
            Command::Run(o) => o,
            Command::Help => panic!("expected a run"),
        }
    }

    #[test]
    fn minimal_args_keep_defaults() {
        let o = opts(&["-i", "scan.jpg", "-t", "sheet.csv"]);
        assert_eq!(o.input.image, Path::new("scan.jpg"));
        assert_eq!(o.input.template, Path::new("sheet.csv"));
        assert_eq!(o.parse, Default::default());
        assert_eq!(o.ocr, Default::default());
        assert_eq!(o.export, Default::default());
    }

    #[test]
    fn all_flags() {
        let o = opts(&[
            "--image", "scan.png", "--template", "t.xlsx", "--sheet", "Chem", "--text",
            "-o", "out/r.tsv", "--format", "CSV",
            "--tesseract", "/opt/tess", "--oem", "1", "--psm", "4", "--no-preprocess",
            "--header-skip", "2", "--max-dates", "4", "--no-debug-text",
        ]);
        assert!(o.input.text_only);
        assert_eq!(o.input.template_sheet, "Chem");
        assert_eq!(o.export.out, Path::new("out/r.tsv"));
        assert_eq!(o.export.format, Some(ExportFormat::Csv));
        assert_eq!(o.export.debug_text, None);
        assert_eq!(o.ocr.engine, Path::new("/opt/tess"));
        assert_eq!((o.ocr.oem, o.ocr.psm, o.ocr.preprocess), (1, 4, false));
        assert_eq!((o.parse.header_skip, o.parse.max_dates), (2, 4));
    }

    #[test]
    fn debug_text_path_overrides_default() {
        let o = opts(&["-i", "a.jpg", "-t", "b.csv", "--debug-text", "dump/ocr.txt"]);
        assert_eq!(o.export.debug_text.as_deref(), Some(Path::new("dump/ocr.txt")));
    }

    #[test]
    fn help_wins() {
        assert!(matches!(parse(&["-h"]), Ok(Command::Help)));
        assert!(HELP.contains("--template"));
    }

    #[test]
    fn usage_errors() {
        for bad in [
            &["-t", "b.csv"][..],
            &["-i", "a.jpg"],
            &["-i", "a.jpg", "-t", "b.csv", "--psm"],
            &["-i", "a.jpg", "-t", "b.xlsx", "--sheet"],
            &["-i", "a.jpg", "-t", "b.csv", "--psm", "six"],
            &["-i", "a.jpg", "-t", "b.csv", "--format", "xlsx"],
            &["-i", "a.jpg", "-t", "b.csv", "--max-dates", "0"],
            &["-i", "a.jpg", "-t", "b.csv", "--bogus"],
        ] {
            assert!(matches!(parse(bad), Err(Error::Usage(_))), "{bad:?}");
        }
    }
}
