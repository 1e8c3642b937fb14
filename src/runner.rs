// src/runner.rs
use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    config::options::{AppOptions, ParseOptions},
    error::{Error, Result},
    extract::{self, Extraction},
    file,
    ocr::{self, TextRecognizer},
    progress::{Progress, Stage},
    specs::dates::{self, DateToken},
    template::{Diagnostic, Template},
};

/// Everything one run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub out_path: PathBuf,
    pub debug_text: Option<PathBuf>,
    pub report: Report,
}

/// Result of the text → template pipeline, no I/O involved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub dates: Vec<DateToken>,
    pub extraction: Extraction,
    pub template: Template,
    pub diagnostics: Vec<Diagnostic>,
}

/// Top-level runner: recognizer chosen from options.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &AppOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let recognizer = ocr::recognizer_for(opts);
    run_with(opts, recognizer.as_ref(), progress)
}

pub fn run_with(
    opts: &AppOptions,
    recognizer: &dyn TextRecognizer,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    if let Some(p) = progress.as_deref_mut() { p.begin(Stage::ALL.len()); }
    let out = run_stages(opts, recognizer, progress.as_deref_mut());
    if let Some(p) = progress.as_deref_mut() { p.finish(); }
    out
}

fn run_stages(
    opts: &AppOptions,
    recognizer: &dyn TextRecognizer,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<RunSummary> {
    // 1) recognize + keep the raw text around for inspection
    if let Some(p) = progress.as_deref_mut() { p.stage_start(Stage::Recognize); }
    info!(engine = recognizer.name(), image = %opts.input.image.display(), "recognizing");
    let text = recognizer.extract_text(&opts.input.image)?;
    let debug_text = match &opts.export.debug_text {
        Some(p) if *p != opts.input.image => {
            file::write_debug_text(p, &text)?;
            Some(p.clone())
        }
        _ => None,
    };
    if let Some(p) = progress.as_deref_mut() {
        if let Some(d) = &debug_text { p.log(&format!("OCR text saved to {}", d.display())); }
        p.stage_done(Stage::Recognize);
    }

    // 2..3) dates + results
    if let Some(p) = progress.as_deref_mut() { p.stage_start(Stage::Dates); }
    let dates = find_dates(&text, &opts.parse)?;
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Found dates: {}", join_dates(&dates)));
        p.stage_done(Stage::Dates);
    }
    if let Some(p) = progress.as_deref_mut() { p.stage_start(Stage::Results); }
    let extraction = extract::assemble_with(&text, &dates, &opts.parse);
    info!(tests = extraction.mapping.len(), rejected = extraction.rejected, "results extracted");
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Extracted {} tests", extraction.mapping.len()));
        for (test, values) in extraction.mapping.iter() {
            let cells: Vec<String> = values.iter().map(|(d, v)| format!("{d}={}", v.as_str())).collect();
            p.log(&format!("{test}: {}", cells.join(", ")));
        }
        p.stage_done(Stage::Results);
    }

    // 4) template
    if let Some(p) = progress.as_deref_mut() { p.stage_start(Stage::LoadTemplate); }
    let template = Template::load_with(&opts.input.template, &opts.input.template_sheet)?;
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Template loaded with {} test rows", template.rows().len()));
        p.stage_done(Stage::LoadTemplate);
    }

    // 5) merge
    if let Some(p) = progress.as_deref_mut() { p.stage_start(Stage::Populate); }
    let populated = template.populate(&extraction.mapping, &dates);
    if let Some(p) = progress.as_deref_mut() {
        for d in &populated.diagnostics { p.log(&format!("Warning: {d}")); }
        p.stage_done(Stage::Populate);
    }

    // 6) write
    if let Some(p) = progress.as_deref_mut() { p.stage_start(Stage::Write); }
    let out_path = file::write_template(&opts.export, &populated.template)?;
    info!(path = %out_path.display(), "results written");
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("CSV file: {}", out_path.display()));
        p.stage_done(Stage::Write);
    }

    Ok(RunSummary {
        out_path,
        debug_text,
        report: Report {
            dates,
            extraction,
            template: populated.template,
            diagnostics: populated.diagnostics,
        },
    })
}

/// Pure pipeline over already-recognized text and an in-memory template.
pub fn process_text(text: &str, template: &Template, parse: &ParseOptions) -> Result<Report> {
    let dates = find_dates(text, parse)?;
    let extraction = extract::assemble_with(text, &dates, parse);
    let populated = template.populate(&extraction.mapping, &dates);
    Ok(Report {
        dates,
        extraction,
        template: populated.template,
        diagnostics: populated.diagnostics,
    })
}

/// No dates means no columns to fill; that ends the run.
fn find_dates(text: &str, parse: &ParseOptions) -> Result<Vec<DateToken>> {
    let found = dates::extract_dates(text, parse.max_dates);
    if found.is_empty() {
        warn!("no dates found in recognized text");
        return Err(Error::NoDates);
    }
    Ok(found)
}

fn join_dates(dates: &[DateToken]) -> String {
    dates.iter().map(DateToken::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Template {
        let rows = vec![
            vec![s!("Test"), s!("Unit"), s!("D1"), s!("D2")],
            vec![s!("Sodium"), s!("mmol/L"), s!(), s!()],
        ];
        Template::from_rows(rows).unwrap()
    }

    struct Canned(&'static str);

    impl TextRecognizer for Canned {
        fn name(&self) -> &'static str { "canned" }
        fn extract_text(&self, _image: &std::path::Path) -> Result<String> { Ok(s!(self.0)) }
    }

    #[derive(Default)]
    struct Counter {
        started: usize,
        done: usize,
        finished: bool,
    }

    impl Progress for Counter {
        fn stage_start(&mut self, _stage: Stage) { self.started += 1; }
        fn stage_done(&mut self, _stage: Stage) { self.done += 1; }
        fn finish(&mut self) { self.finished = true; }
    }

    #[test]
    fn run_with_injected_recognizer() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = AppOptions::default();
        opts.input.image = dir.path().join("scan.png");
        opts.input.template = dir.path().join("sheet.csv");
        opts.export.out = dir.path().join("out.csv");
        opts.export.debug_text = None;
        std::fs::write(&opts.input.template, "Test,Unit,D1,D2\nSodium,mmol/L,,\n").unwrap();

        let recognizer = Canned("Test 01/02/23 05/03/23\nRef\nRange\nSodium 140 H142\n");
        let mut counter = Counter::default();
        let summary = run_with(&opts, &recognizer, Some(&mut counter)).unwrap();

        assert_eq!(summary.out_path, opts.export.out);
        assert_eq!(summary.report.template.cell("Sodium", "01/02/23"), Some("140"));
        assert_eq!((counter.started, counter.done), (Stage::ALL.len(), Stage::ALL.len()));
        assert!(counter.finished);

        // And without a progress sink at all.
        assert!(run_with(&opts, &recognizer, None).is_ok());
    }

    #[test]
    fn no_dates_is_fatal() {
        let err = process_text("Sodium 140 142", &template(), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NoDates));
    }

    #[test]
    fn text_to_template() {
        let text = "Test 01/02/23 05/03/23\nRef\nRange\nSodium 140 H142\nEnd";
        let r = process_text(text, &template(), &ParseOptions::default()).unwrap();
        assert_eq!(r.template.cell("Sodium", "05/03/23"), Some("H142"));
        assert!(r.diagnostics.is_empty());
    }
}
