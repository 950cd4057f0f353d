//! # Quire CLI
//!
//! Usage:
//!   quire book.json -o report.json
//!   quire book.json --themes themes.json --palettes palettes.json
//!   quire book.json --fonts fonts.json --config layout.json
//!   echo '{ ... }' | quire
//!   quire --example > book.json
//!
//! Writes the JSON report to stdout unless `-o` is given. Set `RUST_LOG=debug`
//! for resolution details.

use quire::background::NoImageTemplates;
use quire::catalog::Catalog;
use quire::font::{FontContext, FontEntry};
use quire::layout::LayoutConfig;
use quire::markup::XmlMarkupParser;
use quire::report::{report_book, ReportContext};
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_book_json());
        return;
    }

    // Read input
    let input = match args.get(1).filter(|a| !a.starts_with('-')) {
        Some(path) => read_file(path),
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                fail(&format!("Failed to read stdin: {}", e));
            }
            buf
        }
    };

    let book = match quire::parse_book(&input) {
        Ok(book) => book,
        Err(e) => fail(&format!("Failed to parse book: {}", e)),
    };

    let themes = flag_value(&args, "--themes").map(read_file);
    let palettes = flag_value(&args, "--palettes").map(read_file);
    let catalog = match Catalog::from_json(
        themes.as_deref().unwrap_or(quire::catalog::BUILTIN_THEMES),
        palettes.as_deref().unwrap_or(quire::catalog::BUILTIN_PALETTES),
    ) {
        Ok(catalog) => catalog,
        Err(e) => fail(&format!("Failed to load catalog: {}", e)),
    };

    let fonts = match flag_value(&args, "--fonts") {
        Some(path) => {
            let loaded = serde_json::from_str::<Vec<FontEntry>>(&read_file(path))
                .map_err(quire::QuireError::from)
                .and_then(|entries| FontContext::with_fonts(&entries));
            match loaded {
                Ok(ctx) => ctx,
                Err(e) => fail(&format!("Failed to load fonts: {}", e)),
            }
        }
        None => FontContext::new(),
    };

    let config = match flag_value(&args, "--config") {
        Some(path) => match serde_json::from_str::<LayoutConfig>(&read_file(path)) {
            Ok(config) => config,
            Err(e) => fail(&format!("Failed to parse layout config: {}", quire::QuireError::from(e))),
        },
        None => LayoutConfig::default(),
    };

    let ctx = ReportContext {
        catalog: &catalog,
        templates: &NoImageTemplates,
        parser: &XmlMarkupParser,
        measurer: &fonts,
        config: &config,
    };
    let report = match report_book(&ctx, &book) {
        Ok(report) => report,
        Err(e) => fail(&format!("Failed to resolve book: {}", e)),
    };

    let json = match serde_json::to_string_pretty(&report) {
        Ok(json) => json,
        Err(e) => fail(&format!("Failed to serialize report: {}", e)),
    };

    match flag_value(&args, "-o") {
        Some(output_path) => {
            if let Err(e) = fs::write(output_path, &json) {
                fail(&format!("Failed to write {}: {}", output_path, e));
            }
            eprintln!(
                "✓ Written report for {} pages ({} bytes) to {}",
                report.pages.len(),
                json.len(),
                output_path
            );
        }
        None => {
            if let Err(e) = writeln!(io::stdout(), "{}", json) {
                fail(&format!("Failed to write report: {}", e));
            }
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => fail(&format!("Failed to read {}: {}", path, e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {}", message);
    process::exit(1);
}

fn example_book_json() -> &'static str {
    r##"{
  "id": "summer-2026",
  "name": "Summer Journal",
  "bookTheme": "notebook",
  "pages": [
    {
      "id": "page-1",
      "pageNumber": 1,
      "elements": [
        {
          "id": "q1",
          "type": "qna",
          "x": 60,
          "y": 80,
          "width": 900,
          "height": 420,
          "questionText": "{\"text\": \"What was the best day of the trip?\"}",
          "formattedText": "<p>The day we swam at <b>Bondi</b>.</p><p>Then <i>gelato</i>.</p>",
          "questionSettings": { "fontSize": 20, "fontBold": true },
          "answerSettings": { "fontColor": "#334155" },
          "answerInNewRow": true
        },
        {
          "id": "q2",
          "type": "qna",
          "x": 60,
          "y": 560,
          "width": 900,
          "height": 300,
          "layoutVariant": "block",
          "qnaIndividualSettings": true,
          "questionPosition": "left",
          "questionWidth": 35,
          "questionText": "Who came along?",
          "text": "Mia, Jonas and the dog",
          "questionSettings": { "align": "right" }
        },
        {
          "id": "heart",
          "type": "heart",
          "x": 820,
          "y": 900,
          "width": 120,
          "height": 120,
          "fill": "#f43f5e"
        }
      ]
    },
    {
      "id": "page-2",
      "pageNumber": 2,
      "themeId": "playful",
      "colorPaletteId": "sunset",
      "elements": [
        {
          "id": "caption",
          "type": "text",
          "x": 100,
          "y": 100,
          "width": 600,
          "height": 200,
          "text": "Back home, sunburnt and happy.",
          "fontSize": 14,
          "format": { "textAlign": "center" }
        }
      ]
    }
  ]
}
"##
}
