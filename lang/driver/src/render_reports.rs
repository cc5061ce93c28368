use std::fmt;
use std::io;

use miette::Report;

use eqc_lang_printer::ColorChoice;

/// Terminal width for pretty-printing error messages.
const TERMINAL_WIDTH: usize = 200;

struct WriteAdapter<'a, O: io::Write>(pub &'a mut O);

impl<O: io::Write> fmt::Write for WriteAdapter<'_, O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

pub fn render_reports_to_string(reports: &[Report], colorize: ColorChoice) -> String {
    let mut output = String::new();
    // Writing into a `String` cannot fail
    let _ = render_reports(&mut output, reports, colorize);
    output
}

pub fn render_reports_io<O>(
    output: &mut O,
    reports: &[Report],
    colorize: ColorChoice,
) -> fmt::Result
where
    O: io::Write,
{
    let mut adapter = WriteAdapter(output);
    render_reports(&mut adapter, reports, colorize)
}

pub fn render_reports<O>(output: &mut O, reports: &[Report], colorize: ColorChoice) -> fmt::Result
where
    O: fmt::Write,
{
    let theme = match colorize {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => miette::GraphicalTheme::unicode(),
        ColorChoice::Auto => miette::GraphicalTheme::default(),
        ColorChoice::Never => miette::GraphicalTheme::unicode_nocolor(),
    };
    let handler = miette::GraphicalReportHandler::new_themed(theme).with_width(TERMINAL_WIDTH);

    let mut reports = reports.iter().peekable();
    while let Some(report) = reports.next() {
        handler.render_report(output, report.as_ref())?;
        if reports.peek().is_some() {
            writeln!(output)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[test]
    fn errors_point_into_the_source() {
        let src = "data Nat { zero, succ(n: Nat) }\n\ndef pred(n: Nat): Nat\n    | zero => zero\n";
        let mut db = Database::from_source("pred.eqc", src);
        let err = db.compiled().unwrap_err();
        let out = render_reports_to_string(&[db.pretty_error(err)], ColorChoice::Never);
        assert!(out.contains("E-001"), "{out}");
        assert!(out.contains("pred.eqc"), "{out}");
    }
}
