use crate::error::{BorrowError, BorrowErrorKind, CodegenError, CompilerError, Diagnostic, TypeError};
use crate::level::Level;
use crate::location::SourceLocation;

/// Accumulates diagnostics across phases. One instance is threaded by `&mut`
/// reference through the whole pipeline, owned by the driver, never shared
/// concurrently (see the single-threaded resource model).
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn report_compiler_error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.report(Diagnostic::Compiler(CompilerError::new(
            Level::Error,
            message,
            location,
        )));
    }

    pub fn report_warning(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.report(Diagnostic::Compiler(CompilerError::new(
            Level::Warning,
            message,
            location,
        )));
    }

    pub fn report_type_error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.report(Diagnostic::Type(TypeError::new(message, location)));
    }

    pub fn report_borrow_error(
        &mut self,
        kind: BorrowErrorKind,
        message: impl Into<String>,
        location: SourceLocation,
    ) {
        self.report(Diagnostic::Borrow(BorrowError::new(kind, message, location)));
    }

    pub fn report_codegen_error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.report(Diagnostic::Codegen(CodegenError::new(message, location)));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level() == Level::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level() == Level::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.level() == Level::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level() == Level::Warning)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Orders diagnostics lexicographically by (file, line, column).
    pub fn sort_by_location(&mut self) {
        self.diagnostics.sort_by(|a, b| a.location().cmp(b.location()));
    }

    /// "path:line:col: kind: message", one per line, lexicographically ordered.
    pub fn format_diagnostics(&mut self) -> String {
        self.sort_by_location();
        self.diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn summary(&self) -> String {
        format!(
            "Compilation finished with {} error(s) and {} warning(s).",
            self.error_count(),
            self.warning_count()
        )
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Dumps the collected diagnostics as JSON, for tooling that wants structured
    /// output (an editor integration, a CI annotation step) rather than the
    /// "path:line:col: kind: message" text `format_diagnostics` produces.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_counts_by_level() {
        let mut collector = DiagnosticCollector::new();
        collector.report_type_error("mismatch", SourceLocation::synthetic(1, 1));
        collector.report_warning("unused", SourceLocation::synthetic(2, 1));
        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
        assert!(collector.has_errors());
        assert!(collector.has_warnings());
    }

    #[test]
    fn sorts_by_file_then_line_then_column() {
        let mut collector = DiagnosticCollector::new();
        collector.report_type_error("b", SourceLocation::new("a.fg", 5, 1, 0));
        collector.report_type_error("a", SourceLocation::new("a.fg", 1, 9, 0));
        collector.sort_by_location();
        let locations: Vec<_> = collector.diagnostics().iter().map(|d| d.location().line).collect();
        assert_eq!(locations, vec![1, 5]);
    }

    #[test]
    fn summary_reports_counts() {
        let mut collector = DiagnosticCollector::new();
        collector.report_compiler_error("bad byte", SourceLocation::synthetic(1, 1));
        assert_eq!(
            collector.summary(),
            "Compilation finished with 1 error(s) and 0 warning(s)."
        );
    }

    #[test]
    fn serializes_to_json() {
        let mut collector = DiagnosticCollector::new();
        collector.report_type_error("mismatch", SourceLocation::synthetic(3, 7));
        let json = collector.to_json().expect("should serialize");
        assert!(json.contains("mismatch"));
    }
}
