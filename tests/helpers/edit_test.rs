//! Builder for old/new document edit tests.
//!
//! Sources mark active statements with `<AS:n>...</AS:n>`. Ordinal 0 is the
//! leaf frame, every other ordinal a non-leaf frame unless overridden.

use enc::analysis::{
    ActiveStatement, ActiveStatementFlags, AnalyzerOptions, DocumentAnalysisResult, RudeEditKind,
    SyntacticSymbolLookup, analyze_document,
};
use enc::{SyntaxTree, TextRange, TextSize};
use tokio_util::sync::CancellationToken;

/// Source with active statement markers removed
#[derive(Debug, Clone)]
pub struct MarkedSource {
    pub text: String,
    /// (ordinal, span) in order of appearance
    pub spans: Vec<(usize, TextRange)>,
}

impl MarkedSource {
    pub fn parse(marked: &str) -> Self {
        let mut text = String::with_capacity(marked.len());
        let mut open: Vec<(usize, u32)> = Vec::new();
        let mut spans = Vec::new();
        let mut rest = marked;
        while let Some(index) = rest.find('<') {
            text.push_str(&rest[..index]);
            rest = &rest[index..];
            let (closing, tail) = match rest.strip_prefix("</AS:") {
                Some(tail) => (true, tail),
                None => match rest.strip_prefix("<AS:") {
                    Some(tail) => (false, tail),
                    None => {
                        text.push('<');
                        rest = &rest[1..];
                        continue;
                    }
                },
            };
            let end = tail.find('>').expect("unterminated marker");
            let ordinal: usize = tail[..end].parse().expect("marker ordinal");
            let position = text.len() as u32;
            if closing {
                let slot = open
                    .iter()
                    .rposition(|(o, _)| *o == ordinal)
                    .expect("closing marker without opening marker");
                let (_, start) = open.remove(slot);
                spans.push((ordinal, TextRange::new(TextSize::from(start), TextSize::from(position))));
            } else {
                open.push((ordinal, position));
            }
            rest = &tail[end + 1..];
        }
        text.push_str(rest);
        assert!(open.is_empty(), "unclosed active statement markers");
        spans.sort_by_key(|(ordinal, _)| *ordinal);
        Self { text, spans }
    }

    pub fn span(&self, ordinal: usize) -> Option<TextRange> {
        self.spans.iter().find(|(o, _)| *o == ordinal).map(|(_, s)| *s)
    }
}

/// An edit of one document with active statements
pub struct EditTest {
    pub old_source: MarkedSource,
    pub new_source: MarkedSource,
    pub old: SyntaxTree,
    pub new: SyntaxTree,
    pub options: AnalyzerOptions,
    flags: Vec<(usize, ActiveStatementFlags)>,
}

impl EditTest {
    pub fn new(old: &str, new: &str) -> Self {
        let old_source = MarkedSource::parse(old);
        let new_source = MarkedSource::parse(new);
        let old = SyntaxTree::parse(&old_source.text);
        let new = SyntaxTree::parse(&new_source.text);
        Self {
            old_source,
            new_source,
            old,
            new,
            options: AnalyzerOptions::default(),
            flags: Vec::new(),
        }
    }

    /// Both sources are method bodies of `class C { void M() { ... } }`
    pub fn body(old: &str, new: &str) -> Self {
        Self::new(
            &format!("class C {{ void M() {{ {old} }} }}"),
            &format!("class C {{ void M() {{ {new} }} }}"),
        )
    }

    pub fn with_flags(mut self, ordinal: usize, flags: ActiveStatementFlags) -> Self {
        self.flags.push((ordinal, flags));
        self
    }

    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    fn flags_of(&self, ordinal: usize) -> ActiveStatementFlags {
        self.flags
            .iter()
            .rev()
            .find(|(o, _)| *o == ordinal)
            .map(|(_, f)| *f)
            .unwrap_or(if ordinal == 0 {
                ActiveStatementFlags::LEAF
            } else {
                ActiveStatementFlags::NON_LEAF
            })
    }

    pub fn active_statements(&self) -> Vec<ActiveStatement> {
        self.old_source
            .spans
            .iter()
            .map(|(ordinal, span)| ActiveStatement::new(*ordinal, *span, self.flags_of(*ordinal)))
            .collect()
    }

    pub fn analyze(&self) -> DocumentAnalysisResult<'_> {
        analyze_document(
            &self.old,
            &self.new,
            &self.active_statements(),
            &self.options,
            &SyntacticSymbolLookup,
            &CancellationToken::new(),
        )
        .expect("analysis failed")
    }

    pub fn rude_edit_kinds(&self) -> Vec<RudeEditKind> {
        self.analyze().rude_edits.into_iter().map(|d| d.kind).collect()
    }

    pub fn assert_rude_edits(&self, expected: &[RudeEditKind]) {
        let result = self.analyze();
        let lines = self.new.line_index();
        let actual: Vec<_> = result.rude_edits.iter().map(|d| d.kind).collect();
        assert_eq!(
            actual,
            expected,
            "unexpected rude edits:\n{}",
            result
                .rude_edits
                .iter()
                .map(|d| format!("  {} at {}: {}", d.kind, lines.span(d.span), d.message()))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    /// Every active statement was remapped to its `<AS:n>` span in the new source
    pub fn assert_active_statements_remapped(&self) {
        let result = self.analyze();
        for remap in &result.active_statements {
            let expected = self.new_source.span(remap.ordinal);
            assert_eq!(
                remap.new_span,
                expected,
                "active statement {} remapped to {:?}",
                remap.ordinal,
                remap.new_span.map(|s| self.new.slice(s).to_string())
            );
        }
    }

    /// Text of the first rude edit's span in the new source
    pub fn first_rude_edit_text(&self) -> String {
        let result = self.analyze();
        let span = result.rude_edits.first().expect("no rude edits").span;
        self.new.slice(span).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_stripped() {
        let source = MarkedSource::parse("a <AS:1>b <AS:0>c</AS:0></AS:1> d < e");
        assert_eq!(source.text, "a b c d < e");
        assert_eq!(source.spans.len(), 2);
        assert_eq!(&source.text[source.span(0).unwrap()], "c");
        assert_eq!(&source.text[source.span(1).unwrap()], "b c");
    }
}
