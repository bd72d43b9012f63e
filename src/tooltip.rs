//! Hover tooltip for typed code spans
//!
//! A single shared tooltip instance backs the hover feature: at most
//! one overlay is ever shown, and showing it for a new owner tears the
//! previous one down first. The feature is set up after the annotation
//! pass whether or not that pass succeeded.

use crate::annotate::AnnotationPayload;

/// Attribute carried by code spans that have a specialized type
const TYPE_ATTR: &str = "data-specialized-type=\"";

/// Current state of the shared tooltip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooltipState {
    Hidden,
    Shown { owner: String, text: String },
}

/// The single tooltip display instance
pub struct Tooltip {
    state: TooltipState,
    fancy_arrows: bool,
}

impl Tooltip {
    pub fn new(fancy_arrows: bool) -> Self {
        Self {
            state: TooltipState::Hidden,
            fancy_arrows,
        }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    /// Displayed text, when shown
    pub fn text(&self) -> Option<&str> {
        match &self.state {
            TooltipState::Shown { text, .. } => Some(text),
            TooltipState::Hidden => None,
        }
    }

    /// Show the tooltip for a span. A previously shown instance is
    /// destroyed first; the transition always passes through `Hidden`.
    pub fn show(&mut self, owner: &str, type_text: &str) {
        if !matches!(self.state, TooltipState::Hidden) {
            self.hide();
        }
        self.state = TooltipState::Shown {
            owner: owner.to_string(),
            text: format_type_text(type_text, self.fancy_arrows),
        };
    }

    /// Tear the current instance down
    pub fn hide(&mut self) {
        self.state = TooltipState::Hidden;
    }
}

/// Format a specialized type for display
pub fn format_type_text(type_text: &str, fancy_arrows: bool) -> String {
    if fancy_arrows {
        type_text.replace(" -> ", " \u{27f6} ")
    } else {
        type_text.to_string()
    }
}

/// A code span that carries a specialized type and reacts to hover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    /// Stable identity of the span: file path, rendered line, ordinal
    pub owner: String,
    pub type_text: String,
}

/// Collect the hover targets of an annotation pass by scanning the
/// emitted line content for the specialized-type attribute.
pub fn hover_targets(payloads: &[AnnotationPayload]) -> Vec<HoverTarget> {
    let mut targets = Vec::new();
    for payload in payloads {
        for (ordinal, type_text) in type_attrs(&payload.source_line_content).enumerate() {
            targets.push(HoverTarget {
                owner: format!(
                    "{}:{}:{}",
                    payload.file_path,
                    payload.line_number + 1,
                    ordinal
                ),
                type_text: type_text.to_string(),
            });
        }
    }
    targets
}

/// Values of every specialized-type attribute in a chunk of markup
fn type_attrs(markup: &str) -> impl Iterator<Item = &str> {
    markup.match_indices(TYPE_ATTR).filter_map(move |(at, _)| {
        let rest = &markup[at + TYPE_ATTR.len()..];
        rest.split('"').next()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::LineState;

    // --- state machine ---

    #[test]
    fn starts_hidden() {
        let tip = Tooltip::new(true);
        assert_eq!(*tip.state(), TooltipState::Hidden);
        assert_eq!(tip.text(), None);
    }

    #[test]
    fn show_then_hide() {
        let mut tip = Tooltip::new(false);
        tip.show("a.hs:1:0", "Int");
        assert_eq!(tip.text(), Some("Int"));
        tip.hide();
        assert_eq!(*tip.state(), TooltipState::Hidden);
    }

    #[test]
    fn showing_a_new_owner_replaces_the_previous_instance() {
        let mut tip = Tooltip::new(false);
        tip.show("a.hs:1:0", "Int");
        tip.show("a.hs:2:0", "Bool");
        // exactly one overlay remains, and it belongs to the new owner
        match tip.state() {
            TooltipState::Shown { owner, text } => {
                assert_eq!(owner, "a.hs:2:0");
                assert_eq!(text, "Bool");
            }
            TooltipState::Hidden => panic!("tooltip should be shown"),
        }
    }

    #[test]
    fn hide_when_hidden_is_a_no_op() {
        let mut tip = Tooltip::new(false);
        tip.hide();
        assert_eq!(*tip.state(), TooltipState::Hidden);
    }

    // --- formatting ---

    #[test]
    fn formats_arrows_for_display() {
        assert_eq!(
            format_type_text("Int -> String -> IO ()", true),
            "Int \u{27f6} String \u{27f6} IO ()"
        );
    }

    #[test]
    fn plain_formatting_keeps_arrows() {
        assert_eq!(format_type_text("Int -> Bool", false), "Int -> Bool");
    }

    // --- target collection ---

    fn payload(file: &str, line: u32, content: &str) -> AnnotationPayload {
        AnnotationPayload {
            file_path: file.to_string(),
            state: LineState::Unmodified,
            line_number: line,
            source_line_content: content.to_string(),
            rendered_line_html: String::new(),
        }
    }

    #[test]
    fn collects_typed_spans_in_order() {
        let payloads = vec![payload(
            "a.hs",
            7,
            r#"<span data-specialized-type="Int">x</span> <span data-specialized-type="Bool">y</span>"#,
        )];
        let targets = hover_targets(&payloads);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].owner, "a.hs:8:0");
        assert_eq!(targets[0].type_text, "Int");
        assert_eq!(targets[1].owner, "a.hs:8:1");
        assert_eq!(targets[1].type_text, "Bool");
    }

    #[test]
    fn lines_without_typed_spans_yield_no_targets() {
        let payloads = vec![payload("a.hs", 0, "<span>plain</span>")];
        assert!(hover_targets(&payloads).is_empty());
    }
}
