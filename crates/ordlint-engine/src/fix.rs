//! Fix-block rendering
//!
//! Re-emits the elements (with their attached comments) in target order at
//! the resolved spacing. The result replaces the construct body; applying
//! it is the host's job, the engine never edits source itself.

use ordlint_core::Element;

use crate::Evaluation;

/// Render the reordered body block. Blank-line counts come from the
/// evaluation; where no requirement exists, the emitted element keeps the
/// blank lines it carried in source.
pub fn render_reordered(elements: &[Element], evaluation: &Evaluation) -> String {
    let mut out = String::new();

    for (position, id) in evaluation.target_order.iter().enumerate() {
        let element = &elements[id.index()];

        if position > 0 {
            let blanks = evaluation.required_newlines[position - 1]
                .unwrap_or(element.blank_lines_before);
            for _ in 0..=blanks {
                out.push('\n');
            }
        }

        for comment in &element.comments {
            out.push_str(comment);
            out.push('\n');
        }
        out.push_str(&element.text);
    }

    out
}
