/// Strips `<script>` and `<style>` elements from chapter markup, disables
/// inline event handlers and turns NUL characters into newlines.
///
/// This is a substring filter, not an HTML parser. Every `on` in the text is
/// prefixed with `skip-`, including ones in prose and attribute values, and
/// an element with no closing tag is left in place.
pub fn sanitize_content(content: &str) -> String {
    let content = remove_tags(content, "script");
    let content = remove_tags(&content, "style");
    let content = remove_event_handlers(&content);

    content.replace('\0', "\n")
}

/// Cuts everything from each `<tag` to the following `</tag>`, matching
/// case-insensitively, until no complete pair is left.
fn remove_tags(content: &str, tag: &str) -> String {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut content = content.to_string();
    // ASCII lowering keeps byte offsets of `lower` and `content` in step
    let mut lower = content.to_ascii_lowercase();
    let mut from = 0;

    loop {
        let Some(start) = lower[from..].find(&open).map(|start| from + start) else {
            break;
        };
        let Some(end) = lower[start..].find(&close) else {
            break;
        };
        let range = start..start + end + close.len();
        content.replace_range(range.clone(), "");
        lower.replace_range(range, "");
        // a cut can join two halves of a new `<tag` just before `start`
        from = start.saturating_sub(open.len() - 1);
        while !lower.is_char_boundary(from) {
            from -= 1;
        }
    }

    content
}

fn remove_event_handlers(content: &str) -> String {
    content.replace("on", "skip-on")
}
