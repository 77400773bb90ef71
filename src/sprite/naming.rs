use super::SpriteRect;

/// Template used when the caller supplies an empty one
pub const DEFAULT_TEMPLATE: &str = "{name}";

/// Default sprite label for position `index` in discovery order
pub fn default_sprite_name(index: usize) -> String {
    format!("sprite_{index:04}")
}

/// Substitute `{name}`, `{index}`, `{x}`, `{y}`, `{width}` and `{height}`.
///
/// A template without any placeholder gets `_{index}` appended so that
/// batch output never collides on one filename.
pub fn render_template(template: &str, name: &str, index: usize, rect: &SpriteRect) -> String {
    let rendered = template
        .replace("{name}", name)
        .replace("{index}", &index.to_string())
        .replace("{x}", &rect.x.to_string())
        .replace("{y}", &rect.y.to_string())
        .replace("{width}", &rect.width.to_string())
        .replace("{height}", &rect.height.to_string());

    if rendered == template && !rendered.contains('{') {
        format!("{rendered}_{index}")
    } else {
        rendered
    }
}

/// Build the output filename for a sprite, including the extension
pub fn output_filename(template: &str, sprite: &SpriteRect, index: usize, extension: &str) -> String {
    let template = effective_template(template);
    let mut filename = render_template(template, &sprite.name, index, sprite);

    let suffix = format!(".{}", extension.to_lowercase());
    if !filename.to_lowercase().ends_with(&suffix) {
        filename.push_str(&suffix);
    }
    filename
}

pub(crate) fn effective_template(template: &str) -> &str {
    if template.trim().is_empty() {
        DEFAULT_TEMPLATE
    } else {
        template
    }
}
