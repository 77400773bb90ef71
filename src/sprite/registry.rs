use super::SpriteRect;
use super::naming::{default_sprite_name, effective_template, render_template};

/// Ordered sprites discovered on one sheet.
///
/// The order is the discovery order; it drives `{index}` substitution on
/// export. Mutation goes through the methods below so the restore flag and
/// the sprite list are always replaced together.
#[derive(Debug, Clone, Default)]
pub struct SpriteRegistry {
    sprites: Vec<SpriteRect>,
    restore_source: bool,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the result of a discovery run
    pub fn replace(&mut self, sprites: Vec<SpriteRect>, restore_source: bool) {
        self.sprites = sprites;
        self.restore_source = restore_source;
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpriteRect> {
        self.sprites.iter()
    }

    pub fn as_slice(&self) -> &[SpriteRect] {
        &self.sprites
    }

    pub fn get(&self, index: usize) -> Option<&SpriteRect> {
        self.sprites.get(index)
    }

    /// Whether exports should rebuild source canvases by default
    pub fn restore_source(&self) -> bool {
        self.restore_source
    }

    pub fn set_restore_source(&mut self, restore: bool) {
        self.restore_source = restore;
    }

    /// Remove one sprite, shifting later entries down
    pub fn remove(&mut self, index: usize) -> Option<SpriteRect> {
        (index < self.sprites.len()).then(|| self.sprites.remove(index))
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    /// Rename one sprite. Returns false if the index is out of range.
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.sprites.get_mut(index) {
            Some(sprite) => {
                sprite.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Regenerate every name from `template` in current order.
    ///
    /// `{name}` expands to the default `sprite_NNNN` label for the position,
    /// which closes any gaps left by deletions.
    pub fn renumber(&mut self, template: &str) {
        let template = effective_template(template);
        for (index, sprite) in self.sprites.iter_mut().enumerate() {
            let fresh = default_sprite_name(index);
            sprite.name = render_template(template, &fresh, index, sprite);
        }
    }
}

impl<'a> IntoIterator for &'a SpriteRegistry {
    type Item = &'a SpriteRect;
    type IntoIter = std::slice::Iter<'a, SpriteRect>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SpriteRegistry {
        let mut registry = SpriteRegistry::new();
        registry.replace(
            (0..4)
                .map(|i| SpriteRect::new(i * 10, 0, 10, 10, default_sprite_name(i as usize)))
                .collect(),
            false,
        );
        registry
    }

    #[test]
    fn test_remove_and_renumber_closes_gaps() {
        let mut registry = registry();
        let removed = registry.remove(1).unwrap();
        assert_eq!(removed.name, "sprite_0001");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(1).unwrap().name, "sprite_0002");

        registry.renumber("{name}");
        let names: Vec<_> = registry.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["sprite_0000", "sprite_0001", "sprite_0002"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut registry = registry();
        assert!(registry.remove(10).is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_renumber_with_tokens_and_literal() {
        let mut registry = registry();
        registry.renumber("walk_{index}_{x}");
        assert_eq!(registry.get(2).unwrap().name, "walk_2_20");

        registry.renumber("frame");
        assert_eq!(registry.get(0).unwrap().name, "frame_0");
        assert_eq!(registry.get(3).unwrap().name, "frame_3");
    }

    #[test]
    fn test_rename_and_clear() {
        let mut registry = registry();
        assert!(registry.rename(0, "idle"));
        assert!(!registry.rename(9, "nope"));
        assert_eq!(registry.get(0).unwrap().name, "idle");

        registry.set_restore_source(true);
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.restore_source());
    }
}
