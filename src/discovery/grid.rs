use anyhow::Result;
use log::{debug, info};

use super::{Discovery, RectDiscovery};
use crate::error::SplitError;
use crate::sprite::{PixelBuffer, SpriteRect, default_sprite_name};

/// Fixed-grid slicing.
///
/// Either the cell size or the column/row counts must be given; when both
/// are set the cell size wins and the counts are derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridTiler {
    pub columns: u32,
    pub rows: u32,
    pub sprite_width: u32,
    pub sprite_height: u32,
    /// Gap between neighbouring cells
    pub padding: u32,
    /// Inset from every sheet edge
    pub margin: u32,
}

/// Resolved grid geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridTiler {
    pub fn by_count(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn by_size(sprite_width: u32, sprite_height: u32) -> Self {
        Self {
            sprite_width,
            sprite_height,
            ..Self::default()
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Work out counts and cell size for a sheet of the given size
    pub fn layout(&self, sheet_width: u32, sheet_height: u32) -> Result<GridLayout> {
        let padding = i64::from(self.padding);
        let margin = i64::from(self.margin);
        let effective_w = i64::from(sheet_width) - 2 * margin;
        let effective_h = i64::from(sheet_height) - 2 * margin;

        let (columns, rows, cell_w, cell_h) = if self.sprite_width > 0 && self.sprite_height > 0 {
            let cell_w = i64::from(self.sprite_width);
            let cell_h = i64::from(self.sprite_height);
            (
                (effective_w + padding).div_euclid(cell_w + padding),
                (effective_h + padding).div_euclid(cell_h + padding),
                cell_w,
                cell_h,
            )
        } else if self.columns > 0 && self.rows > 0 {
            let columns = i64::from(self.columns);
            let rows = i64::from(self.rows);
            (
                columns,
                rows,
                (effective_w - padding * (columns - 1)).div_euclid(columns),
                (effective_h - padding * (rows - 1)).div_euclid(rows),
            )
        } else {
            return Err(SplitError::InvalidParameters(
                "specify columns/rows or sprite width/height".to_string(),
            )
            .into());
        };

        Ok(GridLayout {
            columns: at_least_one(columns, "column count")?,
            rows: at_least_one(rows, "row count")?,
            cell_width: at_least_one(cell_w, "cell width")?,
            cell_height: at_least_one(cell_h, "cell height")?,
        })
    }

    /// Produce row-major cells named `sprite_NNNN`
    pub fn tile(&self, sheet_width: u32, sheet_height: u32) -> Result<Vec<SpriteRect>> {
        let layout = self.layout(sheet_width, sheet_height)?;
        debug!("Grid layout {:?} (padding {}, margin {})", layout, self.padding, self.margin);

        let mut sprites = Vec::with_capacity(layout.columns as usize * layout.rows as usize);
        for row in 0..layout.rows {
            for col in 0..layout.columns {
                let x = self.margin + col * (layout.cell_width + self.padding);
                let y = self.margin + row * (layout.cell_height + self.padding);
                let name = default_sprite_name(sprites.len());
                sprites.push(SpriteRect::new(
                    x,
                    y,
                    layout.cell_width,
                    layout.cell_height,
                    name,
                ));
            }
        }

        info!(
            "Grid: {} columns x {} rows of {}x{}",
            layout.columns, layout.rows, layout.cell_width, layout.cell_height
        );

        Ok(sprites)
    }
}

impl RectDiscovery for GridTiler {
    fn label(&self) -> &'static str {
        "grid"
    }

    fn discover(&self, sheet: &PixelBuffer) -> Result<Discovery> {
        self.tile(sheet.width(), sheet.height()).map(Discovery::new)
    }
}

fn at_least_one(value: i64, what: &str) -> Result<u32> {
    match u32::try_from(value) {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(SplitError::InvalidParameters(format!("{what} must be at least 1, got {value}")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::InvalidParameters(_))
        )
    }

    #[test]
    fn test_count_mode_tiles_sheet_exactly() {
        for (columns, rows) in [(1, 1), (4, 4), (3, 5), (7, 2)] {
            let (w, h) = (columns * 8, rows * 6);
            let sprites = GridTiler::by_count(columns, rows).tile(w, h).unwrap();
            assert_eq!(sprites.len(), (columns * rows) as usize);

            let covered: u64 = sprites.iter().map(SpriteRect::area).sum();
            assert_eq!(covered, u64::from(w) * u64::from(h));

            for (i, a) in sprites.iter().enumerate() {
                assert!(a.x + a.width <= w && a.y + a.height <= h);
                for b in &sprites[i + 1..] {
                    assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_size_mode_derives_counts() {
        let tiler = GridTiler::by_size(16, 16).padding(2).margin(1);
        // effective width 64 - 2 = 62, (62 + 2) / 18 = 3
        let layout = tiler.layout(64, 40).unwrap();
        assert_eq!(layout.columns, 3);
        assert_eq!(layout.rows, 2);

        let sprites = tiler.tile(64, 40).unwrap();
        assert_eq!(sprites.len(), 6);
        assert_eq!((sprites[1].x, sprites[1].y), (19, 1));
        assert_eq!((sprites[3].x, sprites[3].y), (1, 19));
    }

    #[test]
    fn test_count_mode_back_computes_cell() {
        let layout = GridTiler::by_count(3, 2).padding(1).layout(32, 21).unwrap();
        // (32 - 2) / 3 = 10, (21 - 1) / 2 = 10
        assert_eq!(layout.cell_width, 10);
        assert_eq!(layout.cell_height, 10);
    }

    #[test]
    fn test_row_major_naming() {
        let sprites = GridTiler::by_count(2, 2).tile(4, 4).unwrap();
        let names: Vec<_> = sprites.iter().map(|s| (s.name.as_str(), s.x, s.y)).collect();
        assert_eq!(
            names,
            vec![
                ("sprite_0000", 0, 0),
                ("sprite_0001", 2, 0),
                ("sprite_0002", 0, 2),
                ("sprite_0003", 2, 2),
            ]
        );
    }

    #[test]
    fn test_missing_parameters() {
        let err = GridTiler::default().tile(10, 10).unwrap_err();
        assert!(is_invalid(&err));

        // Only one of the pair given
        let err = GridTiler::by_size(8, 0).tile(10, 10).unwrap_err();
        assert!(is_invalid(&err));
    }

    #[test]
    fn test_cells_larger_than_sheet() {
        let err = GridTiler::by_size(32, 32).tile(16, 16).unwrap_err();
        assert!(is_invalid(&err));

        let err = GridTiler::by_count(2, 2).margin(10).tile(16, 16).unwrap_err();
        assert!(is_invalid(&err));
    }
}
