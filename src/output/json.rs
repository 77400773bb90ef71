use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::error::SplitError;
use crate::sprite::SpriteRect;

#[derive(Serialize)]
struct DataFile<'a> {
    image: &'a str,
    size: Size,
    sprites: Vec<DataSprite<'a>>,
}

#[derive(Serialize)]
struct Size {
    width: u32,
    height: u32,
}

#[derive(Serialize)]
struct DataSprite<'a> {
    name: &'a str,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Write the sprite list as a generic `sprites` data file.
///
/// The result reads back through [`crate::discovery::parse_data_file`].
pub fn write_data_file(
    path: &Path,
    image_name: &str,
    sheet_size: (u32, u32),
    sprites: &[SpriteRect],
) -> Result<()> {
    let output = DataFile {
        image: image_name,
        size: Size {
            width: sheet_size.0,
            height: sheet_size.1,
        },
        sprites: sprites
            .iter()
            .map(|s| DataSprite {
                name: &s.name,
                x: s.x,
                y: s.y,
                width: s.width,
                height: s.height,
            })
            .collect(),
    };

    let content = serde_json::to_string_pretty(&output)?;
    fs::write(path, content).map_err(|e| SplitError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_write_data_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet_sprites.json");
        let sprites = vec![
            SpriteRect::new(0, 0, 16, 16, "idle"),
            SpriteRect::new(16, 0, 16, 16, "run"),
        ];

        write_data_file(&path, "sheet.png", (32, 16), &sprites).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["image"], "sheet.png");
        assert_eq!(value["size"]["width"], 32);
        assert_eq!(value["sprites"][1]["name"], "run");
        assert_eq!(value["sprites"][1]["x"], 16);
        // Pretty printed
        assert!(fs::read_to_string(&path).unwrap().contains('\n'));
    }
}
