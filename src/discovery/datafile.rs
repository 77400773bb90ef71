use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::{Map, Value};

use super::{Discovery, RectDiscovery};
use crate::error::SplitError;
use crate::sprite::{PixelBuffer, SpriteRect};

type Object = Map<String, Value>;

/// Slicing driven by an external JSON data file.
///
/// Understands TexturePacker hash and array exports, a flat `sprites`
/// list (which is also what [`crate::output::write_data_file`] produces)
/// and the `res`/`mc` layout used by some engine exporters.
#[derive(Debug, Clone)]
pub struct DataFileParser {
    path: PathBuf,
}

impl DataFileParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RectDiscovery for DataFileParser {
    fn label(&self) -> &'static str {
        "data"
    }

    fn discover(&self, _sheet: &PixelBuffer) -> Result<Discovery> {
        parse_data_file(&self.path)
    }
}

/// Read sprite rectangles from a data file, keeping file order
pub fn parse_data_file(path: &Path) -> Result<Discovery> {
    if !path.exists() {
        return Err(SplitError::DataFileNotFound(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file: {}", path.display()))?;
    let document: Value =
        serde_json::from_str(&content).map_err(|e| SplitError::DataFileParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let discovery =
        parse_document(&document).ok_or_else(|| SplitError::UnsupportedSchema(path.to_path_buf()))?;

    info!(
        "Parsed {} sprites from {}{}",
        discovery.sprites.len(),
        path.display(),
        if discovery.restore_source {
            " (source sizes present)"
        } else {
            ""
        }
    );

    Ok(discovery)
}

/// Interpret an already-parsed document. `None` means no known schema matched.
pub fn parse_document(document: &Value) -> Option<Discovery> {
    let root = document.as_object()?;

    let sprites: Vec<SpriteRect> = if let Some(frames) = root.get("frames") {
        match frames {
            Value::Object(entries) => entries
                .iter()
                .filter_map(|(name, entry)| frame_entry(name.clone(), entry))
                .collect(),
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| {
                    let name = entry
                        .as_object()
                        .map(|e| text(first_present(e, &["filename", "name"])))
                        .unwrap_or_default();
                    frame_entry(name, entry)
                })
                .collect(),
            _ => return None,
        }
    } else if let Some(sprites) = root.get("sprites") {
        sprites.as_array()?.iter().filter_map(generic_entry).collect()
    } else if let Some(Value::Object(res)) = root.get("res") {
        res_entries(res, root.get("mc").and_then(Value::as_object))
    } else {
        return None;
    };

    let restore_source = sprites.iter().any(SpriteRect::has_source_size);
    Some(Discovery {
        sprites,
        restore_source,
    })
}

/// Find the sheet image a data file refers to via `file`, `meta.image` or
/// `meta.imagePath`. Relative paths are tried against the data file's
/// directory first, then as written.
pub fn resolve_image_path(data_path: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(data_path).ok()?;
    let document: Value = serde_json::from_str(&content).ok()?;

    let file_name = non_empty_str(document.get("file")).or_else(|| {
        let meta = document.get("meta").and_then(Value::as_object)?;
        non_empty_str(meta.get("image")).or_else(|| non_empty_str(meta.get("imagePath")))
    })?;

    let written = Path::new(file_name);
    let candidate = if written.is_absolute() {
        written.to_path_buf()
    } else {
        data_path
            .parent()
            .map(|dir| dir.join(written))
            .unwrap_or_else(|| written.to_path_buf())
    };

    if candidate.exists() {
        return Some(candidate);
    }
    if written.exists() {
        return Some(written.to_path_buf());
    }

    debug!(
        "Data file {} names image '{}' which does not exist",
        data_path.display(),
        file_name
    );
    None
}

/// TexturePacker-style entry: nested `frame`/`spriteSourceSize`/`sourceSize`,
/// or the same fields flattened onto the entry itself
fn frame_entry(name: String, entry: &Value) -> Option<SpriteRect> {
    let entry = entry.as_object()?;
    let frame = entry.get("frame").and_then(Value::as_object).unwrap_or(entry);
    let sprite_source = entry.get("spriteSourceSize").and_then(Value::as_object);
    let source_size = entry.get("sourceSize").and_then(Value::as_object);

    let off_x = sprite_source
        .and_then(|s| s.get("x"))
        .or_else(|| first_present(entry, &["offX", "offsetX"]));
    let off_y = sprite_source
        .and_then(|s| s.get("y"))
        .or_else(|| first_present(entry, &["offY", "offsetY"]));
    let source_w = source_size
        .and_then(|s| first_present(s, &["w", "width"]))
        .or_else(|| first_present(entry, &["sourceW", "sourceWidth"]));
    let source_h = source_size
        .and_then(|s| first_present(s, &["h", "height"]))
        .or_else(|| first_present(entry, &["sourceH", "sourceHeight"]));

    Some(
        SpriteRect::new(
            dimension(frame.get("x")),
            dimension(frame.get("y")),
            dimension(first_present(frame, &["w", "width"])),
            dimension(first_present(frame, &["h", "height"])),
            name,
        )
        .with_source(
            offset(off_x),
            offset(off_y),
            dimension(source_w),
            dimension(source_h),
        ),
    )
}

/// Flat `sprites` list entry
fn generic_entry(entry: &Value) -> Option<SpriteRect> {
    let entry = entry.as_object()?;
    Some(
        SpriteRect::new(
            dimension(entry.get("x")),
            dimension(entry.get("y")),
            dimension(first_present(entry, &["width", "w"])),
            dimension(first_present(entry, &["height", "h"])),
            text(entry.get("name")),
        )
        .with_source(
            offset(first_present(entry, &["offX", "offsetX"])),
            offset(first_present(entry, &["offY", "offsetY"])),
            dimension(first_present(entry, &["sourceW", "sourceWidth"])),
            dimension(first_present(entry, &["sourceH", "sourceHeight"])),
        ),
    )
}

/// `res` holds rectangles by id; `mc` lists animation clips whose frames
/// point into `res`. Without clips every `res` entry stands alone.
fn res_entries(res: &Object, clips: Option<&Object>) -> Vec<SpriteRect> {
    let mut sprites = Vec::new();

    match clips.filter(|c| !c.is_empty()) {
        Some(clips) => {
            for (clip, data) in clips {
                let Some(frames) = data
                    .as_object()
                    .and_then(|d| d.get("frames"))
                    .and_then(Value::as_array)
                else {
                    continue;
                };

                for (index, frame) in frames.iter().enumerate() {
                    let Some(frame) = frame.as_object() else {
                        continue;
                    };
                    let Some(rect) = frame
                        .get("res")
                        .and_then(Value::as_str)
                        .filter(|id| !id.is_empty())
                        .and_then(|id| res.get(id))
                        .and_then(Value::as_object)
                    else {
                        continue;
                    };

                    sprites.push(
                        res_rect(rect, format!("{clip}_{index}"))
                            .with_source(offset(frame.get("x")), offset(frame.get("y")), 0, 0),
                    );
                }
            }
        }
        None => {
            for (id, rect) in res {
                if let Some(rect) = rect.as_object() {
                    sprites.push(res_rect(rect, id.clone()));
                }
            }
        }
    }

    sprites
}

fn res_rect(rect: &Object, name: String) -> SpriteRect {
    SpriteRect::new(
        dimension(rect.get("x")),
        dimension(rect.get("y")),
        dimension(first_present(rect, &["w", "width"])),
        dimension(first_present(rect, &["h", "height"])),
        name,
    )
}

/// Value of the first key that exists, even if that value is unusable
fn first_present<'a>(object: &'a Object, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

/// Lenient integer read: numbers (floats truncate), numeric strings and
/// booleans are accepted, anything else is 0
fn integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(truncate))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

#[expect(clippy::cast_possible_truncation, reason = "saturating float to int conversion")]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn dimension(value: Option<&Value>) -> u32 {
    u32::try_from(integer(value).max(0)).unwrap_or(u32::MAX)
}

fn offset(value: Option<&Value>) -> i32 {
    let clamped = integer(value).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    i32::try_from(clamped).unwrap_or_default()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
