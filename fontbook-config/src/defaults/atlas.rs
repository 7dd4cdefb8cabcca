//! Default values for the glyph atlas.

pub fn atlas_size() -> u32 {
    2048
}

pub fn atlas_padding() -> u32 {
    2
}

pub fn font_size() -> f32 {
    16.0
}
