/// Compile-time overlay layout tokens. Picker configuration may override colors and widths,
/// but key geometry and margins stay fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyleTokens {
    pub white_key_width: i32,
    pub white_key_height: i32,
    pub black_key_width: i32,
    pub black_key_height: i32,
    pub grid_cell_padding: i32,
    pub grid_min_cell_width: i32,
    pub scrollbar_allowance: i32,
    pub page_nav_height: i32,
    pub button_margin: i32,
    pub button_vertical_margin: i32,
    pub icon_gap: i32,
    pub note_idle_stop_ms: u32,
    pub tone_gain: f32,
    pub note_match_epsilon_hz: f64,
    pub glyph_width: i32,
    pub glyph_height: i32,
}

pub const OVERLAY_TOKENS: OverlayStyleTokens = OverlayStyleTokens {
    white_key_width: 22,
    white_key_height: 90,
    black_key_width: 11,
    black_key_height: 55,
    grid_cell_padding: 8,
    grid_min_cell_width: 24,
    scrollbar_allowance: 16,
    page_nav_height: 24,
    button_margin: 40,
    button_vertical_margin: 10,
    icon_gap: 6,
    note_idle_stop_ms: 500,
    tone_gain: 0.2,
    note_match_epsilon_hz: 1.0,
    glyph_width: 8,
    glyph_height: 16,
};
