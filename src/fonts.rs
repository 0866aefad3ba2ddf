use std::sync::Arc;

/// System fonts that carry CJK glyphs, tried in order.
const CJK_FONT_PATHS: [&str; 8] = [
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
];

const CJK_FONT_NAME: &str = "cjk";

fn load_cjk_font() -> Result<(String, Vec<u8>), String> {
    for path in CJK_FONT_PATHS {
        if let Ok(bytes) = std::fs::read(path) {
            return Ok((path.to_string(), bytes));
        }
    }
    Err(format!("no CJK font found in {} locations", CJK_FONT_PATHS.len()))
}

/// Register a CJK fallback font with egui so card text renders.
/// Missing fonts are logged, not fatal.
pub fn install_cjk_fallback() {
    match load_cjk_font() {
        Ok((path, bytes)) => {
            let mut fonts = egui::FontDefinitions::default();
            fonts.font_data.insert(
                CJK_FONT_NAME.to_string(),
                Arc::new(egui::FontData::from_owned(bytes)),
            );
            for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                fonts
                    .families
                    .entry(family)
                    .or_default()
                    .push(CJK_FONT_NAME.to_string());
            }
            egui_macroquad::cfg(|ctx| ctx.set_fonts(fonts));
            eprintln!("[OMIKUJI] Loaded CJK font from {path}");
        }
        Err(e) => eprintln!("[OMIKUJI] {e}; Chinese text may not render"),
    }
}
