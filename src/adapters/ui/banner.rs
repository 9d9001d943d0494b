//! Startup banner: "BIZPAGE" in figlet's standard font with a vertical gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Deep blue (#1e40af), the simple-corporate primary.
const DEEP_BLUE: (u8, u8, u8) = (0x1e, 0x40, 0xaf);
/// Violet (#8b5cf6), the visual-culture primary.
const VIOLET: (u8, u8, u8) = (0x8b, 0x5c, 0xf6);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - t) + f64::from(y) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn banner_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("BIZPAGE").map(|figure| figure.to_string()))
        .unwrap_or_else(|| "BIZPAGE\n".to_string())
}

pub fn print_welcome() {
    let mut out = stdout();
    let art = banner_art();
    let lines: Vec<&str> = art.lines().filter(|l| !l.trim().is_empty()).collect();
    let last = lines.len().saturating_sub(1).max(1) as f64;

    for (i, line) in lines.iter().enumerate() {
        let (r, g, b) = lerp_rgb(DEEP_BLUE, VIOLET, i as f64 / last);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: VIOLET.0,
        g: VIOLET.1,
        b: VIOLET.2,
    }));
    let _ = out.execute(Print(format!(
        "v{}  business page builder\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
