use iced::color;
use iced::theme::Palette;
use iced::widget::container;
use iced::{Border, Color, Theme};

/// Resolve the iced Theme, following the system's dark mode where it can be read.
pub fn resolve_theme() -> Theme {
    let palette = if detect_system_dark_mode() {
        dark_palette()
    } else {
        light_palette()
    };
    Theme::custom("Face Reader", palette)
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x1c, 0x1c, 0x1e),
        text: color!(0xcc, 0xcc, 0xcc),
        primary: color!(0x5e, 0x9f, 0xf5),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xcc, 0x00),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf5, 0xf5, 0xf7),
        text: color!(0x1d, 0x1d, 0x1f),
        primary: color!(0x34, 0x78, 0xf6),
        success: color!(0x34, 0xc7, 0x59),
        warning: color!(0xff, 0x9f, 0x0a),
        danger: color!(0xff, 0x3b, 0x30),
    }
}

/// Slightly lifted background for the live view and result panels.
pub fn surface_color(theme: &Theme) -> Color {
    let p = theme.palette();
    let luma = p.background.r * 0.299 + p.background.g * 0.587 + p.background.b * 0.114;
    let shift = if luma > 0.5 { -0.05 } else { 0.08 };
    Color {
        r: (p.background.r + shift).clamp(0.0, 1.0),
        g: (p.background.g + shift).clamp(0.0, 1.0),
        b: (p.background.b + shift).clamp(0.0, 1.0),
        a: 1.0,
    }
}

pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.6,
        ..theme.palette().text
    }
}

pub fn panel(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(surface_color(theme).into()),
        border: Border {
            radius: 10.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(true)
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}
