use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// A role color as `(dark, light)` RGB triples.
type Swatch = ((u8, u8, u8), (u8, u8, u8));

const TIMESTAMP: Swatch = ((118, 166, 166), (92, 62, 38));
const PRIMARY: Swatch = ((191, 126, 4), (70, 42, 25));
const ACCENT: Swatch = ((166, 84, 55), (211, 99, 70));
const INFO: Swatch = ((118, 166, 166), (40, 111, 170));
const SUCCESS: Swatch = ((118, 166, 166), (34, 142, 90));
const LABEL: Swatch = ((217, 164, 4), (176, 103, 66));
const VALUE: Swatch = ((242, 211, 56), (199, 146, 76));

#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn rgb(&self, swatch: Swatch) -> (u8, u8, u8) {
    match self.theme {
      Theme::Dark => swatch.0,
      Theme::Light => swatch.1,
    }
  }

  const fn pick(&self, swatch: Swatch) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    let (r, g, b) = self.rgb(swatch);
    Color::Rgb { r, g, b }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick(TIMESTAMP)
  }

  pub const fn primary(&self) -> Color {
    self.pick(PRIMARY)
  }

  pub const fn accent(&self) -> Color {
    self.pick(ACCENT)
  }

  pub const fn info(&self) -> Color {
    self.pick(INFO)
  }

  pub const fn success(&self) -> Color {
    self.pick(SUCCESS)
  }

  pub const fn label(&self) -> Color {
    self.pick(LABEL)
  }

  pub const fn value(&self) -> Color {
    self.pick(VALUE)
  }

  /// Help output styling; always uses the dark palette.
  pub const fn clap_styles() -> Styles {
    const fn fg(swatch: Swatch) -> Option<ClapColor> {
      let (r, g, b) = swatch.0;
      Some(ClapColor::Rgb(RgbColor(r, g, b)))
    }

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(fg(LABEL)))
      .usage(Style::new().bold().fg_color(fg(LABEL)))
      .literal(Style::new().fg_color(fg(SUCCESS)))
      .placeholder(Style::new().fg_color(fg(INFO)))
      .error(Style::new().bold().fg_color(fg(ACCENT)))
      .valid(Style::new().fg_color(fg(SUCCESS)))
      .invalid(Style::new().bold().fg_color(fg(ACCENT)))
  }
}

/// Converts a palette color for use in `comfy-table` cells.
pub fn comfy(color: Color) -> ComfyColor {
  match color {
    Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
    Color::AnsiValue(value) => ComfyColor::AnsiValue(value),
    _ => ComfyColor::Reset,
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => detect_terminal_theme(),
  }
}

fn detect_terminal_theme() -> Theme {
  if let Ok(colorfgbg) = std::env::var("COLORFGBG")
    && let Some(bg) = colorfgbg.split(';').next_back()
    && let Ok(bg_num) = bg.parse::<u8>()
  {
    return if bg_num >= 8 { Theme::Light } else { Theme::Dark };
  }

  Theme::Dark
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_disabled_colors_reset() {
    let colors = Colors::new(false, Theme::Light);
    assert_eq!(colors.primary(), Color::Reset);
    assert_eq!(comfy(colors.value()), ComfyColor::Reset);
  }

  #[test]
  fn test_theme_selects_palette() {
    let dark = Colors::new(true, Theme::Dark);
    let light = Colors::new(true, Theme::Light);
    assert_eq!(dark.accent(), Color::Rgb { r: 166, g: 84, b: 55 });
    assert_eq!(light.accent(), Color::Rgb { r: 211, g: 99, b: 70 });
  }
}
