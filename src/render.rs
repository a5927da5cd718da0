//! Raster rendering of a zoning grid.
//!
//! The planner only depends on the [`Renderer`] trait; [`PngRenderer`] is the
//! stock implementation used by the CLI and the web server.

use std::{fmt, io::Cursor};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{ZoneGrid, ZoneLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub fn parse(text: &str) -> Result<Self, RenderError> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(RenderError::InvalidColor(text.to_string()));
        }
        let mut rgb = [0_u8; 3];
        for (index, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16)
                .map_err(|_| RenderError::InvalidColor(text.to_string()))?;
        }
        Ok(Self(rgb))
    }

    fn darkened(self, factor: f32) -> Self {
        let [r, g, b] = self.0;
        let scale = |channel: u8| (channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self([scale(r), scale(g), scale(b)])
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl TryFrom<String> for HexColor {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

fn default_empty() -> HexColor {
    HexColor([0xE8, 0xE8, 0xE8])
}

fn default_road() -> HexColor {
    HexColor([0x80, 0x80, 0x80])
}

fn default_residential() -> HexColor {
    HexColor([0xFF, 0xD7, 0x00])
}

fn default_commercial() -> HexColor {
    HexColor([0xFF, 0x6B, 0x6B])
}

fn default_park() -> HexColor {
    HexColor([0x90, 0xEE, 0x90])
}

fn default_industrial() -> HexColor {
    HexColor([0xA9, 0xA9, 0xA9])
}

/// One colour per zone label; a field per label keeps it total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_empty")]
    pub empty: HexColor,
    #[serde(default = "default_road")]
    pub road: HexColor,
    #[serde(default = "default_residential")]
    pub residential: HexColor,
    #[serde(default = "default_commercial")]
    pub commercial: HexColor,
    #[serde(default = "default_park")]
    pub park: HexColor,
    #[serde(default = "default_industrial")]
    pub industrial: HexColor,
}

impl Palette {
    pub fn color(&self, label: ZoneLabel) -> HexColor {
        match label {
            ZoneLabel::Empty => self.empty,
            ZoneLabel::Road => self.road,
            ZoneLabel::Residential => self.residential,
            ZoneLabel::Commercial => self.commercial,
            ZoneLabel::Park => self.park,
            ZoneLabel::Industrial => self.industrial,
        }
    }

    pub fn entries(&self) -> [(ZoneLabel, HexColor); 6] {
        ZoneLabel::ALL.map(|label| (label, self.color(label)))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            empty: default_empty(),
            road: default_road(),
            residential: default_residential(),
            commercial: default_commercial(),
            park: default_park(),
            industrial: default_industrial(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid colour '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("grid of {size} cells at scale {scale} exceeds the maximum image side")]
    TooLarge { size: usize, scale: u32 },
    #[error("cannot render an empty grid")]
    EmptyGrid,
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encoded image plus the metadata a caller needs to display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Caption for the image. Not drawn onto the raster.
    pub title: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

pub trait Renderer: Send + Sync {
    fn render(
        &self,
        grid: &ZoneGrid,
        palette: &Palette,
        title: &str,
    ) -> Result<RenderedImage, RenderError>;
}

fn default_scale() -> u32 {
    1
}

fn default_grid_line_interval() -> usize {
    50
}

fn default_grid_line_shade() -> f32 {
    0.75
}

/// Settings for [`PngRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixels per cell side.
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Cells between overlay lines; 0 disables the overlay.
    #[serde(default = "default_grid_line_interval")]
    pub grid_line_interval: usize,
    #[serde(default = "default_grid_line_shade")]
    pub grid_line_shade: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            grid_line_interval: default_grid_line_interval(),
            grid_line_shade: default_grid_line_shade(),
        }
    }
}

pub struct PngRenderer {
    config: RenderConfig,
}

impl PngRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn rasterize(&self, grid: &ZoneGrid, palette: &Palette) -> Result<RgbImage, RenderError> {
        let size = grid.size();
        if size == 0 {
            return Err(RenderError::EmptyGrid);
        }
        let scale = self.config.scale.max(1);
        let side = u32::try_from(size)
            .ok()
            .and_then(|cells| cells.checked_mul(scale))
            .filter(|side| *side <= u16::MAX as u32)
            .ok_or(RenderError::TooLarge { size, scale })?;

        let colors = palette.entries().map(|(_, color)| color);
        let interval = self.config.grid_line_interval;
        let shade = self.config.grid_line_shade;

        let mut img: RgbImage = ImageBuffer::new(side, side);
        for (row, cells) in grid.rows().enumerate() {
            for (col, label) in cells.iter().enumerate() {
                let mut color = colors[label.code() as usize];
                if interval > 0 && (row % interval == 0 || col % interval == 0) {
                    color = color.darkened(shade);
                }
                let x0 = col as u32 * scale;
                let y0 = row as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(x0 + dx, y0 + dy, Rgb(color.0));
                    }
                }
            }
        }
        Ok(img)
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Renderer for PngRenderer {
    fn render(
        &self,
        grid: &ZoneGrid,
        palette: &Palette,
        title: &str,
    ) -> Result<RenderedImage, RenderError> {
        let img = self.rasterize(grid, palette)?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(RenderedImage {
            title: title.to_string(),
            mime_type: "image/png",
            width: img.width(),
            height: img.height(),
            bytes,
        })
    }
}
