//! Filter-expression compositing over RGBA pixels.
//!
//! Accepts the CSS `filter` shorthand subset used by the editor
//! (`brightness(110%) hue-rotate(20deg) blur(2px) ...`) and applies the terms
//! left to right using the Filter Effects Level 1 definitions. Colour math runs
//! on unpremultiplied sRGB values in `0.0..=1.0`; blur runs premultiplied.

use crate::util::rounded_u8;
use egui::{Color32, ColorImage};
use rayon::prelude::*;
use std::f32::consts::PI;

/// Minimum pixel count before parallelizing per-pixel passes.
const PARALLEL_PIXEL_THRESHOLD: usize = 262_144; // 512x512

type Rgba = [f32; 4];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    #[error("malformed filter term `{0}`")]
    MalformedTerm(String),
    #[error("unknown filter function `{0}`")]
    UnknownFunction(String),
    #[error("invalid argument `{arg}` for {function}()")]
    InvalidArgument { function: String, arg: String },
}

/// A single filter function with its argument normalized.
///
/// Amounts are fractions (`110%` is `1.1`), hue rotation is in degrees and blur
/// is the Gaussian standard deviation in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    HueRotate(f32),
    Blur(f32),
    Grayscale(f32),
    Sepia(f32),
    Opacity(f32),
    Invert(f32),
}

impl FilterOp {
    fn from_term(function: &str, arg: &str) -> Result<Self, FilterParseError> {
        let invalid = || FilterParseError::InvalidArgument {
            function: function.to_string(),
            arg: arg.to_string(),
        };
        let op = match function {
            "brightness" => Self::Brightness(parse_amount(arg).ok_or_else(invalid)?),
            "contrast" => Self::Contrast(parse_amount(arg).ok_or_else(invalid)?),
            "saturate" => Self::Saturate(parse_amount(arg).ok_or_else(invalid)?),
            "grayscale" => Self::Grayscale(parse_amount(arg).ok_or_else(invalid)?),
            "sepia" => Self::Sepia(parse_amount(arg).ok_or_else(invalid)?),
            "opacity" => Self::Opacity(parse_amount(arg).ok_or_else(invalid)?),
            "invert" => Self::Invert(parse_amount(arg).ok_or_else(invalid)?),
            "hue-rotate" => Self::HueRotate(parse_angle(arg).ok_or_else(invalid)?),
            "blur" => Self::Blur(parse_length(arg).ok_or_else(invalid)?),
            other => return Err(FilterParseError::UnknownFunction(other.to_string())),
        };
        Ok(op)
    }

    fn is_identity(self) -> bool {
        match self {
            Self::Brightness(v) | Self::Contrast(v) | Self::Saturate(v) => {
                (v - 1.0).abs() <= f32::EPSILON
            }
            Self::Opacity(v) => v >= 1.0,
            Self::HueRotate(deg) => deg.rem_euclid(360.0).abs() <= f32::EPSILON,
            Self::Blur(v) | Self::Grayscale(v) | Self::Sepia(v) | Self::Invert(v) => v <= 0.0,
        }
    }

    /// Resolve coefficients once so the pixel loop only does arithmetic.
    fn compile(self) -> Option<CompiledOp> {
        if self.is_identity() {
            return None;
        }
        let step = match self {
            Self::Brightness(amount) => PixelStep::Linear {
                slope: amount,
                intercept: 0.0,
            },
            Self::Contrast(amount) => PixelStep::Linear {
                slope: amount,
                intercept: 0.5f32.mul_add(-amount, 0.5),
            },
            Self::Invert(amount) => {
                let amount = amount.clamp(0.0, 1.0);
                PixelStep::Linear {
                    slope: 2.0f32.mul_add(-amount, 1.0),
                    intercept: amount,
                }
            }
            Self::Opacity(amount) => PixelStep::Opacity(amount.clamp(0.0, 1.0)),
            Self::Saturate(amount) => PixelStep::Matrix(saturate_matrix(amount)),
            Self::HueRotate(deg) => PixelStep::Matrix(hue_rotate_matrix(deg)),
            Self::Grayscale(amount) => PixelStep::Matrix(grayscale_matrix(amount)),
            Self::Sepia(amount) => PixelStep::Matrix(sepia_matrix(amount)),
            Self::Blur(std_dev) => return box_passes(std_dev).map(CompiledOp::Blur),
        };
        Some(CompiledOp::Pixel(step))
    }
}

#[derive(Debug, Clone, Copy)]
enum PixelStep {
    /// `c * slope + intercept` on each colour channel.
    Linear { slope: f32, intercept: f32 },
    Opacity(f32),
    Matrix([[f32; 3]; 3]),
}

impl PixelStep {
    fn apply(&self, px: &mut Rgba) {
        match self {
            Self::Linear { slope, intercept } => map_rgb(px, |c| c.mul_add(*slope, *intercept)),
            Self::Opacity(amount) => px[3] = (px[3] * amount).clamp(0.0, 1.0),
            Self::Matrix(m) => apply_matrix(px, m),
        }
    }
}

/// One box-blur pass covering `behind` pixels before and `ahead` after the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoxPass {
    behind: usize,
    ahead: usize,
}

#[derive(Debug, Clone, Copy)]
enum CompiledOp {
    Pixel(PixelStep),
    Blur([BoxPass; 3]),
}

/// Consecutive per-pixel steps run in a single pass; blurs stand alone.
#[derive(Debug)]
enum Stage {
    Pixels(Vec<PixelStep>),
    Blur([BoxPass; 3]),
}

/// Ordered list of filter operations parsed from an expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    ops: Vec<FilterOp>,
}

impl FilterChain {
    /// Parse a whitespace-separated list of `function(argument)` terms.
    ///
    /// An empty string or `none` yields the identity chain.
    pub fn parse(expression: &str) -> Result<Self, FilterParseError> {
        let expression = expression.trim();
        if expression.is_empty() || expression == "none" {
            return Ok(Self::default());
        }

        let mut ops = Vec::new();
        let mut rest = expression;
        while !rest.is_empty() {
            let malformed = || FilterParseError::MalformedTerm(rest.to_string());
            let open = rest.find('(').ok_or_else(malformed)?;
            let close = rest.find(')').ok_or_else(malformed)?;
            if close < open {
                return Err(malformed());
            }
            let function = rest[..open].trim();
            if function.is_empty() || function.contains(char::is_whitespace) {
                return Err(malformed());
            }
            let arg = rest[open + 1..close].trim();
            ops.push(FilterOp::from_term(function, arg)?);
            rest = rest[close + 1..].trim_start();
        }
        Ok(Self { ops })
    }

    #[cfg(test)]
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| op.is_identity())
    }

    fn stages(&self) -> Vec<Stage> {
        let mut stages: Vec<Stage> = Vec::new();
        for op in self.ops.iter().filter_map(|op| op.compile()) {
            match op {
                CompiledOp::Pixel(step) => {
                    if let Some(Stage::Pixels(steps)) = stages.last_mut() {
                        steps.push(step);
                    } else {
                        stages.push(Stage::Pixels(vec![step]));
                    }
                }
                CompiledOp::Blur(passes) => stages.push(Stage::Blur(passes)),
            }
        }
        stages
    }

    /// Run every operation in order over a copy of `base`.
    pub fn apply(&self, base: &ColorImage) -> ColorImage {
        let stages = self.stages();
        if base.pixels.is_empty() || stages.is_empty() {
            return base.clone();
        }
        let [width, height] = base.size;
        let mut buf: Vec<Rgba> = map_pixels(&base.pixels, |&c| to_unit(c));

        for stage in &stages {
            match stage {
                Stage::Pixels(steps) => for_each_pixel(&mut buf, |px| {
                    for step in steps {
                        step.apply(px);
                    }
                }),
                Stage::Blur(passes) => gaussian_blur(&mut buf, width, height, passes),
            }
        }

        ColorImage::new(base.size, map_pixels(&buf, |&px| from_unit(px)))
    }
}

fn split_number(arg: &str) -> Option<(f32, &str)> {
    let end = arg
        .char_indices()
        .find(|&(idx, ch)| !(ch.is_ascii_digit() || ch == '.' || (idx == 0 && (ch == '-' || ch == '+'))))
        .map_or(arg.len(), |(idx, _)| idx);
    let value: f32 = arg[..end].parse().ok()?;
    value.is_finite().then_some((value, arg[end..].trim()))
}

fn parse_amount(arg: &str) -> Option<f32> {
    let (value, unit) = split_number(arg)?;
    if value < 0.0 {
        return None;
    }
    match unit {
        "%" => Some(value / 100.0),
        "" => Some(value),
        _ => None,
    }
}

fn parse_angle(arg: &str) -> Option<f32> {
    let (value, unit) = split_number(arg)?;
    match unit {
        "deg" => Some(value),
        "rad" => Some(value.to_degrees()),
        "grad" => Some(value * 0.9),
        "turn" => Some(value * 360.0),
        "" if value == 0.0 => Some(0.0),
        _ => None,
    }
}

fn parse_length(arg: &str) -> Option<f32> {
    let (value, unit) = split_number(arg)?;
    if value < 0.0 {
        return None;
    }
    match unit {
        "px" => Some(value),
        "" if value == 0.0 => Some(0.0),
        _ => None,
    }
}

fn to_unit(color: Color32) -> Rgba {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    [
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    ]
}

fn from_unit(px: Rgba) -> Color32 {
    let [r, g, b, a] = px.map(|c| rounded_u8(c.clamp(0.0, 1.0) * 255.0));
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn map_pixels<T: Sync, U: Send>(src: &[T], f: impl Fn(&T) -> U + Sync + Send) -> Vec<U> {
    if src.len() >= PARALLEL_PIXEL_THRESHOLD {
        src.par_iter().map(f).collect()
    } else {
        src.iter().map(f).collect()
    }
}

fn for_each_pixel(buf: &mut [Rgba], f: impl Fn(&mut Rgba) + Sync + Send) {
    if buf.len() >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_iter_mut().for_each(f);
    } else {
        buf.iter_mut().for_each(f);
    }
}

fn map_rgb(px: &mut Rgba, f: impl Fn(f32) -> f32) {
    for channel in &mut px[..3] {
        *channel = f(*channel).clamp(0.0, 1.0);
    }
}

fn apply_matrix(px: &mut Rgba, m: &[[f32; 3]; 3]) {
    let [r, g, b, _] = *px;
    for (row, channel) in m.iter().zip(px.iter_mut()) {
        *channel = row[2]
            .mul_add(b, row[1].mul_add(g, row[0] * r))
            .clamp(0.0, 1.0);
    }
}

fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.787f32.mul_add(s, 0.213), 0.715f32.mul_add(-s, 0.715), 0.072f32.mul_add(-s, 0.072)],
        [0.213f32.mul_add(-s, 0.213), 0.285f32.mul_add(s, 0.715), 0.072f32.mul_add(-s, 0.072)],
        [0.213f32.mul_add(-s, 0.213), 0.715f32.mul_add(-s, 0.715), 0.928f32.mul_add(s, 0.072)],
    ]
}

fn hue_rotate_matrix(deg: f32) -> [[f32; 3]; 3] {
    let (sin, cos) = (deg * PI / 180.0).sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn grayscale_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.7874f32.mul_add(s, 0.2126), 0.7152f32.mul_add(-s, 0.7152), 0.0722f32.mul_add(-s, 0.0722)],
        [0.2126f32.mul_add(-s, 0.2126), 0.2848f32.mul_add(s, 0.7152), 0.0722f32.mul_add(-s, 0.0722)],
        [0.2126f32.mul_add(-s, 0.2126), 0.7152f32.mul_add(-s, 0.7152), 0.9278f32.mul_add(s, 0.0722)],
    ]
}

fn sepia_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.607f32.mul_add(s, 0.393), 0.769f32.mul_add(-s, 0.769), 0.189f32.mul_add(-s, 0.189)],
        [0.349f32.mul_add(-s, 0.349), 0.314f32.mul_add(s, 0.686), 0.168f32.mul_add(-s, 0.168)],
        [0.272f32.mul_add(-s, 0.272), 0.534f32.mul_add(-s, 0.534), 0.869f32.mul_add(s, 0.131)],
    ]
}

/// Box size for the three-pass Gaussian approximation.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn box_size(std_dev: f32) -> usize {
    (std_dev * 3.0 * (2.0 * PI).sqrt() / 4.0 + 0.5).floor().max(0.0) as usize
}

/// Three boxes of size `d` for odd `d`. For even `d`, two boxes of size `d`
/// offset half a pixel to either side, then one centred box of size `d + 1`.
fn box_passes(std_dev: f32) -> Option<[BoxPass; 3]> {
    let d = box_size(std_dev);
    if d <= 1 {
        return None;
    }
    let half = d / 2;
    let centred = BoxPass {
        behind: half,
        ahead: half,
    };
    if d % 2 == 1 {
        return Some([centred; 3]);
    }
    Some([
        BoxPass {
            behind: half,
            ahead: half - 1,
        },
        BoxPass {
            behind: half - 1,
            ahead: half,
        },
        centred,
    ])
}

fn gaussian_blur(buf: &mut Vec<Rgba>, width: usize, height: usize, passes: &[BoxPass; 3]) {
    if width == 0 || height == 0 {
        return;
    }

    for_each_pixel(buf, |px| {
        let a = px[3];
        map_rgb(px, |c| c * a);
    });

    // Box passes are separable: all horizontal passes, then all vertical ones.
    blur_rows(buf, width, passes);
    let mut columns = transpose(buf, width, height);
    blur_rows(&mut columns, height, passes);
    *buf = transpose(&columns, height, width);

    for_each_pixel(buf, |px| {
        let a = px[3];
        if a > 0.0 {
            map_rgb(px, |c| c / a);
        } else {
            *px = [0.0; 4];
        }
    });
}

fn blur_rows(buf: &mut [Rgba], width: usize, passes: &[BoxPass; 3]) {
    buf.par_chunks_mut(width).for_each_init(
        || vec![[0.0; 4]; width],
        |scratch, row| {
            for &pass in passes {
                blur_line(row, scratch, pass);
                row.copy_from_slice(scratch);
            }
        },
    );
}

// Pixels outside the line count as transparent black.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn blur_line(src: &[Rgba], dst: &mut [Rgba], pass: BoxPass) {
    let len = src.len();
    let scale = 1.0 / (pass.behind + pass.ahead + 1) as f64;
    let mut sum = [0.0f64; 4];
    for px in &src[..(pass.ahead + 1).min(len)] {
        for c in 0..4 {
            sum[c] += f64::from(px[c]);
        }
    }
    for x in 0..len {
        for c in 0..4 {
            dst[x][c] = (sum[c] * scale).max(0.0) as f32;
        }
        if let Some(entering) = src.get(x + pass.ahead + 1) {
            for c in 0..4 {
                sum[c] += f64::from(entering[c]);
            }
        }
        if x >= pass.behind {
            let leaving = src[x - pass.behind];
            for c in 0..4 {
                sum[c] -= f64::from(leaving[c]);
            }
        }
    }
}

fn transpose(src: &[Rgba], width: usize, height: usize) -> Vec<Rgba> {
    let mut out = vec![[0.0; 4]; src.len()];
    out.par_chunks_mut(height)
        .enumerate()
        .for_each(|(x, column)| {
            for (y, px) in column.iter_mut().enumerate() {
                *px = src[y * width + x];
            }
        });
    out
}
