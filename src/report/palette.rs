//! Diverging blue → white → red color scale for table cells.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const LOW: Rgb = Rgb(59, 110, 178);
pub const MID: Rgb = Rgb(242, 242, 242);
pub const HIGH: Rgb = Rgb(201, 61, 78);

pub const ANSI_RESET: &str = "\x1b[0m";

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// 24-bit ANSI background escape.
    pub fn ansi_bg(&self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.0, self.1, self.2)
    }

    /// Whether light text reads better on this background.
    pub fn is_dark(&self) -> bool {
        let luma = 0.299 * f64::from(self.0) + 0.587 * f64::from(self.1) + 0.114 * f64::from(self.2);
        luma < 140.0
    }

    pub fn text_color(&self) -> Rgb {
        if self.is_dark() { Rgb(255, 255, 255) } else { Rgb(0, 0, 0) }
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Map a position in [0, 1] onto the diverging scale.
pub fn diverging(t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    if t < 0.5 {
        Rgb::lerp(LOW, MID, t * 2.0)
    } else {
        Rgb::lerp(MID, HIGH, (t - 0.5) * 2.0)
    }
}

/// Min → max normalization over the values of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScale {
    min: f64,
    max: f64,
}

impl ColumnScale {
    /// Scale over the finite values present; `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Option<Self> {
        values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| {
                Some(match acc {
                    Some(s) => Self { min: s.min.min(v), max: s.max.max(v) },
                    None => Self { min: v, max: v },
                })
            })
    }

    pub fn position(&self, value: f64) -> f64 {
        if self.max > self.min {
            (value - self.min) / (self.max - self.min)
        } else {
            0.5
        }
    }

    pub fn color(&self, value: Option<f64>) -> Option<Rgb> {
        value.filter(|v| v.is_finite()).map(|v| diverging(self.position(v)))
    }
}
