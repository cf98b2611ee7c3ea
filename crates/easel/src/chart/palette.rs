// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use serde::{Deserialize, Serialize};

const DEFAULT: &[&str] = &[
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1",
];
const PASTEL: &[&str] = &[
    "#FEF3C7", "#DBEAFE", "#D1FAE5", "#FCE7F3", "#E0E7FF", "#FEF0E7", "#ECFDF5", "#FDF2F8",
];
const VIBRANT: &[&str] = &[
    "#DC2626", "#EA580C", "#D97706", "#65A30D", "#059669", "#0891B2", "#2563EB", "#7C3AED",
];
const MONOCHROME: &[&str] = &[
    "#111827", "#374151", "#6B7280", "#9CA3AF", "#D1D5DB", "#E5E7EB", "#F3F4F6", "#F9FAFB",
];
const BORDER_DARKEN_PERCENT: i32 = 20;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Default,
    Pastel,
    Vibrant,
    Monochrome,
}
impl Palette {
    /// Case-insensitive; anything unrecognised is the default scheme.
    pub fn from_scheme(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pastel" => Palette::Pastel,
            "vibrant" => Palette::Vibrant,
            "monochrome" => Palette::Monochrome,
            _ => Palette::Default,
        }
    }
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            Palette::Default => DEFAULT,
            Palette::Pastel => PASTEL,
            Palette::Vibrant => VIBRANT,
            Palette::Monochrome => MONOCHROME,
        }
    }
    pub fn len(&self) -> usize {
        self.colors().len()
    }
    pub fn is_empty(&self) -> bool {
        self.colors().is_empty()
    }
    pub fn color(&self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }
    pub fn border(&self, index: usize) -> String {
        darken(self.color(index), BORDER_DARKEN_PERCENT)
    }
    pub fn translucent(&self, index: usize, alpha: f64) -> String {
        with_alpha(self.color(index), alpha)
    }
    pub fn take(&self, count: usize) -> Vec<String> {
        (0..count).map(|i| self.color(i).to_string()).collect()
    }
}
fn parse_hex(color: &str) -> Option<(i32, i32, i32)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let num = i32::from_str_radix(hex, 16).ok()?;
    Some(((num >> 16) & 0xFF, (num >> 8) & 0xFF, num & 0xFF))
}
/// Shifts every channel by `percent` of 255, clamped. Non-hex input is
/// returned unchanged.
pub fn darken(color: &str, percent: i32) -> String {
    let Some((r, g, b)) = parse_hex(color) else {
        return color.to_string();
    };
    let amount = (2.55 * -(percent as f64)).round() as i32;
    let shift = |channel: i32| (channel + amount).clamp(0, 255);
    format!("#{:02x}{:02x}{:02x}", shift(r), shift(g), shift(b))
}
pub fn with_alpha(color: &str, alpha: f64) -> String {
    match parse_hex(color) {
        Some((r, g, b)) if alpha < 1.0 => format!("rgba({r}, {g}, {b}, {alpha})"),
        _ => color.to_string(),
    }
}
