// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Human-readable formatting helpers for the presentation layer.

/// Formats a millisecond value with precision scaled to its magnitude.
pub fn format_ms(ms: f64) -> String {
    if ms < 0.001 {
        "<0.001ms".to_string()
    } else if ms < 1.0 {
        format!("{ms:.3}ms")
    } else if ms < 10.0 {
        format!("{ms:.2}ms")
    } else {
        format!("{ms:.1}ms")
    }
}

/// Formats a byte count as a human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

    let b = bytes as f64;
    if b < KIB {
        format!("{bytes}B")
    } else if b < MIB {
        format!("{:.1}KB", b / KIB)
    } else if b < GIB {
        format!("{:.1}MB", b / MIB)
    } else {
        format!("{:.2}GB", b / GIB)
    }
}

/// Formats a count with thousands separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a percentage with one decimal place.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Renders a fixed-width text progress bar for a 0-100 percentage.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as isize;
    let filled = filled.clamp(0, width as isize) as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        bar.push(if i < filled { '=' } else { ' ' });
    }
    bar.push(']');
    bar
}
