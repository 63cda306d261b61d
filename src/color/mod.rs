//! Color swatch shown next to the RGB controls.

/// Build a `#rrggbb` string from three channel levels.
///
/// Levels are not clamped. Anything above 255 gets more than two digits and a
/// negative level keeps its sign.
pub fn derive(red: i64, green: i64, blue: i64) -> String {
    format!("#{}{}{}", channel_hex(red), channel_hex(green), channel_hex(blue))
}

fn channel_hex(level: i64) -> String {
    let digits = if level < 0 {
        format!("-{:x}", level.unsigned_abs())
    } else {
        format!("{:x}", level)
    };
    if digits.len() < 2 {
        format!("0{}", digits)
    } else {
        digits
    }
}
