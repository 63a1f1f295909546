//! # Utility Module
//!
//! Small text helpers shared by the entity and texture code.
//!
//! Map files store names as fixed-width, NUL-padded byte arrays and vectors as
//! whitespace-separated decimal strings (`"origin" "128 -64 36"`). The helpers
//! here turn both into Rust values.

use crate::utils::geometry::Vec3;

/// Parses up to three whitespace-separated floats into a vector.
///
/// Missing trailing components default to zero, matching how the level editor
/// writes partial vectors. Returns `None` when a component is not a number
/// or when the string holds no numbers at all.
///
/// # Examples
///
/// ```
/// use rust_hlbsp::utils::util::parse_vec3;
/// use rust_hlbsp::utils::geometry::Vec3;
///
/// assert_eq!(parse_vec3("1 2 3"), Some(Vec3::new(1.0, 2.0, 3.0)));
/// assert_eq!(parse_vec3("  -8   16 "), Some(Vec3::new(-8.0, 16.0, 0.0)));
/// assert_eq!(parse_vec3("north"), None);
/// ```
pub fn parse_vec3(text: &str) -> Option<Vec3> {
    let mut out = [0.0f32; 3];
    let mut count = 0;
    for (slot, token) in out.iter_mut().zip(text.split_whitespace()) {
        *slot = token.parse().ok()?;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Vec3::from_array(out))
}

/// Reads a fixed-width name, stopping at the first NUL.
///
/// Bytes are mapped one-to-one onto chars so that non-UTF-8 names from old
/// tools survive instead of failing.
pub fn read_fixed_name(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as char)
        .collect()
}
