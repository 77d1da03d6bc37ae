//! The hxbit class-name hash.
//!
//! hxbit derives a class's CLID from its fully qualified name. Files record the CLID next to
//! each class name, so the hash is only used to cross-check what was decoded.

/// Hashes a fully qualified class name into a CLID in `1..=65423`.
pub fn class_id(name: &str) -> u16 {
    let mut v: i32 = 1;
    for c in name.chars() {
        v = v.wrapping_mul(223).wrapping_add(c as i32);
    }
    let v = v & 0x3FFF_FFFF;
    (1 + v % 65423) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("" => 2; "empty")]
    #[test_case("A" => 289; "single char")]
    #[test_case("ab" => 6036; "two chars")]
    fn test_class_id(name: &str) -> u16 {
        class_id(name)
    }

    #[test]
    fn test_range() {
        for name in ["User", "tool.SpeedrunData", "dc.Save", "a.very.long.package.Name"] {
            let id = class_id(name);
            assert!((1..=65423).contains(&id), "{name} => {id}");
        }
    }
}
