//! Path grammar for transform requests.
//!
//! # Responsibilities
//! - Parse `/process/<kind>/<x>,<y>,<w>,<h>` exactly, anchored at both ends
//! - Map the kind token to a [`Transform`]
//! - Parse the four signed rectangle components, rejecting overflow
//!
//! # Design Decisions
//! - Case-sensitive kind tokens, exactly four comma-separated integers
//! - Any deviation (extra segments, unknown kind, wrong arity) is NoMatch
//! - An integer outside the `i32` range is a parse failure, not saturation

/// Orientation change requested in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// 90° clockwise rotation.
    RotateCw,
    /// 270° clockwise rotation (90° counter-clockwise).
    RotateCcw,
    /// Mirror across the horizontal axis (top/bottom swap).
    FlipV,
    /// Mirror across the vertical axis (left/right swap).
    FlipH,
}

/// Requested crop rectangle.
///
/// All four components are signed: the grammar permits a leading `-` on
/// each of them. A non-positive extent denotes an empty rectangle; the
/// crop stage treats it as intersecting nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Parsed result of a request path: transform kind plus rectangle.
/// Produced once per request, immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub transform: Transform,
    pub rect: CropRect,
}

/// Match a request path against the transform grammar.
///
/// Returns `None` for anything that does not match exactly: wrong
/// prefix, unknown kind token, wrong rectangle arity, trailing
/// segments, or integers outside the `i32` range.
pub fn match_path(path: &str) -> Option<RouteMatch> {
    let rest = path.strip_prefix("/process/")?;
    let (kind, rect) = rest.split_once('/')?;

    let transform = match kind {
        "rotate-cw" => Transform::RotateCw,
        "rotate-ccw" => Transform::RotateCcw,
        "flip-v" => Transform::FlipV,
        "flip-h" => Transform::FlipH,
        _ => return None,
    };

    let mut parts = rect.split(',');
    let x = parse_component(parts.next()?)?;
    let y = parse_component(parts.next()?)?;
    let w = parse_component(parts.next()?)?;
    let h = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    Some(RouteMatch {
        transform,
        rect: CropRect { x, y, w, h },
    })
}

/// Parse one rectangle component: optional leading `-`, then one or
/// more ASCII digits. `parse` rejects overflow, which the grammar
/// treats as NoMatch.
fn parse_component(s: &str) -> Option<i32> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_every_kind() {
        let cases = [
            ("rotate-cw", Transform::RotateCw),
            ("rotate-ccw", Transform::RotateCcw),
            ("flip-v", Transform::FlipV),
            ("flip-h", Transform::FlipH),
        ];
        for (token, expected) in cases {
            let m = match_path(&format!("/process/{}/1,2,3,4", token)).unwrap();
            assert_eq!(m.transform, expected);
            assert_eq!(m.rect, CropRect { x: 1, y: 2, w: 3, h: 4 });
        }
    }

    #[test]
    fn recovers_negative_components() {
        let m = match_path("/process/flip-h/-1,0,10,10").unwrap();
        assert_eq!(m.transform, Transform::FlipH);
        assert_eq!(m.rect, CropRect { x: -1, y: 0, w: 10, h: 10 });

        // The grammar allows a sign on every component, extents included.
        let m = match_path("/process/rotate-cw/-1,-2,-3,-4").unwrap();
        assert_eq!(m.rect, CropRect { x: -1, y: -2, w: -3, h: -4 });
    }

    #[test]
    fn rejects_structural_deviations() {
        let bad = [
            "/process/rotate-cw/1,2,3",
            "/process/rotate-cw/1,2,3,4,5",
            "/process/zoom/1,2,3,4",
            "/process/rotate-cw/1,2,3,4/extra",
            "/process/rotate-cw",
            "/process/rotate-cw/",
            "/process//1,2,3,4",
            "/other/rotate-cw/1,2,3,4",
            "/process/ROTATE-CW/1,2,3,4",
            "prefix/process/rotate-cw/1,2,3,4",
            "/process/rotate-cw/1,2,3,",
            "/process/rotate-cw/1, 2,3,4",
        ];
        for path in bad {
            assert!(match_path(path).is_none(), "should not match: {}", path);
        }
    }

    #[test]
    fn rejects_malformed_integers() {
        for path in [
            "/process/rotate-cw/a,2,3,4",
            "/process/rotate-cw/--1,2,3,4",
            "/process/rotate-cw/+1,2,3,4",
            "/process/rotate-cw/1.5,2,3,4",
            "/process/rotate-cw/-,2,3,4",
        ] {
            assert!(match_path(path).is_none(), "should not match: {}", path);
        }
    }

    #[test]
    fn overflow_is_no_match() {
        assert!(match_path("/process/rotate-cw/2147483648,0,10,10").is_none());
        assert!(match_path("/process/rotate-cw/0,0,10,99999999999999999999").is_none());

        // Exactly at the i32 bounds still parses.
        let m = match_path("/process/rotate-cw/2147483647,-2147483648,1,1").unwrap();
        assert_eq!(m.rect.x, i32::MAX);
        assert_eq!(m.rect.y, i32::MIN);
    }
}
