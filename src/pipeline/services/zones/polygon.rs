use crate::landmarks::geometry::Point;
use crate::pipeline::domain::zones::PixelBounds;

const EDGE_TOLERANCE: f64 = 1e-9;

fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull by monotone chain, counter-clockwise, collinear points dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Point-in-convex-polygon, boundary inclusive. Degenerate polygons contain nothing.
pub fn contains(polygon: &[Point], p: &Point) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .all(|(a, b)| cross(a, b, p) >= -EDGE_TOLERANCE)
}

/// Pixel bounds covering the polygon, clipped to the image. `None` when empty.
pub fn bounds(polygon: &[Point], width: u32, height: u32) -> Option<PixelBounds> {
    if polygon.is_empty() || width == 0 || height == 0 {
        return None;
    }
    let min_x = polygon.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = polygon.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = polygon.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = polygon.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let x0 = min_x.floor().clamp(0.0, width as f64) as u32;
    let y0 = min_y.floor().clamp(0.0, height as f64) as u32;
    let x1 = max_x.ceil().clamp(0.0, width as f64) as u32;
    let y1 = max_y.ceil().clamp(0.0, height as f64) as u32;

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelBounds::new(x0, y0, x1 - x0, y1 - y0))
}

/// Row-major mask over `bounds`; a pixel is inside when its centre is.
pub fn mask(polygon: &[Point], bounds: &PixelBounds) -> Vec<bool> {
    let mut mask = Vec::with_capacity(bounds.area() as usize);
    for y in bounds.y..bounds.y + bounds.height {
        for x in bounds.x..bounds.x + bounds.width {
            mask.push(contains(polygon, &Point::new(x as f64 + 0.5, y as f64 + 0.5)));
        }
    }
    mask
}

/// Image coordinates of the pixels inside the polygon.
pub fn pixels_inside(polygon: &[Point], bounds: &PixelBounds) -> Vec<(u32, u32)> {
    let mut pixels = Vec::new();
    for y in bounds.y..bounds.y + bounds.height {
        for x in bounds.x..bounds.x + bounds.width {
            if contains(polygon, &Point::new(x as f64 + 0.5, y as f64 + 0.5)) {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(2.0, 2.0),
            Point::new(6.0, 2.0),
            Point::new(6.0, 6.0),
            Point::new(2.0, 6.0),
        ]
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let mut points = square();
        points.push(Point::new(4.0, 4.0));
        points.push(Point::new(4.0, 2.0));
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point::new(4.0, 4.0)));
    }

    #[test]
    fn hull_is_independent_of_input_order() {
        let mut reversed = square();
        reversed.reverse();
        assert_eq!(convex_hull(&square()), convex_hull(&reversed));
    }

    #[test]
    fn containment_is_boundary_inclusive() {
        let hull = convex_hull(&square());
        assert!(contains(&hull, &Point::new(4.0, 4.0)));
        assert!(contains(&hull, &Point::new(2.0, 4.0)));
        assert!(!contains(&hull, &Point::new(6.5, 4.0)));
        assert!(!contains(&hull[..2], &Point::new(4.0, 2.0)));
    }

    #[test]
    fn mask_covers_square_interior() {
        let hull = convex_hull(&square());
        let b = bounds(&hull, 10, 10).unwrap();
        assert_eq!(b, PixelBounds::new(2, 2, 4, 4));
        assert!(mask(&hull, &b).iter().all(|inside| *inside));
        assert_eq!(pixels_inside(&hull, &b).len(), 16);
    }

    #[test]
    fn bounds_are_clipped_to_image() {
        let hull = convex_hull(&[
            Point::new(-3.0, -3.0),
            Point::new(4.0, -3.0),
            Point::new(4.0, 4.0),
        ]);
        assert_eq!(bounds(&hull, 3, 3), Some(PixelBounds::new(0, 0, 3, 3)));
        assert_eq!(bounds(&hull, 0, 3), None);
    }
}
