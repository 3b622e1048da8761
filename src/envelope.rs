use crate::Coordinate;

#[derive(Copy, Clone, Debug)]
pub struct Envelope {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() {
            other.is_empty()
        } else {
            self.x_min == other.x_min
                && self.y_min == other.y_min
                && self.x_max == other.x_max
                && self.y_max == other.y_max
        }
    }
}

impl Envelope {
    pub fn new(p1: Coordinate, p2: Coordinate) -> Self {
        Envelope {
            x_min: p1.x.min(p2.x),
            y_min: p1.y.min(p2.y),
            x_max: p1.x.max(p2.x),
            y_max: p1.y.max(p2.y),
        }
    }

    pub fn new_empty() -> Self {
        Envelope {
            x_min: f64::NAN,
            y_min: f64::NAN,
            x_max: f64::NAN,
            y_max: f64::NAN,
        }
    }

    pub fn of_coords(coords: &[Coordinate]) -> Self {
        coords.iter().fold(Envelope::new_empty(), |mut e, &c| {
            e.expand_coord(c);
            e
        })
    }

    pub fn is_empty(&self) -> bool {
        self.x_min.is_nan() || self.y_min.is_nan() || self.x_max.is_nan() || self.y_max.is_nan()
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            x: (self.x_max + self.x_min) / 2.,
            y: (self.y_max + self.y_min) / 2.,
        }
    }

    pub fn intersects(&self, other: Envelope) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        self.x_min <= point.x
            && point.x <= self.x_max
            && self.y_min <= point.y
            && point.y <= self.y_max
    }

    pub fn contains_envelope(&self, other: Envelope) -> bool {
        self.x_min <= other.x_min
            && self.x_max >= other.x_max
            && self.y_min <= other.y_min
            && self.y_max >= other.y_max
    }

    pub fn expand(&mut self, other: Envelope) {
        self.x_min = self.x_min.min(other.x_min);
        self.y_min = self.y_min.min(other.y_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_max = self.y_max.max(other.y_max);
    }

    pub fn expand_coord(&mut self, coord: Coordinate) {
        self.x_min = self.x_min.min(coord.x);
        self.y_min = self.y_min.min(coord.y);
        self.x_max = self.x_max.max(coord.x);
        self.y_max = self.y_max.max(coord.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_envelope() {
        let empty = Envelope::new_empty();
        assert!(empty.is_empty());
        assert_eq!(empty, Envelope::new_empty());
        assert!(!empty.contains((0., 0.).into()));
        assert!(!empty.intersects(Envelope::new((0., 0.).into(), (1., 1.).into())));
    }

    #[test]
    fn test_of_coords() {
        let env = Envelope::of_coords(&[
            (0., 3.).into(),
            (2., -1.).into(),
            (1., 1.).into(),
        ]);
        assert_eq!(
            env,
            Envelope {
                x_min: 0.,
                y_min: -1.,
                x_max: 2.,
                y_max: 3.,
            }
        );
        assert_eq!(env.center(), Coordinate::new(1., 1.));
    }

    #[test]
    fn test_containment() {
        let outer = Envelope::new((0., 0.).into(), (10., 10.).into());
        let inner = Envelope::new((2., 2.).into(), (3., 8.).into());
        assert!(outer.contains_envelope(inner));
        assert!(!inner.contains_envelope(outer));
        assert!(outer.intersects(inner));
        assert!(outer.contains((5., 5.).into()));
        assert!(!outer.contains((11., 5.).into()));
    }
}
