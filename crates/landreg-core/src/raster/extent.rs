/// Axis-aligned bounding box in map units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// True when the box has no interior area.
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
        )
    }

    /// Common region of two boxes, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Extent) -> Option<Extent> {
        let e = Extent {
            xmin: self.xmin.max(other.xmin),
            xmax: self.xmax.min(other.xmax),
            ymin: self.ymin.max(other.ymin),
            ymax: self.ymax.min(other.ymax),
        };
        if e.is_empty() {
            None
        } else {
            Some(e)
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Extent {
        Extent {
            xmin: self.xmin + dx,
            xmax: self.xmax + dx,
            ymin: self.ymin + dy,
            ymax: self.ymax + dy,
        }
    }

    /// Scale the box about its centre. `factor < 1` shrinks it.
    pub fn scale(&self, factor: f64) -> Extent {
        let (cx, cy) = self.center();
        let half_w = self.width() * factor / 2.0;
        let half_h = self.height() * factor / 2.0;
        Extent {
            xmin: cx - half_w,
            xmax: cx + half_w,
            ymin: cy - half_h,
            ymax: cy + half_h,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}
