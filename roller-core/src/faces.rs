//! Die face images.
//!
//! Each face is a 3x3 pip grid. The table maps the six face values one to
//! one; anything else falls back to the image for face 1.

/// Pip layout for a single die face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceImage {
    pub face: u8,
    pips: [[bool; 3]; 3],
}

const O: bool = false;
const X: bool = true;

const FACE_IMAGES: [FaceImage; 6] = [
    FaceImage {
        face: 1,
        pips: [[O, O, O], [O, X, O], [O, O, O]],
    },
    FaceImage {
        face: 2,
        pips: [[X, O, O], [O, O, O], [O, O, X]],
    },
    FaceImage {
        face: 3,
        pips: [[X, O, O], [O, X, O], [O, O, X]],
    },
    FaceImage {
        face: 4,
        pips: [[X, O, X], [O, O, O], [X, O, X]],
    },
    FaceImage {
        face: 5,
        pips: [[X, O, X], [O, X, O], [X, O, X]],
    },
    FaceImage {
        face: 6,
        pips: [[X, O, X], [X, O, X], [X, O, X]],
    },
];

const PIP: &str = "●";
const SPIN: [char; 4] = ['|', '/', '-', '\\'];

/// Image for a face value. Unmapped values show face 1.
pub fn face_image(value: u8) -> &'static FaceImage {
    match value {
        1..=6 => &FACE_IMAGES[usize::from(value - 1)],
        _ => &FACE_IMAGES[0],
    }
}

/// Nearest clockwise quarter turn (0-3) for an angle in degrees.
pub fn quarter_turns(angle: f64) -> u8 {
    let normalized = angle.rem_euclid(360.0);
    ((normalized / 90.0).round() as u8) % 4
}

/// Spinner glyph for an angle, advancing every 45 degrees.
pub fn spin_glyph(angle: f64) -> char {
    let octant = (angle.rem_euclid(360.0) / 45.0) as usize;
    SPIN[octant % SPIN.len()]
}

impl FaceImage {
    pub fn pips(&self) -> [[bool; 3]; 3] {
        self.pips
    }

    pub fn pip_count(&self) -> usize {
        self.pips.iter().flatten().filter(|p| **p).count()
    }

    /// The same face turned clockwise by `quarter_turns` x 90 degrees.
    pub fn rotated(&self, quarter_turns: u8) -> FaceImage {
        let mut pips = self.pips;
        for _ in 0..(quarter_turns % 4) {
            let mut next = [[false; 3]; 3];
            for (r, row) in next.iter_mut().enumerate() {
                for (c, cell) in row.iter_mut().enumerate() {
                    *cell = pips[2 - c][r];
                }
            }
            pips = next;
        }
        FaceImage {
            face: self.face,
            pips,
        }
    }

    /// Character-cell rendering of the die, 9 columns by 5 rows.
    pub fn to_lines(&self) -> Vec<String> {
        self.framed_lines('─')
    }

    /// Like [`FaceImage::to_lines`] but with a spinner glyph in the top edge.
    pub fn to_spinning_lines(&self, angle: f64) -> Vec<String> {
        self.framed_lines(spin_glyph(angle))
    }

    fn framed_lines(&self, marker: char) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);
        lines.push(format!("┌───{marker}───┐"));
        for row in &self.pips {
            let cells: Vec<&str> = row.iter().map(|p| if *p { PIP } else { " " }).collect();
            lines.push(format!("│ {} │", cells.join(" ")));
        }
        lines.push("└───────┘".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_one_to_one() {
        for value in 1..=6u8 {
            let image = face_image(value);
            assert_eq!(image.face, value);
            assert_eq!(image.pip_count(), usize::from(value));
        }
    }

    #[test]
    fn test_out_of_range_falls_back_to_one() {
        assert_eq!(face_image(0), face_image(1));
        assert_eq!(face_image(7), face_image(1));
        assert_eq!(face_image(u8::MAX).face, 1);
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(quarter_turns(0.0), 0);
        assert_eq!(quarter_turns(44.0), 0);
        assert_eq!(quarter_turns(46.0), 1);
        assert_eq!(quarter_turns(180.0), 2);
        assert_eq!(quarter_turns(270.0), 3);
        assert_eq!(quarter_turns(359.0), 0);
        assert_eq!(quarter_turns(720.0), 0);
        assert_eq!(quarter_turns(-90.0), 3);
    }

    #[test]
    fn test_rotation() {
        let two = face_image(2);
        let turned = two.rotated(1);
        assert_eq!(turned.pips(), [[O, O, X], [O, O, O], [X, O, O]]);
        assert_eq!(turned.pip_count(), 2);

        // Full turn returns to the original layout.
        assert_eq!(two.rotated(4), *two);
        assert_eq!(two.rotated(2), *two);

        let six = face_image(6).rotated(1);
        assert_eq!(six.pips(), [[X, X, X], [O, O, O], [X, X, X]]);
    }

    #[test]
    fn test_symmetric_faces_unchanged_by_rotation() {
        for value in [1, 4, 5] {
            let image = face_image(value);
            for turns in 0..4 {
                assert_eq!(image.rotated(turns), *image);
            }
        }
    }

    #[test]
    fn test_to_lines() {
        let lines = face_image(5).to_lines();
        assert_eq!(
            lines,
            vec![
                "┌───────┐",
                "│ ●   ● │",
                "│   ●   │",
                "│ ●   ● │",
                "└───────┘",
            ]
        );
    }

    #[test]
    fn test_spinning_lines_marker() {
        assert_eq!(face_image(1).to_spinning_lines(0.0)[0], "┌───|───┐");
        assert_eq!(face_image(1).to_spinning_lines(50.0)[0], "┌───/───┐");
        assert_eq!(face_image(1).to_spinning_lines(100.0)[0], "┌───-───┐");
    }
}
