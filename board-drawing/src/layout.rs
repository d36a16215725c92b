use board_common::regions::Region;
use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

/// Relative widths of the board's columns
const COLUMNS: [u32; 4] = [1, 2, 3, 3];
/// Relative heights of the board's rows
const ROWS: [u32; 6] = [1, 1, 2, 1, 1, 5];
/// Padding around the grid, in percent of the smaller screen dimension
const PADDING_PERCENT: u32 = 5;

/// Where each part of the board goes on a screen of a given size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub screen: Rectangle,
    pub last_name: Rectangle,
    pub first_name: Rectangle,
    pub team: Rectangle,
    pub start_number: Rectangle,
    pub attempt: Rectangle,
    pub weight: Rectangle,
    pub barbell: Rectangle,
    /// Shared by the athlete and break clocks, only one is ever shown
    pub timer: Rectangle,
    pub decision: Rectangle,
}

fn grid_lines(start: i32, length: u32, weights: &[u32]) -> Vec<i32> {
    let total: u32 = weights.iter().sum();
    let mut acc = 0;
    let mut lines: Vec<i32> = weights
        .iter()
        .map(|weight| {
            let line = start + (length * acc / total) as i32;
            acc += weight;
            line
        })
        .collect();
    lines.push(start + length as i32);
    lines
}

fn cell(cols: &[i32], rows: &[i32], col: (usize, usize), row: (usize, usize)) -> Rectangle {
    Rectangle::with_corners(
        Point::new(cols[col.0], rows[row.0]),
        Point::new(cols[col.1] - 1, rows[row.1] - 1),
    )
}

impl BoardLayout {
    pub fn new(size: Size) -> Self {
        let pad = size.width.min(size.height) * PADDING_PERCENT / 100;
        let inner = Size::new(
            size.width.saturating_sub(2 * pad),
            size.height.saturating_sub(2 * pad),
        );
        let origin = Point::new(pad as i32, pad as i32);

        let cols = grid_lines(origin.x, inner.width, &COLUMNS);
        let rows = grid_lines(origin.y, inner.height, &ROWS);

        Self {
            screen: Rectangle::new(Point::zero(), size),
            last_name: cell(&cols, &rows, (0, 4), (0, 1)),
            first_name: cell(&cols, &rows, (0, 4), (1, 2)),
            team: cell(&cols, &rows, (0, 4), (2, 3)),
            start_number: cell(&cols, &rows, (0, 1), (4, 5)),
            attempt: cell(&cols, &rows, (1, 2), (4, 5)),
            weight: cell(&cols, &rows, (0, 2), (5, 6)),
            barbell: cell(&cols, &rows, (2, 3), (4, 6)),
            timer: cell(&cols, &rows, (3, 4), (4, 6)),
            decision: cell(&cols, &rows, (2, 4), (3, 6)),
        }
    }

    /// The area a region may draw into
    pub fn region(&self, region: Region) -> Rectangle {
        match region {
            Region::Container => self.screen,
            Region::Name => Rectangle::with_corners(
                self.last_name.top_left,
                self.first_name.top_left + self.first_name.size - Point::new(1, 1),
            ),
            Region::Team => self.team,
            Region::StartNumber => self.start_number,
            Region::Attempt => self.attempt,
            Region::Weight => self.weight,
            Region::Barbell => self.barbell,
            Region::AthleteTimer | Region::BreakTimer => self.timer,
            Region::Decision => self.decision,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use more_asserts::*;

    fn inside(outer: &Rectangle, inner: &Rectangle) -> bool {
        let outer_br = outer.top_left + outer.size - Point::new(1, 1);
        let inner_br = inner.top_left + inner.size - Point::new(1, 1);
        inner.top_left.x >= outer.top_left.x
            && inner.top_left.y >= outer.top_left.y
            && inner_br.x <= outer_br.x
            && inner_br.y <= outer_br.y
    }

    #[test]
    fn test_default_layout() {
        let layout = BoardLayout::new(Size::new(384, 216));
        // 10px of padding, a 364x196 grid
        assert_eq!(layout.last_name.top_left, Point::new(10, 10));
        assert_eq!(layout.last_name.size.width, 364);
        assert_eq!(layout.timer.top_left + layout.timer.size, Point::new(374, 206));
        assert_eq!(layout.weight.top_left.x, 10);
        assert_eq!(layout.start_number.size.width, 40);
        assert_eq!(layout.attempt.size.width, 81);
    }

    #[test]
    fn test_regions_inside_screen() {
        for size in [Size::new(384, 216), Size::new(1920, 1080), Size::new(640, 480)] {
            let layout = BoardLayout::new(size);
            for region in enum_regions() {
                let rect = layout.region(region);
                assert!(inside(&layout.screen, &rect), "{region} at {size:?}");
                assert_gt!(rect.size.width, 0);
                assert_gt!(rect.size.height, 0);
            }
        }
    }

    #[test]
    fn test_cells_do_not_overlap() {
        let layout = BoardLayout::new(Size::new(384, 216));
        let cells = [
            layout.last_name,
            layout.first_name,
            layout.team,
            layout.start_number,
            layout.attempt,
            layout.weight,
            layout.barbell,
            layout.timer,
        ];
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert!(a.intersection(b).is_zero_sized(), "{a:?} and {b:?}");
            }
        }
    }

    #[test]
    fn test_decision_covers_barbell_and_timer() {
        let layout = BoardLayout::new(Size::new(384, 216));
        assert!(inside(&layout.decision, &layout.barbell));
        assert!(inside(&layout.decision, &layout.timer));
    }

    fn enum_regions() -> impl Iterator<Item = Region> {
        enum_iterator::all::<Region>()
    }
}
