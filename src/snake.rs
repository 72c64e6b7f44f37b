use crate::grid::{Cell, Direction, is_self_collision};

/// Ordered body, head first. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Cell>,
}

impl Snake {
    pub fn new(body: Vec<Cell>) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        Some(Self { body })
    }

    /// A straight snake with its head at `head`, trailing away from `direction`.
    pub fn straight(head: Cell, direction: Direction, length: usize) -> Self {
        let back = direction.opposite();
        let mut body = Vec::with_capacity(length.max(1));
        let mut cell = head;
        body.push(cell);
        for _ in 1..length {
            cell = cell.step(back);
            body.push(cell);
        }
        Self { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn is_self_colliding(&self) -> bool {
        is_self_collision(&self.body)
    }

    /// Moves one cell: the new head is pushed in front and the tail drops off.
    pub fn advance(&self, direction: Direction) -> Snake {
        let mut body = Vec::with_capacity(self.body.len());
        body.push(self.head().step(direction));
        body.extend_from_slice(&self.body[..self.body.len() - 1]);
        Snake { body }
    }

    /// Appends one tail segment, extending the tail along its current heading.
    /// A single-cell snake has no heading and stacks the new segment on itself.
    /// The new tail is not bounds-checked and can land outside the walls; it
    /// follows the body back onto the board on the next move.
    pub fn grow(&self) -> Snake {
        let tail = self.tail();
        let new_tail = match self.body.len() {
            1 => tail,
            n => {
                let before = self.body[n - 2];
                Cell::new(tail.x + (tail.x - before.x), tail.y + (tail.y - before.y))
            }
        };
        let mut body = self.body.clone();
        body.push(new_tail);
        Snake { body }
    }
}
