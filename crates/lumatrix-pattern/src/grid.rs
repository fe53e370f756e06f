#![forbid(unsafe_code)]

//! Fixed-size cell grids with a current/next generation pair.
//!
//! Buffers are allocated once at construction and never resized. All
//! accessors are bounds-checked; out-of-range reads return `None` and
//! out-of-range writes are silent no-ops, never a fault.

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    /// Cells per row.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

impl GridSize {
    /// The physical panel: 64×32.
    pub const PANEL: Self = Self { width: 64, height: 32 };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total cell count.
    #[must_use]
    pub const fn cells(self) -> usize {
        self.width * self.height
    }

    /// Whether `(x, y)` lies inside the grid.
    #[must_use]
    pub const fn contains(self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}

/// A single fixed-size grid of copyable cells.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    size: GridSize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Allocate a grid filled with `fill`.
    #[must_use]
    pub fn new(size: GridSize, fill: T) -> Self {
        Self { size, cells: vec![fill; size.cells()] }
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Read a cell; `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if self.size.contains(x, y) { Some(self.cells[y * self.size.width + x]) } else { None }
    }

    /// Write a cell. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if self.size.contains(x, y) {
            self.cells[y * self.size.width + x] = value;
        }
    }

    /// Overwrite every cell.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

/// A current/next generation pair of grids.
///
/// `set_next` writes the scratch generation; [`DoubleGrid::flip`] exchanges
/// the two, publishing the scratch as current. After a flip the scratch
/// holds the previous generation (readable via `previous`) until the next
/// round of `set_next` writes overwrites it.
#[derive(Debug, Clone)]
pub struct DoubleGrid<T> {
    current: Grid<T>,
    scratch: Grid<T>,
}

impl<T: Copy> DoubleGrid<T> {
    /// Allocate both generations filled with `fill`.
    #[must_use]
    pub fn new(size: GridSize, fill: T) -> Self {
        Self { current: Grid::new(size, fill), scratch: Grid::new(size, fill) }
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.current.size()
    }

    /// Read the displayed generation.
    #[must_use]
    pub fn current(&self, x: usize, y: usize) -> Option<T> {
        self.current.get(x, y)
    }

    /// Read the previous generation (valid after a flip, scratch otherwise).
    #[must_use]
    pub fn previous(&self, x: usize, y: usize) -> Option<T> {
        self.scratch.get(x, y)
    }

    /// Write directly into the displayed generation (seeding only).
    pub fn set_current(&mut self, x: usize, y: usize, value: T) {
        self.current.set(x, y, value);
    }

    /// Write the generation being computed.
    pub fn set_next(&mut self, x: usize, y: usize, value: T) {
        self.scratch.set(x, y, value);
    }

    /// Reset both generations.
    pub fn fill(&mut self, current: T, previous: T) {
        self.current.fill(current);
        self.scratch.fill(previous);
    }

    /// Publish the just-computed generation and retire the old one.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.current, &mut self.scratch);
    }
}
