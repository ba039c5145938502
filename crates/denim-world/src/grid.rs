//! Bounded 2D grid with windowed views.
//!
//! A [`Grid`] owns a flat row-major buffer. [`View`] and [`ViewMut`] borrow that buffer
//! together with a bounds rectangle and never own storage themselves. Coordinates passed to a
//! view are relative to its bounds: non-negative values count from the low edge, negative
//! values from the high edge, and open slice ends default to the view's edges. Every new
//! view is clipped against the backing dimensions, never against the view it came from.

use denim_core::{Extent, GridAxis, IndexError, Result, ShapeError};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// Half-open rectangle `[x_min, x_max) x [y_min, y_max)` in backing coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl Bounds {
    pub fn full(rows: usize, cols: usize) -> Self {
        Self {
            x_min: 0,
            x_max: cols,
            y_min: 0,
            y_max: rows,
        }
    }

    /// Clip signed edges into `[0, cols] x [0, rows]`, collapsing inverted ranges onto their
    /// upper edge.
    fn clipped(x: (isize, isize), y: (isize, isize), rows: usize, cols: usize) -> Self {
        let (x_min, x_max) = clip_range(x.0, x.1, cols);
        let (y_min, y_max) = clip_range(y.0, y.1, rows);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> usize {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> usize {
        self.y_max - self.y_min
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x_min..self.x_max).contains(&x) && (self.y_min..self.y_max).contains(&y)
    }
}

fn clip_range(lower: isize, upper: isize, dim: usize) -> (usize, usize) {
    let dim = dim as isize;
    let lower = lower.clamp(0, dim) as usize;
    let upper = upper.clamp(0, dim) as usize;
    if lower <= upper {
        (lower, upper)
    } else {
        (upper, upper)
    }
}

/// One coordinate of a grid access: a single index or a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Index(isize),
    Slice {
        start: Option<isize>,
        stop: Option<isize>,
    },
}

impl Axis {
    /// The whole extent of the view
    pub const ALL: Axis = Axis::Slice {
        start: None,
        stop: None,
    };

    pub fn at(index: isize) -> Self {
        Axis::Index(index)
    }

    pub fn range(start: isize, stop: isize) -> Self {
        Axis::Slice {
            start: Some(start),
            stop: Some(stop),
        }
    }

    pub fn from_start(start: isize) -> Self {
        Axis::Slice {
            start: Some(start),
            stop: None,
        }
    }

    pub fn up_to(stop: isize) -> Self {
        Axis::Slice {
            start: None,
            stop: Some(stop),
        }
    }
}

impl From<isize> for Axis {
    fn from(index: isize) -> Self {
        Axis::Index(index)
    }
}

impl From<Range<isize>> for Axis {
    fn from(range: Range<isize>) -> Self {
        Axis::range(range.start, range.end)
    }
}

impl From<RangeFrom<isize>> for Axis {
    fn from(range: RangeFrom<isize>) -> Self {
        Axis::from_start(range.start)
    }
}

impl From<RangeTo<isize>> for Axis {
    fn from(range: RangeTo<isize>) -> Self {
        Axis::up_to(range.end)
    }
}

impl From<RangeFull> for Axis {
    fn from(_: RangeFull) -> Self {
        Axis::ALL
    }
}

/// An axis after normalization against a view's bounds
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    Index(usize),
    Span(Range<usize>),
}

fn relative(coordinate: isize, lo: usize, hi: usize) -> isize {
    if coordinate >= 0 {
        lo as isize + coordinate
    } else {
        hi as isize + coordinate
    }
}

fn resolve(axis: Axis, which: GridAxis, lo: usize, hi: usize, dim: usize) -> Result<Resolved> {
    match axis {
        Axis::Index(index) => {
            let resolved = relative(index, lo, hi);
            if resolved < lo as isize || resolved >= hi as isize {
                return Err(IndexError {
                    axis: which,
                    index,
                    resolved,
                    lo,
                    hi,
                }
                .into());
            }
            Ok(Resolved::Index(resolved as usize))
        }
        Axis::Slice { start, stop } => {
            let start = start.map_or(lo as isize, |s| relative(s, lo, hi));
            let stop = stop.map_or(hi as isize, |s| relative(s, lo, hi));
            let (start, stop) = clip_range(start, stop, dim);
            Ok(Resolved::Span(start..stop))
        }
    }
}

/// Result of a read: the shape depends on which axes were indices and which were slices
#[derive(Debug)]
pub enum Selection<'a, T> {
    Cell(&'a T),
    Line(Vec<&'a T>),
    Window(View<'a, T>),
}

/// Value for a write, shaped like the addressed region
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Cell(T),
    Line(Vec<T>),
    Block(Vec<Vec<T>>),
}

impl<T> Patch<T> {
    fn extent(&self) -> Extent {
        match self {
            Patch::Cell(_) => Extent::Cell,
            Patch::Line(values) => Extent::Line(values.len()),
            Patch::Block(rows) => Extent::Block {
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
            },
        }
    }
}

fn check_rectangular<T>(rows: &[Vec<T>]) -> std::result::Result<usize, ShapeError> {
    let expected = rows.first().map_or(0, Vec::len);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != expected {
            return Err(ShapeError::Ragged {
                row,
                len: values.len(),
                expected,
            });
        }
    }
    Ok(expected)
}

/// Owning rectangular grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Grid of `rows` by `cols`, every cell set to `fill`
    pub fn uniform(rows: i64, cols: i64, fill: T) -> Result<Self> {
        if rows < 0 || cols < 0 {
            return Err(ShapeError::NegativeDims { rows, cols }.into());
        }
        let (rows, cols) = (rows as usize, cols as usize);
        Ok(Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        })
    }
}

impl<T> Grid<T> {
    /// Build from nested rows, which must all have the same length
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = check_rectangular(&rows)?;
        let n_rows = rows.len();
        Ok(Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// `(rows, cols)` of the backing buffer
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::full(self.rows, self.cols)
    }

    pub fn view(&self) -> View<'_, T> {
        View {
            grid: self,
            bounds: self.bounds(),
        }
    }

    pub fn view_mut(&mut self) -> ViewMut<'_, T> {
        let bounds = self.bounds();
        ViewMut { grid: self, bounds }
    }

    pub fn get(&self, x: Axis, y: Axis) -> Result<Selection<'_, T>> {
        self.view().get(x, y)
    }

    pub fn cell(&self, x: isize, y: isize) -> Result<&T> {
        self.view().cell(x, y)
    }

    pub fn set(&mut self, x: Axis, y: Axis, patch: Patch<T>) -> Result<()> {
        self.view_mut().set(x, y, patch)
    }

    pub fn set_cell(&mut self, x: isize, y: isize, value: T) -> Result<()> {
        self.view_mut().set_cell(x, y, value)
    }

    pub fn inner(&self) -> View<'_, T> {
        self.view().inner()
    }

    pub fn inner_mut(&mut self) -> ViewMut<'_, T> {
        self.view_mut().into_inner()
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        self.view().map(f)
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.view().iter_coords()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.view().rows()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }
}

/// Read-only window into a grid
#[derive(Debug)]
pub struct View<'a, T> {
    grid: &'a Grid<T>,
    bounds: Bounds,
}

impl<'a, T> Clone for View<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for View<'a, T> {}

impl<'a, T> View<'a, T> {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// `(rows, cols)` of the visible rectangle
    pub fn shape(&self) -> (usize, usize) {
        (self.bounds.height(), self.bounds.width())
    }

    fn resolve_x(&self, x: Axis) -> Result<Resolved> {
        resolve(x, GridAxis::X, self.bounds.x_min, self.bounds.x_max, self.grid.cols)
    }

    fn resolve_y(&self, y: Axis) -> Result<Resolved> {
        resolve(y, GridAxis::Y, self.bounds.y_min, self.bounds.y_max, self.grid.rows)
    }

    fn at(&self, x: usize, y: usize) -> &'a T {
        &self.grid.cells[self.grid.index(x, y)]
    }

    fn sub_view(&self, xs: Range<usize>, ys: Range<usize>) -> View<'a, T> {
        View {
            grid: self.grid,
            bounds: Bounds::clipped(
                (xs.start as isize, xs.end as isize),
                (ys.start as isize, ys.end as isize),
                self.grid.rows,
                self.grid.cols,
            ),
        }
    }

    pub fn get(&self, x: Axis, y: Axis) -> Result<Selection<'a, T>> {
        let selection = match (self.resolve_x(x)?, self.resolve_y(y)?) {
            (Resolved::Index(x), Resolved::Index(y)) => Selection::Cell(self.at(x, y)),
            (Resolved::Index(x), Resolved::Span(ys)) => {
                Selection::Line(ys.map(|y| self.at(x, y)).collect())
            }
            (Resolved::Span(xs), Resolved::Index(y)) => {
                Selection::Line(xs.map(|x| self.at(x, y)).collect())
            }
            (Resolved::Span(xs), Resolved::Span(ys)) => Selection::Window(self.sub_view(xs, ys)),
        };
        Ok(selection)
    }

    pub fn cell(&self, x: isize, y: isize) -> Result<&'a T> {
        match self.get(Axis::Index(x), Axis::Index(y))? {
            Selection::Cell(cell) => Ok(cell),
            _ => unreachable!("two indices always select a cell"),
        }
    }

    /// Cell at absolute backing coordinates, which must lie inside this view
    pub fn cell_at(&self, x: usize, y: usize) -> Result<&'a T> {
        let x = x as isize - self.bounds.x_min as isize;
        let y = y as isize - self.bounds.y_min as isize;
        if x < 0 || y < 0 {
            let (axis, index, lo, hi) = if x < 0 {
                (GridAxis::X, x, self.bounds.x_min, self.bounds.x_max)
            } else {
                (GridAxis::Y, y, self.bounds.y_min, self.bounds.y_max)
            };
            return Err(IndexError {
                axis,
                index,
                resolved: index + lo as isize,
                lo,
                hi,
            }
            .into());
        }
        self.cell(x, y)
    }

    /// Sub-view from two slices
    pub fn window(&self, x: Axis, y: Axis) -> Result<View<'a, T>> {
        let xs = match self.resolve_x(x)? {
            Resolved::Index(x) => x..x + 1,
            Resolved::Span(xs) => xs,
        };
        let ys = match self.resolve_y(y)? {
            Resolved::Index(y) => y..y + 1,
            Resolved::Span(ys) => ys,
        };
        Ok(self.sub_view(xs, ys))
    }

    /// View shrunk by one cell on every side
    pub fn inner(&self) -> View<'a, T> {
        View {
            grid: self.grid,
            bounds: shrink(self.bounds, self.grid.rows, self.grid.cols),
        }
    }

    /// New independent grid holding `f` of every visible cell
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Grid<U> {
        let (rows, cols) = self.shape();
        let cells = self.iter_coords().map(|(_, _, cell)| f(cell)).collect();
        Grid { rows, cols, cells }
    }

    /// Row-major `(x, y, cell)` over the visible rectangle, in backing coordinates
    pub fn iter_coords(&self) -> impl Iterator<Item = (usize, usize, &'a T)> + 'a {
        let view = *self;
        let Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        } = self.bounds;
        (y_min..y_max).flat_map(move |y| (x_min..x_max).map(move |x| (x, y, view.at(x, y))))
    }

    /// Visible part of each row, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + 'a {
        let grid = self.grid;
        let Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        } = self.bounds;
        (y_min..y_max).map(move |y| {
            let start = grid.index(x_min, y);
            &grid.cells[start..start + (x_max - x_min)]
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.rows().map(<[T]>::to_vec).collect()
    }
}

fn shrink(bounds: Bounds, rows: usize, cols: usize) -> Bounds {
    Bounds::clipped(
        (bounds.x_min as isize + 1, bounds.x_max as isize - 1),
        (bounds.y_min as isize + 1, bounds.y_max as isize - 1),
        rows,
        cols,
    )
}

/// Mutable window into a grid
#[derive(Debug)]
pub struct ViewMut<'a, T> {
    grid: &'a mut Grid<T>,
    bounds: Bounds,
}

impl<'a, T> ViewMut<'a, T> {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.bounds.height(), self.bounds.width())
    }

    pub fn as_view(&self) -> View<'_, T> {
        View {
            grid: &*self.grid,
            bounds: self.bounds,
        }
    }

    pub fn get(&self, x: Axis, y: Axis) -> Result<Selection<'_, T>> {
        self.as_view().get(x, y)
    }

    pub fn cell(&self, x: isize, y: isize) -> Result<&T> {
        self.as_view().cell(x, y)
    }

    pub fn cell_mut(&mut self, x: isize, y: isize) -> Result<&mut T> {
        let view = self.as_view();
        let (x, y) = match (view.resolve_x(Axis::Index(x))?, view.resolve_y(Axis::Index(y))?) {
            (Resolved::Index(x), Resolved::Index(y)) => (x, y),
            _ => unreachable!("indices resolve to indices"),
        };
        let index = self.grid.index(x, y);
        Ok(&mut self.grid.cells[index])
    }

    /// Write `patch` into the addressed region.
    ///
    /// The patch shape must match exactly; on mismatch nothing is written.
    pub fn set(&mut self, x: Axis, y: Axis, patch: Patch<T>) -> Result<()> {
        let view = self.as_view();
        let (rx, ry) = (view.resolve_x(x)?, view.resolve_y(y)?);
        let actual = patch.extent();

        match (rx, ry, patch) {
            (Resolved::Index(x), Resolved::Index(y), Patch::Cell(value)) => {
                self.put(x, y, value);
            }
            (Resolved::Index(_), Resolved::Index(_), _) => {
                return Err(ShapeError::Mismatch {
                    expected: Extent::Cell,
                    actual,
                }
                .into());
            }
            (Resolved::Index(x), Resolved::Span(ys), patch) => {
                let values = line_values(patch, ys.len(), actual)?;
                for (y, value) in ys.zip(values) {
                    self.put(x, y, value);
                }
            }
            (Resolved::Span(xs), Resolved::Index(y), patch) => {
                let values = line_values(patch, xs.len(), actual)?;
                for (x, value) in xs.zip(values) {
                    self.put(x, y, value);
                }
            }
            (Resolved::Span(xs), Resolved::Span(ys), patch) => {
                let expected = Extent::Block {
                    rows: ys.len(),
                    cols: xs.len(),
                };
                let rows = match patch {
                    Patch::Block(rows) => rows,
                    _ => return Err(ShapeError::Mismatch { expected, actual }.into()),
                };
                let cols = check_rectangular(&rows)?;
                if rows.len() != ys.len() || cols != xs.len() {
                    return Err(ShapeError::Mismatch { expected, actual }.into());
                }
                for (y, row) in ys.zip(rows) {
                    for (x, value) in xs.clone().zip(row) {
                        self.put(x, y, value);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn set_cell(&mut self, x: isize, y: isize, value: T) -> Result<()> {
        *self.cell_mut(x, y)? = value;
        Ok(())
    }

    /// Replace the whole visible rectangle
    pub fn assign(&mut self, rows: Vec<Vec<T>>) -> Result<()> {
        self.set(Axis::ALL, Axis::ALL, Patch::Block(rows))
    }

    fn put(&mut self, x: usize, y: usize, value: T) {
        let index = self.grid.index(x, y);
        self.grid.cells[index] = value;
    }

    /// Mutable view shrunk by one cell on every side
    pub fn inner_mut(&mut self) -> ViewMut<'_, T> {
        let bounds = shrink(self.bounds, self.grid.rows, self.grid.cols);
        ViewMut {
            grid: &mut *self.grid,
            bounds,
        }
    }

    /// Like [`ViewMut::inner_mut`], keeping the original borrow
    pub fn into_inner(self) -> ViewMut<'a, T> {
        let bounds = shrink(self.bounds, self.grid.rows, self.grid.cols);
        ViewMut {
            grid: self.grid,
            bounds,
        }
    }

    pub fn window_mut(&mut self, x: Axis, y: Axis) -> Result<ViewMut<'_, T>> {
        let bounds = self.as_view().window(x, y)?.bounds;
        Ok(ViewMut {
            grid: &mut *self.grid,
            bounds,
        })
    }

    /// Transform every visible cell in place
    pub fn apply<F: FnMut(&T) -> T>(&mut self, mut f: F) {
        let Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        } = self.bounds;
        for y in y_min..y_max {
            for x in x_min..x_max {
                let index = self.grid.index(x, y);
                let cell = &mut self.grid.cells[index];
                *cell = f(cell);
            }
        }
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.apply(|_| value.clone());
    }

    /// Swap every visible cell equal to `old` for `new`
    pub fn replace(&mut self, old: &T, new: T)
    where
        T: Clone + PartialEq,
    {
        self.apply(|cell| if cell == old { new.clone() } else { cell.clone() });
    }
}

fn line_values<T>(patch: Patch<T>, expected: usize, actual: Extent) -> Result<Vec<T>> {
    match patch {
        Patch::Line(values) if values.len() == expected => Ok(values),
        _ => Err(ShapeError::Mismatch {
            expected: Extent::Line(expected),
            actual,
        }
        .into()),
    }
}
