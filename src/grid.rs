use crate::error::ChartError;

/// An inclusive rectangle of grid cells claimed by one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
}

impl Span {
    pub fn new(row_start: usize, col_start: usize, row_end: usize, col_end: usize) -> Self {
        Self {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }

    /// A single cell.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    /// An entire grid row.
    pub fn row(row: usize, ncol: usize) -> Self {
        Self::new(row, 0, row, ncol.saturating_sub(1))
    }

    fn overlaps(&self, other: &Span) -> bool {
        self.row_start <= other.row_end
            && other.row_start <= self.row_end
            && self.col_start <= other.col_end
            && other.col_start <= self.col_end
    }
}

/// Shared figure layout: a fixed rows x cols partition of the canvas.
/// Geometry is set up front; recipes only allocate regions from it.
/// Allocation rejects spans that exceed the geometry or overlap a region
/// already handed out.
#[derive(Debug, Clone)]
pub struct GridSpec {
    nrow: usize,
    ncol: usize,
    allocated: Vec<Span>,
}

impl GridSpec {
    pub fn new(nrow: usize, ncol: usize) -> Self {
        Self {
            nrow,
            ncol,
            allocated: Vec::new(),
        }
    }

    pub fn geometry(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    pub fn ncells(&self) -> usize {
        self.nrow * self.ncol
    }

    /// Claim a span for one panel.
    pub fn allocate(&mut self, span: Span) -> Result<Span, ChartError> {
        if span.row_start > span.row_end || span.col_start > span.col_end {
            return Err(ChartError::layout(format!(
                "span ({},{})-({},{}) is inverted",
                span.row_start, span.col_start, span.row_end, span.col_end
            )));
        }
        if span.row_end >= self.nrow || span.col_end >= self.ncol {
            return Err(ChartError::layout(format!(
                "span ({},{})-({},{}) exceeds {}x{} grid",
                span.row_start, span.col_start, span.row_end, span.col_end, self.nrow, self.ncol
            )));
        }
        if let Some(taken) = self.allocated.iter().find(|s| s.overlaps(&span)) {
            return Err(ChartError::layout(format!(
                "span ({},{})-({},{}) overlaps allocated span ({},{})-({},{})",
                span.row_start,
                span.col_start,
                span.row_end,
                span.col_end,
                taken.row_start,
                taken.col_start,
                taken.row_end,
                taken.col_end
            )));
        }
        self.allocated.push(span);
        Ok(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_cell() {
        let mut grid = GridSpec::new(2, 3);
        assert!(grid.allocate(Span::cell(0, 0)).is_ok());
        assert!(grid.allocate(Span::cell(1, 2)).is_ok());
    }

    #[test]
    fn test_span_exceeding_columns_fails() {
        // (0,0) to (0,3) on a 2x3 grid: column 3 does not exist.
        let mut grid = GridSpec::new(2, 3);
        let result = grid.allocate(Span::new(0, 0, 0, 3));
        assert!(matches!(result, Err(ChartError::Layout { .. })));
    }

    #[test]
    fn test_span_exceeding_rows_fails() {
        let mut grid = GridSpec::new(2, 3);
        let result = grid.allocate(Span::new(0, 0, 2, 0));
        assert!(matches!(result, Err(ChartError::Layout { .. })));
    }

    #[test]
    fn test_overlapping_allocation_fails() {
        let mut grid = GridSpec::new(2, 3);
        grid.allocate(Span::row(0, 3)).unwrap();
        let result = grid.allocate(Span::cell(0, 1));
        assert!(matches!(result, Err(ChartError::Layout { .. })));
        // The row below is still free.
        assert!(grid.allocate(Span::cell(1, 1)).is_ok());
    }

    #[test]
    fn test_full_row_span() {
        let mut grid = GridSpec::new(4, 4);
        let span = grid.allocate(Span::row(0, 4)).unwrap();
        assert_eq!(span, Span::new(0, 0, 0, 3));
    }

    #[test]
    fn test_inverted_span_fails() {
        let mut grid = GridSpec::new(2, 3);
        let result = grid.allocate(Span::new(1, 0, 0, 0));
        assert!(matches!(result, Err(ChartError::Layout { .. })));
    }
}
