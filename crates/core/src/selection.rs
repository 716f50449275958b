/// Row selection for a rendered list. At most one row is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<usize>,
    len: usize,
}

/// Outcome of a click on a row's cover image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverClick<'a> {
    /// The row was not selected and now is.
    Selected(usize),
    /// The row was already selected; open this link in a new context.
    Open(&'a str),
    /// Selected row without a link, or a row that does not exist.
    Ignored,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self { selected: None, len }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.selected == Some(row)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Selects `row` and clears any other selection. Clicking the selected
    /// row keeps it selected.
    pub fn click_row(&mut self, row: usize) -> bool {
        if row >= self.len {
            return false;
        }
        self.selected = Some(row);
        true
    }

    /// First click on a cover selects the row, the second one opens `link`.
    pub fn click_cover<'a>(&mut self, row: usize, link: Option<&'a str>) -> CoverClick<'a> {
        if row >= self.len {
            return CoverClick::Ignored;
        }
        if !self.is_selected(row) {
            self.selected = Some(row);
            return CoverClick::Selected(row);
        }
        match link.filter(|link| !link.trim().is_empty()) {
            Some(link) => CoverClick::Open(link),
            None => CoverClick::Ignored,
        }
    }

    /// Moves the highlight by `delta` rows, wrapping at both ends. With
    /// nothing selected, moving down starts at the top and moving up at the
    /// bottom.
    pub fn move_by(&mut self, delta: isize) {
        if self.len == 0 {
            return;
        }
        let next = match self.selected {
            None if delta >= 0 => 0,
            None => self.len - 1,
            Some(current) => wrap(current, delta, self.len),
        };
        self.selected = Some(next);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Replaces the rows. Any selection is dropped.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.selected = None;
    }
}

fn wrap(current: usize, delta: isize, len: usize) -> usize {
    let len = isize::try_from(len).unwrap_or(isize::MAX);
    let current = isize::try_from(current).unwrap_or_default();
    usize::try_from((current + delta).rem_euclid(len)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{CoverClick, Selection};

    #[test]
    fn row_click_moves_the_single_selection() {
        let mut selection = Selection::new(3);

        assert!(selection.click_row(0));
        assert!(selection.click_row(2));
        assert_eq!(selection.selected(), Some(2));
        assert!(!selection.is_selected(0));

        assert!(selection.click_row(2));
        assert_eq!(selection.selected(), Some(2));
        assert!(!selection.click_row(9));
    }

    #[test]
    fn cover_click_selects_then_opens() {
        let mut selection = Selection::new(2);

        assert_eq!(selection.click_cover(1, Some("http://s")), CoverClick::Selected(1));
        assert_eq!(selection.click_cover(1, Some("http://s")), CoverClick::Open("http://s"));
        assert_eq!(selection.selected(), Some(1));
    }

    #[test]
    fn selected_cover_without_link_does_nothing() {
        let mut selection = Selection::new(1);
        selection.click_row(0);

        assert_eq!(selection.click_cover(0, None), CoverClick::Ignored);
        assert_eq!(selection.click_cover(0, Some(" ")), CoverClick::Ignored);
        assert_eq!(selection.selected(), Some(0));
    }

    #[test]
    fn keyboard_moves_wrap() {
        let mut selection = Selection::new(3);

        selection.move_by(-1);
        assert_eq!(selection.selected(), Some(2));
        selection.move_by(1);
        assert_eq!(selection.selected(), Some(0));

        selection.reset(0);
        selection.move_by(1);
        assert_eq!(selection.selected(), None);
    }
}
