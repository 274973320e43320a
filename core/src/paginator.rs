use std::fmt;

/// One page: a contiguous run of items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    pub fn items(&self) -> &'a [T] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.items.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Consecutive pages of at most `page_size` items; only the last may be shorter.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    pages: Vec<Page<'a, T>>,
}

impl<'a, T> Paginator<'a, T> {
    /// A `page_size` of zero yields no pages.
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        let pages = if page_size == 0 {
            Vec::new()
        } else {
            items.chunks(page_size).map(|items| Page { items }).collect()
        };
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page<'a, T>> {
        self.pages.iter()
    }
}

impl<'p, 'a, T> IntoIterator for &'p Paginator<'a, T> {
    type Item = &'p Page<'a, T>;
    type IntoIter = std::slice::Iter<'p, Page<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}
